use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, Owner, Task};
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

async fn call(app: &mut RouterIntoService<String>, request: Request<String>) -> Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

async fn signup(app: &mut RouterIntoService<String>, username: &str) -> (String, String) {
    let resp = call(
        app,
        json_request(
            "POST",
            "/api/signup",
            None,
            &json!({"username": username, "password": "pw"}).to_string(),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    let token = body["accessToken"].as_str().unwrap().to_string();

    let resp = call(app, get_request("/api/me", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Owner = body_json(resp).await;
    (token, me.id)
}

fn list_uri(owner: &str, order: &str) -> String {
    format!("/api/tasks?where%5Buid%5D%5Bid%5D={owner}&orderBy%5BcreatedAt%5D={order}")
}

// --- session ---

#[tokio::test]
async fn signup_twice_returns_409() {
    let mut app = app().into_service();
    signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request("POST", "/api/signup", None, r#"{"username":"ann","password":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_with_blank_username_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/signup", None, r#"{"username":"","password":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_with_bad_credentials_returns_401() {
    let mut app = app().into_service();
    signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request("POST", "/api/login", None, r#"{"username":"ann","password":"wrong"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_token_for_same_user() {
    let mut app = app().into_service();
    let (_, id) = signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request("POST", "/api/login", None, r#"{"username":"ann","password":"pw"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let token = body["accessToken"].as_str().unwrap();

    let resp = call(&mut app, get_request("/api/me", Some(token))).await;
    let me: Owner = body_json(resp).await;
    assert_eq!(me.id, id);
}

#[tokio::test]
async fn me_without_token_returns_401() {
    let resp = app().oneshot(get_request("/api/me", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- tasks ---

#[tokio::test]
async fn list_tasks_without_token_returns_401() {
    let resp = app()
        .oneshot(get_request(&list_uri("u1", "asc"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_task_malformed_json_returns_422() {
    let mut app = app().into_service();
    let (token, _) = signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request("POST", "/api/tasks", Some(&token), r#"{"not_text":1}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_task_for_other_owner_returns_403() {
    let mut app = app().into_service();
    let (token, _) = signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            r#"{"text":"x","completed":false,"uid":{"id":"someone-else"}}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_missing_task_returns_404() {
    let mut app = app().into_service();
    let (token, _) = signup(&mut app, "ann").await;
    let resp = call(
        &mut app,
        json_request("PATCH", "/api/tasks/missing", Some(&token), r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn list_with_unknown_order_returns_422() {
    let mut app = app().into_service();
    let (token, id) = signup(&mut app, "ann").await;
    let resp = call(&mut app, get_request(&list_uri(&id, "sideways"), Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- full lifecycle ---

#[tokio::test]
async fn task_lifecycle() {
    let mut app = app().into_service();
    let (token, id) = signup(&mut app, "ann").await;
    let (bob_token, bob_id) = signup(&mut app, "bob").await;

    // create two tasks for ann, one for bob
    let create = |text: &str, owner: &str| {
        json!({"text": text, "completed": false, "uid": {"id": owner}}).to_string()
    };
    let resp = call(
        &mut app,
        json_request("POST", "/api/tasks", Some(&token), &create("Walk dog", &id)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Task = body_json(resp).await;
    assert_eq!(first.text, "Walk dog");
    assert!(!first.completed);
    assert_eq!(first.uid.id, id);

    let resp = call(
        &mut app,
        json_request("POST", "/api/tasks", Some(&token), &create("Buy milk", &id)),
    )
    .await;
    let second: Task = body_json(resp).await;

    let resp = call(
        &mut app,
        json_request("POST", "/api/tasks", Some(&bob_token), &create("Bob's", &bob_id)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // list ascending: ann sees only her own, oldest first
    let resp = call(&mut app, get_request(&list_uri(&id, "asc"), Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = body_json(resp).await;
    let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, [first.id.as_str(), second.id.as_str()]);

    // descending
    let resp = call(&mut app, get_request(&list_uri(&id, "desc"), Some(&token))).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks[0].id, second.id);

    // filtering on someone else's id yields nothing
    let resp = call(&mut app, get_request(&list_uri(&bob_id, "asc"), Some(&token))).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());

    // partial update: only completed
    let resp = call(
        &mut app,
        json_request(
            "PATCH",
            &format!("/api/tasks/{}", first.id),
            Some(&token),
            r#"{"completed":true}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = body_json(resp).await;
    assert_eq!(updated.text, "Walk dog"); // unchanged
    assert!(updated.completed);
    assert_eq!(updated.created_at, first.created_at);

    // bob cannot touch ann's task
    let resp = call(
        &mut app,
        json_request(
            "PATCH",
            &format!("/api/tasks/{}", first.id),
            Some(&bob_token),
            r#"{"completed":false}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- graphql ---

fn gql(operation: &str, variables: Value, token: Option<&str>) -> Request<String> {
    let body = json!({"query": "...", "variables": variables, "operationName": operation});
    json_request("POST", "/graphql", token, &body.to_string())
}

#[tokio::test]
async fn graphql_task_lifecycle() {
    let mut app = app().into_service();

    let resp = call(
        &mut app,
        gql("Signup", json!({"credentials": {"username": "ann", "password": "pw"}}), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let token = body["data"]["signup"]["accessToken"].as_str().unwrap().to_string();

    let resp = call(&mut app, gql("Me", json!({}), Some(&token))).await;
    let body: Value = body_json(resp).await;
    let id = body["data"]["me"]["id"].as_str().unwrap().to_string();

    let resp = call(
        &mut app,
        gql(
            "CreateTask",
            json!({"data": {"text": "Walk dog", "completed": false, "uid": {"id": id}}}),
            Some(&token),
        ),
    )
    .await;
    let body: Value = body_json(resp).await;
    let created = &body["data"]["createTask"];
    assert_eq!(created["text"], "Walk dog");
    assert_eq!(created["completed"], false);
    assert!(created.get("uid").is_none());
    let task_id = created["id"].as_str().unwrap().to_string();

    let resp = call(
        &mut app,
        gql(
            "UpdateTask",
            json!({"data": {"completed": true}, "where": {"id": task_id}}),
            Some(&token),
        ),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["updateTask"]["completed"], true);

    let resp = call(
        &mut app,
        gql(
            "Tasks",
            json!({"where": {"uid": {"id": id}}, "orderBy": [{"createdAt": "asc"}]}),
            Some(&token),
        ),
    )
    .await;
    let body: Value = body_json(resp).await;
    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task_id.as_str());
    assert_eq!(tasks[0]["completed"], true);
}

#[tokio::test]
async fn graphql_me_with_unknown_token_is_null() {
    let resp = app().oneshot(gql("Me", json!({}), Some("nope"))).await.unwrap();
    let body: Value = body_json(resp).await;
    assert!(body["data"]["me"].is_null());
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn graphql_tasks_without_token_is_unauthenticated() {
    let resp = app().oneshot(gql("Tasks", json!({}), None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert!(body["data"].is_null());
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn graphql_create_owner_must_be_a_plain_id() {
    let mut app = app().into_service();
    let resp = call(
        &mut app,
        gql("Signup", json!({"credentials": {"username": "ann", "password": "pw"}}), None),
    )
    .await;
    let body: Value = body_json(resp).await;
    let token = body["data"]["signup"]["accessToken"].as_str().unwrap().to_string();

    let resp = call(&mut app, gql("Me", json!({}), Some(&token))).await;
    let body: Value = body_json(resp).await;
    let id = body["data"]["me"]["id"].as_str().unwrap().to_string();

    let resp = call(
        &mut app,
        gql(
            "CreateTask",
            json!({"data": {"text": "x", "completed": false, "uid": {"connect": {"id": id}}}}),
            Some(&token),
        ),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");

    let resp = call(
        &mut app,
        gql(
            "Tasks",
            json!({"where": {"uid": {"id": {"equals": id}}}}),
            Some(&token),
        ),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
}

#[tokio::test]
async fn graphql_unknown_operation_is_bad_input() {
    let resp = app().oneshot(gql("DeleteTask", json!({}), None)).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
}

#[tokio::test]
async fn graphql_login_with_bad_password_is_unauthenticated() {
    let mut app = app().into_service();
    call(
        &mut app,
        gql("Signup", json!({"credentials": {"username": "ann", "password": "pw"}}), None),
    )
    .await;
    let resp = call(
        &mut app,
        gql("Login", json!({"credentials": {"username": "ann", "password": "no"}}), None),
    )
    .await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
}
