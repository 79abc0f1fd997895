//! `/graphql` endpoint, dispatched on `operationName`.
//!
//! Results and errors always come back with status 200 in the
//! `{data, errors}` envelope; error codes travel in `extensions.code`.

use axum::{extract::State, http::HeaderMap, Json};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::rest::{bearer, Credentials};
use crate::store::{Order, StoreError, Task};
use crate::Db;

#[derive(Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Value,
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
}

#[derive(Deserialize)]
struct IdRef {
    id: String,
}

#[derive(Deserialize)]
struct CreateTaskData {
    text: String,
    #[serde(default)]
    completed: bool,
    uid: IdRef,
}

#[derive(Deserialize)]
struct CreateTaskVars {
    data: CreateTaskData,
}

#[derive(Deserialize)]
struct TaskWhere {
    uid: Option<IdRef>,
}

#[derive(Deserialize)]
struct TaskOrder {
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct TasksVars {
    #[serde(rename = "where")]
    filter: Option<TaskWhere>,
    #[serde(rename = "orderBy", default)]
    order_by: Vec<TaskOrder>,
}

#[derive(Deserialize)]
struct UpdateTaskData {
    text: Option<String>,
    completed: Option<bool>,
}

#[derive(Deserialize)]
struct UpdateTaskVars {
    data: UpdateTaskData,
    #[serde(rename = "where")]
    target: IdRef,
}

#[derive(Deserialize)]
struct CredentialsVars {
    credentials: Credentials,
}

pub async fn execute(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(request): Json<GraphqlRequest>,
) -> Json<Value> {
    let token = bearer(&headers);
    let operation = request.operation_name.as_deref().unwrap_or_default();
    debug!(operation, query_len = request.query.len(), "graphql request");

    let result = match operation {
        "CreateTask" => create_task(&db, token, request.variables).await,
        "Tasks" => tasks(&db, token, request.variables).await,
        "UpdateTask" => update_task(&db, token, request.variables).await,
        "Me" => me(&db, token).await,
        "Login" => login(&db, request.variables).await,
        "Signup" => signup(&db, request.variables).await,
        "" => Err(StoreError::Invalid("operationName is required".to_string())),
        other => Err(StoreError::Invalid(format!("unknown operation {other}"))),
    };

    Json(match result {
        Ok(data) => json!({ "data": data }),
        Err(e) => error_envelope(e),
    })
}

fn variables<T: DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Invalid(e.to_string()))
}

/// The `{ id text completed createdAt }` selection every task field uses.
fn selection(task: &Task) -> Value {
    json!({
        "id": task.id,
        "text": task.text,
        "completed": task.completed,
        "createdAt": task.created_at,
    })
}

async fn create_task(db: &Db, token: Option<&str>, vars: Value) -> Result<Value, StoreError> {
    let vars: CreateTaskVars = variables(vars)?;
    let mut store = db.write().await;
    let user = store.authenticate(token)?;
    let data = vars.data;
    let task = store.create_task(&user, &data.text, data.completed, &data.uid.id)?;
    Ok(json!({ "createTask": selection(&task) }))
}

async fn tasks(db: &Db, token: Option<&str>, vars: Value) -> Result<Value, StoreError> {
    let vars: TasksVars = if vars.is_null() {
        TasksVars {
            filter: None,
            order_by: Vec::new(),
        }
    } else {
        variables(vars)?
    };
    let order = match vars.order_by.iter().find_map(|o| o.created_at.as_deref()) {
        Some(value) => Order::parse(value)?,
        None => Order::default(),
    };
    let owner = vars.filter.and_then(|f| f.uid).map(|uid| uid.id);

    let store = db.read().await;
    let user = store.authenticate(token)?;
    let tasks: Vec<Value> = store
        .list_tasks(&user, owner.as_deref(), order)
        .iter()
        .map(selection)
        .collect();
    Ok(json!({ "tasks": tasks }))
}

async fn update_task(db: &Db, token: Option<&str>, vars: Value) -> Result<Value, StoreError> {
    let vars: UpdateTaskVars = variables(vars)?;
    let mut store = db.write().await;
    let user = store.authenticate(token)?;
    let task = store.update_task(&user, &vars.target.id, vars.data.text, vars.data.completed)?;
    Ok(json!({ "updateTask": selection(&task) }))
}

/// An unrecognized token yields `me: null` rather than an error.
async fn me(db: &Db, token: Option<&str>) -> Result<Value, StoreError> {
    let me = db
        .read()
        .await
        .authenticate(token)
        .ok()
        .map(|id| json!({ "id": id }));
    Ok(json!({ "me": me }))
}

async fn login(db: &Db, vars: Value) -> Result<Value, StoreError> {
    let vars: CredentialsVars = variables(vars)?;
    let creds = vars.credentials;
    let token = db.write().await.login(&creds.username, &creds.password)?;
    info!(username = %creds.username, "logged in");
    Ok(json!({ "login": { "accessToken": token } }))
}

async fn signup(db: &Db, vars: Value) -> Result<Value, StoreError> {
    let vars: CredentialsVars = variables(vars)?;
    let creds = vars.credentials;
    let token = db.write().await.signup(&creds.username, &creds.password)?;
    info!(username = %creds.username, "signed up");
    Ok(json!({ "signup": { "accessToken": token } }))
}

fn error_envelope(error: StoreError) -> Value {
    let (code, message) = match error {
        StoreError::Unauthorized => ("UNAUTHENTICATED", "not authenticated".to_string()),
        StoreError::Forbidden => ("FORBIDDEN", "access denied".to_string()),
        StoreError::NotFound => ("NOT_FOUND", "no such task".to_string()),
        StoreError::Conflict(msg) => ("CONFLICT", msg),
        StoreError::Invalid(msg) => ("BAD_USER_INPUT", msg),
    };
    json!({
        "data": null,
        "errors": [{ "message": message, "extensions": { "code": code } }],
    })
}
