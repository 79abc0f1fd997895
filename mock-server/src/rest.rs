use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::{Order, Owner, StoreError, Task};
use crate::Db;

const OWNER_FILTER: &str = "where[uid][id]";
const CREATED_AT_ORDER: &str = "orderBy[createdAt]";

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub uid: Owner,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match self {
            StoreError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            StoreError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            StoreError::NotFound => StatusCode::NOT_FOUND.into_response(),
            StoreError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            StoreError::Invalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response(),
        }
    }
}

/// Token from an `authorization: Bearer <token>` header.
pub(crate) fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub async fn signup(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<AccessToken>), StoreError> {
    let access_token = db.write().await.signup(&input.username, &input.password)?;
    info!(username = %input.username, "signed up");
    Ok((StatusCode::CREATED, Json(AccessToken { access_token })))
}

pub async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<AccessToken>, StoreError> {
    let access_token = db.write().await.login(&input.username, &input.password)?;
    info!(username = %input.username, "logged in");
    Ok(Json(AccessToken { access_token }))
}

pub async fn me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Owner>, StoreError> {
    let id = db.read().await.authenticate(bearer(&headers))?;
    Ok(Json(Owner { id }))
}

pub async fn create_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), StoreError> {
    let mut store = db.write().await;
    let user = store.authenticate(bearer(&headers))?;
    let task = store.create_task(&user, &input.text, input.completed, &input.uid.id)?;
    debug!(task = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Task>>, StoreError> {
    let store = db.read().await;
    let user = store.authenticate(bearer(&headers))?;
    let order = match params.get(CREATED_AT_ORDER) {
        Some(value) => Order::parse(value)?,
        None => Order::default(),
    };
    let owner = params.get(OWNER_FILTER).map(String::as_str);
    Ok(Json(store.list_tasks(&user, owner, order)))
}

pub async fn update_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Task>, StoreError> {
    let mut store = db.write().await;
    let user = store.authenticate(bearer(&headers))?;
    let task = store.update_task(&user, &id, input.text, input.completed)?;
    debug!(task = %task.id, completed = task.completed, "updated task");
    Ok(Json(task))
}
