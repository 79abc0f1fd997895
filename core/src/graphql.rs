//! Stateless request builder and response parser for the GraphQL variant.
//!
//! # Design
//! Every operation is one named document posted to `{base_url}/graphql` as
//! `{query, variables, operationName}`. Parsing goes through the standard
//! `{data, errors}` envelope: errors are inspected first and mapped to
//! `ApiError` by their `extensions.code`, and only then is the operation's
//! root field deserialized.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{
    check_status, parse_json, to_json, to_value, HttpMethod, HttpRequest, HttpResponse,
};
use crate::types::{AccessToken, Credentials, NewTask, Task, TaskId, TaskPatch, User, UserId};

pub const CREATE_TASK: &str = "mutation CreateTask($data: TaskCreateInput!) {
  createTask(data: $data) { id text completed createdAt }
}";

pub const TASKS: &str = "query Tasks($where: TaskWhereInput, $orderBy: [TaskOrderByInput!]) {
  tasks(where: $where, orderBy: $orderBy) { id text completed createdAt }
}";

pub const UPDATE_TASK: &str =
    "mutation UpdateTask($data: TaskUpdateInput!, $where: TaskWhereUniqueInput!) {
  updateTask(data: $data, where: $where) { id text completed createdAt }
}";

pub const ME: &str = "query Me {
  me { id }
}";

pub const LOGIN: &str = "mutation Login($credentials: Credentials!) {
  login(credentials: $credentials) { accessToken }
}";

pub const SIGNUP: &str = "mutation Signup($credentials: Credentials!) {
  signup(credentials: $credentials) { accessToken }
}";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorItem {
    message: String,
    #[serde(default)]
    extensions: Option<Extensions>,
}

#[derive(Debug, Deserialize)]
struct Extensions {
    code: Option<String>,
}

/// Synchronous, stateless client for the `/graphql` endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/graphql", base_url.trim_end_matches('/')),
        }
    }

    fn build(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(&json!({
            "query": query,
            "variables": variables,
            "operationName": operation,
        }))?;
        Ok(HttpRequest::new(HttpMethod::Post, self.endpoint.clone())
            .json_body(body)
            .bearer(token))
    }

    pub fn build_create_task(
        &self,
        input: &NewTask,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let variables = json!({
            "data": {
                "text": input.text,
                "completed": input.completed,
                "uid": { "id": input.uid.id },
            }
        });
        self.build("CreateTask", CREATE_TASK, variables, token)
    }

    pub fn build_list_tasks(
        &self,
        owner: &UserId,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let variables = json!({
            "where": { "uid": { "id": owner } },
            "orderBy": [{ "createdAt": "asc" }],
        });
        self.build("Tasks", TASKS, variables, token)
    }

    pub fn build_update_task(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let variables = json!({ "data": to_value(patch)?, "where": { "id": id } });
        self.build("UpdateTask", UPDATE_TASK, variables, token)
    }

    pub fn build_me(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.build("Me", ME, json!({}), Some(token))
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build("Login", LOGIN, json!({ "credentials": credentials }), None)
    }

    pub fn build_signup(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build("Signup", SIGNUP, json!({ "credentials": credentials }), None)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_field(&response, "createTask")
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        parse_field(&response, "tasks")
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_field::<Option<Task>>(&response, "updateTask")?.ok_or(ApiError::NotFound)
    }

    /// A null `me` means the token is not recognized.
    pub fn parse_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_field::<Option<User>>(&response, "me")?.ok_or(ApiError::Unauthorized)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        parse_field(&response, "login")
    }

    pub fn parse_signup(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        parse_field(&response, "signup")
    }
}

fn parse_field<T: DeserializeOwned>(response: &HttpResponse, field: &str) -> Result<T, ApiError> {
    check_status(response, 200)?;
    let envelope: Envelope = parse_json(&response.body)?;
    if !envelope.errors.is_empty() {
        return Err(map_errors(envelope.errors));
    }
    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn map_errors(errors: Vec<GraphqlErrorItem>) -> ApiError {
    let code = errors
        .iter()
        .find_map(|e| e.extensions.as_ref().and_then(|ext| ext.code.clone()));
    let message = errors
        .into_iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ");
    match code.as_deref() {
        Some("UNAUTHENTICATED") => ApiError::Unauthorized,
        Some("BAD_USER_INPUT") => ApiError::Validation(message),
        Some("NOT_FOUND") => ApiError::NotFound,
        _ => ApiError::Graphql(message),
    }
}
