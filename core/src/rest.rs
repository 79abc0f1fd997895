//! Stateless request builder and response parser for the REST variant.
//!
//! # Design
//! `RestClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! bearer token is passed in per call, so the same client serves every
//! session.

use crate::error::ApiError;
use crate::http::{check_status, parse_json, to_json, HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryString;
use crate::types::{AccessToken, Credentials, NewTask, Task, TaskId, TaskPatch, User, UserId};

/// Synchronous, stateless client for the `/api` endpoints.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_create_task(
        &self,
        input: &NewTask,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(
            HttpRequest::new(HttpMethod::Post, format!("{}/api/tasks", self.base_url))
                .json_body(body)
                .bearer(token),
        )
    }

    /// Tasks owned by `owner`, oldest first.
    pub fn build_list_tasks(&self, owner: &UserId, token: Option<&str>) -> HttpRequest {
        let query = QueryString::new()
            .push(&["where", "uid", "id"], owner.as_str())
            .push(&["orderBy", "createdAt"], "asc");
        HttpRequest::new(
            HttpMethod::Get,
            format!("{}/api/tasks?{}", self.base_url, query.encode()),
        )
        .bearer(token)
    }

    pub fn build_update_task(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(patch)?;
        Ok(
            HttpRequest::new(HttpMethod::Patch, format!("{}/api/tasks/{id}", self.base_url))
                .json_body(body)
                .bearer(token),
        )
    }

    pub fn build_me(&self, token: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("{}/api/me", self.base_url)).bearer(Some(token))
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let body = to_json(credentials)?;
        Ok(HttpRequest::new(HttpMethod::Post, format!("{}/api/login", self.base_url)).json_body(body))
    }

    pub fn build_signup(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let body = to_json(credentials)?;
        Ok(HttpRequest::new(HttpMethod::Post, format!("{}/api/signup", self.base_url)).json_body(body))
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response, 201)?;
        parse_json(&response.body)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response, 200)?;
        parse_json(&response.body)
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response, 200)?;
        parse_json(&response.body)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        parse_json(&response.body)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        check_status(&response, 200)?;
        parse_json(&response.body)
    }

    pub fn parse_signup(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        check_status(&response, 201)?;
        parse_json(&response.body)
    }
}
