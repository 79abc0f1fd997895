//! One trait over both wire variants.
//!
//! # Design
//! `RestBackend` and `GraphqlBackend` pair a stateless wire client with a
//! `Transport`. Each method is exactly one build, one round-trip and one
//! parse, so callers see identical signatures whichever variant is
//! configured.

use crate::error::ApiError;
use crate::graphql::GraphqlClient;
use crate::rest::RestClient;
use crate::transport::Transport;
use crate::types::{AccessToken, Credentials, NewTask, Task, TaskId, TaskPatch, User, UserId};

pub trait Backend: Send + Sync {
    fn create_task(&self, input: &NewTask, token: Option<&str>) -> Result<Task, ApiError>;

    fn list_tasks(&self, owner: &UserId, token: Option<&str>) -> Result<Vec<Task>, ApiError>;

    fn update_task(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        token: Option<&str>,
    ) -> Result<Task, ApiError>;

    fn me(&self, token: &str) -> Result<User, ApiError>;

    fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;

    fn signup(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;
}

pub struct RestBackend<T> {
    client: RestClient,
    transport: T,
}

impl<T: Transport> RestBackend<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: RestClient::new(base_url),
            transport,
        }
    }
}

impl<T: Transport> Backend for RestBackend<T> {
    fn create_task(&self, input: &NewTask, token: Option<&str>) -> Result<Task, ApiError> {
        let req = self.client.build_create_task(input, token)?;
        self.client.parse_create_task(self.transport.execute(&req)?)
    }

    fn list_tasks(&self, owner: &UserId, token: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let req = self.client.build_list_tasks(owner, token);
        self.client.parse_list_tasks(self.transport.execute(&req)?)
    }

    fn update_task(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        token: Option<&str>,
    ) -> Result<Task, ApiError> {
        let req = self.client.build_update_task(id, patch, token)?;
        self.client.parse_update_task(self.transport.execute(&req)?)
    }

    fn me(&self, token: &str) -> Result<User, ApiError> {
        let req = self.client.build_me(token);
        self.client.parse_me(self.transport.execute(&req)?)
    }

    fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let req = self.client.build_login(credentials)?;
        self.client.parse_login(self.transport.execute(&req)?)
    }

    fn signup(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let req = self.client.build_signup(credentials)?;
        self.client.parse_signup(self.transport.execute(&req)?)
    }
}

pub struct GraphqlBackend<T> {
    client: GraphqlClient,
    transport: T,
}

impl<T: Transport> GraphqlBackend<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: GraphqlClient::new(base_url),
            transport,
        }
    }
}

impl<T: Transport> Backend for GraphqlBackend<T> {
    fn create_task(&self, input: &NewTask, token: Option<&str>) -> Result<Task, ApiError> {
        let req = self.client.build_create_task(input, token)?;
        self.client.parse_create_task(self.transport.execute(&req)?)
    }

    fn list_tasks(&self, owner: &UserId, token: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let req = self.client.build_list_tasks(owner, token)?;
        self.client.parse_list_tasks(self.transport.execute(&req)?)
    }

    fn update_task(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        token: Option<&str>,
    ) -> Result<Task, ApiError> {
        let req = self.client.build_update_task(id, patch, token)?;
        self.client.parse_update_task(self.transport.execute(&req)?)
    }

    fn me(&self, token: &str) -> Result<User, ApiError> {
        let req = self.client.build_me(token)?;
        self.client.parse_me(self.transport.execute(&req)?)
    }

    fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let req = self.client.build_login(credentials)?;
        self.client.parse_login(self.transport.execute(&req)?)
    }

    fn signup(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let req = self.client.build_signup(credentials)?;
        self.client.parse_signup(self.transport.execute(&req)?)
    }
}
