//! Client for a hosted to-do backend, over REST or GraphQL.
//!
//! # Overview
//! `RestClient` and `GraphqlClient` build `HttpRequest` values and parse
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). A `Transport` executes the round-trip, a `Backend` ties the two
//! together behind one signature per operation, and `TodoApp` holds the
//! current user and task list.
//!
//! # Design
//! - The wire clients are stateless; the bearer token is passed per call.
//! - `TaskRequests` and `SessionAccessor` fold every `ApiError` into an
//!   absent result plus a `Notifier` notice, so `TodoApp` has no error path.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod graphql;
pub mod http;
pub mod notify;
pub mod query;
pub mod requests;
pub mod rest;
pub mod session;
pub mod token;
pub mod transport;
pub mod types;

pub use app::TodoApp;
pub use backend::{Backend, GraphqlBackend, RestBackend};
pub use config::{ApiKind, ClientConfig};
pub use error::{ApiError, ConfigError, ErrorClass};
pub use graphql::GraphqlClient;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Notifier, TracingNotifier};
pub use requests::TaskRequests;
pub use rest::RestClient;
pub use session::SessionAccessor;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use transport::{Transport, UreqTransport};
pub use types::{AccessToken, Credentials, NewTask, Task, TaskId, TaskPatch, User, UserId};
