//! In-memory stand-in for the hosted to-do backend.
//!
//! Serves the REST endpoints under `/api` and the GraphQL operations under
//! `/graphql` from one shared [`Store`]. GraphQL requests are dispatched on
//! `operationName`; the query text is not parsed.

mod graphql;
mod rest;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

pub use store::{Owner, Store, StoreError, Task};

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/signup", post(rest::signup))
        .route("/api/login", post(rest::login))
        .route("/api/me", get(rest::me))
        .route("/api/tasks", get(rest::list_tasks).post(rest::create_task))
        .route("/api/tasks/{id}", patch(rest::update_task))
        .route("/graphql", post(graphql::execute))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
