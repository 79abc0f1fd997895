//! Client configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `TODO_API_URL` | `http://127.0.0.1:3000` |
//! | `TODO_API_KIND` | `rest` (or `graphql`) |
//! | `TODO_TOKEN_DIR` | unset: token kept in memory |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::app::TodoApp;
use crate::backend::{Backend, GraphqlBackend, RestBackend};
use crate::error::ConfigError;
use crate::notify::TracingNotifier;
use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::transport::UreqTransport;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiKind {
    #[default]
    Rest,
    Graphql,
}

impl FromStr for ApiKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "http" => Ok(ApiKind::Rest),
            "graphql" | "gql" => Ok(ApiKind::Graphql),
            _ => Err(ConfigError::Invalid {
                key: "TODO_API_KIND",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api: ApiKind,
    pub token_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api: ApiKind::default(),
            token_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = get("TODO_API_URL") {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    key: "TODO_API_URL",
                    value: url,
                });
            }
            config.base_url = url;
        }
        if let Some(kind) = get("TODO_API_KIND") {
            config.api = kind.parse()?;
        }
        config.token_dir = get("TODO_TOKEN_DIR").map(PathBuf::from);
        Ok(config)
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        let transport = UreqTransport::new();
        match self.api {
            ApiKind::Rest => Arc::new(RestBackend::new(&self.base_url, transport)),
            ApiKind::Graphql => Arc::new(GraphqlBackend::new(&self.base_url, transport)),
        }
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token_dir {
            Some(dir) => Arc::new(FileTokenStore::new(dir)),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// A `TodoApp` over a blocking `ureq` transport, not yet started.
    pub fn connect(&self) -> TodoApp {
        TodoApp::new(self.backend(), self.token_store(), Arc::new(TracingNotifier))
    }
}
