//! Identity and credential exchange.

use std::sync::Arc;

use tracing::debug;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::requests::report;
use crate::token::TokenStore;
use crate::types::{AccessToken, Credentials, User};

#[derive(Clone)]
pub struct SessionAccessor {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionAccessor {
    pub fn new(
        backend: Arc<dyn Backend>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            tokens,
            notifier,
        }
    }

    /// The user behind the stored token. Without a token no request is made.
    pub fn me(&self) -> Option<User> {
        let Some(token) = self.tokens.load() else {
            debug!("no stored token, skipping identity request");
            return None;
        };
        self.backend
            .me(&token)
            .map_err(|e| report(self.notifier.as_ref(), "fetch current user", &e))
            .ok()
    }

    pub fn login(&self, username: &str, password: &str) -> Option<User> {
        let credentials = Credentials::new(username, password);
        self.exchange("log in", self.backend.login(&credentials))
    }

    pub fn signup(&self, username: &str, password: &str) -> Option<User> {
        let credentials = Credentials::new(username, password);
        self.exchange("sign up", self.backend.signup(&credentials))
    }

    fn exchange(&self, action: &str, result: Result<AccessToken, ApiError>) -> Option<User> {
        match result {
            Ok(token) => {
                if let Err(e) = self.tokens.store(&token.access_token) {
                    self.notifier
                        .notify(&format!("Signed in, but the session could not be saved: {e}"));
                }
                self.me()
            }
            Err(e) => {
                report(self.notifier.as_ref(), action, &e);
                None
            }
        }
    }
}
