//! Application state holder: the current user and their task list.
//!
//! # Design
//! `TodoApp` is the only place state changes. Every transition reads a
//! result from the request layer and either applies it or does nothing; there
//! is no error path. The only sequencing is "install user, then fetch their
//! tasks", which runs after `start`, `login` and `signup`.

use std::sync::Arc;

use tracing::info;

use crate::backend::Backend;
use crate::notify::Notifier;
use crate::requests::TaskRequests;
use crate::session::SessionAccessor;
use crate::token::TokenStore;
use crate::types::{Task, User};

pub struct TodoApp {
    requests: TaskRequests,
    session: SessionAccessor,
    user: Option<User>,
    tasks: Vec<Task>,
}

impl TodoApp {
    pub fn new(
        backend: Arc<dyn Backend>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests: TaskRequests::new(backend.clone(), tokens.clone(), notifier.clone()),
            session: SessionAccessor::new(backend, tokens, notifier),
            user: None,
            tasks: Vec::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Restore the session from the stored token, if any.
    pub fn start(&mut self) {
        if let Some(user) = self.session.me() {
            self.install_user(user);
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> bool {
        match self.session.login(username, password) {
            Some(user) => {
                self.install_user(user);
                true
            }
            None => false,
        }
    }

    pub fn signup(&mut self, username: &str, password: &str) -> bool {
        match self.session.signup(username, password) {
            Some(user) => {
                self.install_user(user);
                true
            }
            None => false,
        }
    }

    /// Create a task and append it. New tasks are the newest, so the list
    /// stays ordered without re-sorting.
    pub fn add_task(&mut self, text: &str) -> Option<&Task> {
        let owner = self.user.as_ref()?.id.clone();
        let task = self.requests.create(text, &owner)?;
        self.tasks.push(task);
        self.tasks.last()
    }

    /// Toggle `completed` and replace the entry with the backend's copy.
    pub fn toggle_completed(&mut self, task: &Task) -> Option<&Task> {
        let updated = self.requests.update(task)?;
        let index = self.tasks.iter().position(|t| t.id == updated.id)?;
        self.tasks[index] = updated;
        self.tasks.get(index)
    }

    fn install_user(&mut self, user: User) {
        info!(user = %user.id, "session established");
        let id = user.id.clone();
        self.user = Some(user);
        self.tasks = self.requests.get_all(&id);
    }
}
