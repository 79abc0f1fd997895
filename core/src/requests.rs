//! Task operations with failures folded into "no result".
//!
//! # Design
//! The caller never sees an `ApiError`. Each failure is reported once through
//! the `Notifier` (with its `ErrorClass`, so a log reader can tell a dropped
//! connection from an expired session) and replaced by `None` or an empty
//! list.

use std::sync::Arc;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::token::TokenStore;
use crate::types::{NewTask, Task, TaskPatch, UserId};

#[derive(Clone)]
pub struct TaskRequests {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl TaskRequests {
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

    /// Create a task with `completed = false`.
    pub fn create(&self, text: &str, owner: &UserId) -> Option<Task> {
        let input = NewTask::new(text, owner.clone());
        let token = self.tokens.load();
        self.backend
            .create_task(&input, token.as_deref())
            .map_err(|e| report(self.notifier.as_ref(), "create task", &e))
            .ok()
    }

    /// All tasks owned by `owner`, oldest first. Empty on failure.
    pub fn get_all(&self, owner: &UserId) -> Vec<Task> {
        let token = self.tokens.load();
        match self.backend.list_tasks(owner, token.as_deref()) {
            Ok(mut tasks) => {
                // Stable, so backend order survives among equal timestamps.
                tasks.sort_by_key(|task| task.created_at);
                tasks
            }
            Err(e) => {
                report(self.notifier.as_ref(), "load tasks", &e);
                Vec::new()
            }
        }
    }

    /// Flip `completed` and return the backend's copy. Last write wins.
    pub fn update(&self, task: &Task) -> Option<Task> {
        let patch = TaskPatch::toggle(task);
        let token = self.tokens.load();
        self.backend
            .update_task(&task.id, &patch, token.as_deref())
            .map_err(|e| report(self.notifier.as_ref(), "update task", &e))
            .ok()
    }
}

pub(crate) fn report(notifier: &dyn Notifier, action: &str, error: &ApiError) {
    notifier.notify(&format!(
        "Failed to {action} ({:?}): {error}",
        error.class()
    ));
}
