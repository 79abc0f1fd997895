//! User-facing failure notices.

use tracing::warn;

/// Receives the notice raised when a request fails and its result is dropped.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits notices as `warn` events under the `todo_client::notice` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(target: "todo_client::notice", "{message}");
    }
}
