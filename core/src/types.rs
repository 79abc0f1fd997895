//! Domain DTOs shared by the REST and GraphQL clients.
//!
//! # Design
//! These types mirror the mock backend's schema but are defined
//! independently; integration tests catch schema drift between the crates.
//! Identifiers are opaque strings assigned by the backend, wrapped in
//! newtypes so a task id can never be passed where a user id is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

/// Backend-assigned user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

string_id!(TaskId);
string_id!(UserId);

/// The signed-in user. Only the id is ever fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
}

/// A single task as returned by the backend.
///
/// `owner` travels as `uid: { id }`. GraphQL selections leave it out, so it is
/// optional on the parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub uid: User,
}

impl NewTask {
    pub fn new(text: impl Into<String>, owner: UserId) -> Self {
        Self {
            text: text.into(),
            completed: false,
            uid: User { id: owner },
        }
    }
}

/// Partial update for a task. Omitted fields are left untouched by the
/// backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// The single-field patch that flips `completed`.
    pub fn toggle(task: &Task) -> Self {
        Self {
            text: None,
            completed: Some(!task.completed),
        }
    }
}

/// Login/signup payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token returned by a credential exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_serializes_owner_as_uid() {
        let input = NewTask::new("Buy milk", UserId::from("u1"));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "Buy milk", "completed": false, "uid": {"id": "u1"}})
        );
    }

    #[test]
    fn task_parses_without_owner() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","text":"Walk dog","completed":true,"createdAt":"2024-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(task.id, TaskId::from("t1"));
        assert!(task.completed);
        assert!(task.owner.is_none());
    }

    #[test]
    fn task_parses_with_owner() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","text":"x","completed":false,"createdAt":"2024-01-02T03:04:05.123Z","uid":{"id":"u9"}}"#,
        )
        .unwrap();
        assert_eq!(task.owner.unwrap().id.as_str(), "u9");
    }

    #[test]
    fn toggle_patch_negates_and_sends_one_field() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","text":"x","completed":false,"createdAt":"2024-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        let json = serde_json::to_value(TaskPatch::toggle(&task)).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }

    #[test]
    fn access_token_uses_camel_case() {
        let token: AccessToken = serde_json::from_str(r#"{"accessToken":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
    }
}
