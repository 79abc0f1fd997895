//! Accounts, sessions and tasks shared by both API surfaces.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub uid: Owner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(StoreError::Invalid(format!("unknown sort order: {other}"))),
        }
    }
}

#[derive(Debug)]
struct Account {
    id: String,
    password: String,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, String>,
    tasks: Vec<Task>,
}

impl Store {
    pub fn signup(&mut self, username: &str, password: &str) -> Result<String, StoreError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(StoreError::Invalid(
                "username and password are required".to_string(),
            ));
        }
        if self.accounts.contains_key(username) {
            return Err(StoreError::Conflict(format!("{username} is already taken")));
        }
        let id = Uuid::new_v4().to_string();
        self.accounts.insert(
            username.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        Ok(self.open_session(id))
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<String, StoreError> {
        let id = match self.accounts.get(username) {
            Some(account) if account.password == password => account.id.clone(),
            _ => return Err(StoreError::Unauthorized),
        };
        Ok(self.open_session(id))
    }

    fn open_session(&mut self, user_id: String) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user_id);
        token
    }

    /// The user id behind `token`.
    pub fn authenticate(&self, token: Option<&str>) -> Result<String, StoreError> {
        token
            .and_then(|token| self.sessions.get(token))
            .cloned()
            .ok_or(StoreError::Unauthorized)
    }

    pub fn create_task(
        &mut self,
        user: &str,
        text: &str,
        completed: bool,
        owner: &str,
    ) -> Result<Task, StoreError> {
        if owner != user {
            return Err(StoreError::Forbidden);
        }
        if text.trim().is_empty() {
            return Err(StoreError::Invalid("text must not be empty".to_string()));
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed,
            created_at: Utc::now(),
            uid: Owner {
                id: owner.to_string(),
            },
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Tasks visible to `user`, optionally narrowed to `owner`, ordered by
    /// creation time. Ties keep insertion order.
    pub fn list_tasks(&self, user: &str, owner: Option<&str>, order: Order) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.uid.id == user)
            .filter(|t| owner.map_or(true, |owner| t.uid.id == owner))
            .cloned()
            .collect();
        match order {
            Order::Asc => tasks.sort_by_key(|t| t.created_at),
            Order::Desc => {
                tasks.reverse();
                tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        tasks
    }

    /// Apply the fields that are present. Tasks owned by someone else look
    /// missing.
    pub fn update_task(
        &mut self,
        user: &str,
        id: &str,
        text: Option<String>,
        completed: Option<bool>,
    ) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.uid.id == user)
            .ok_or(StoreError::NotFound)?;
        if let Some(text) = text {
            if text.trim().is_empty() {
                return Err(StoreError::Invalid("text must not be empty".to_string()));
            }
            task.text = text;
        }
        if let Some(completed) = completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }
}
