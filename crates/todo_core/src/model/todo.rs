//! Todo entity, partial-update descriptor, and response projection.
//!
//! # Responsibility
//! - Define the todo record shape shared by every repository variant.
//! - Keep the storage identifier opaque behind `TodoId`.
//!
//! # Invariants
//! - `id` is assigned by the repository on create and never changes.
//! - `completed` starts as `false`.
//! - `TodoId` renders as 32 lowercase hex digits and parses back to itself.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, repository-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the canonical (or any UUID) text form.
    pub fn parse(value: &str) -> Result<Self, InvalidTodoId> {
        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| InvalidTodoId(value.to_string()))
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for TodoId {
    type Err = InvalidTodoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Text that does not parse into a `TodoId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTodoId(pub String);

impl Display for InvalidTodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid todo id: `{}`", self.0)
    }
}

impl Error for InvalidTodoId {}

/// Todo fields supplied on create, before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub email: String,
    pub title: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl NewTodo {
    /// Attaches the repository-assigned id.
    pub fn with_id(self, id: TodoId) -> Todo {
        Todo {
            id,
            email: self.email,
            title: self.title,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// Stored todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    /// Owner email. Not enforced against the user store.
    pub email: String,
    pub title: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Todo {
    /// Applies the present fields of `update` in place.
    pub fn apply(&mut self, update: &TodoUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }

    pub fn to_response(&self) -> TodoResponse {
        TodoResponse {
            id: self.id.to_string(),
            email: self.email.clone(),
            title: self.title.clone(),
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Todo projection with the id rendered as canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: String,
    pub email: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
}

impl From<Todo> for TodoResponse {
    fn from(value: Todo) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email,
            title: value.title,
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}
