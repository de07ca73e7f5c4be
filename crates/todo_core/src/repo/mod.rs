//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define storage-agnostic contracts for users and todos.
//! - Provide a SQLite-backed variant and an in-memory variant.
//!
//! # Invariants
//! - Repositories perform no validation or normalization.
//! - Every method checks the request context before touching storage.
//! - "No matching record" is reported as a `NotFound` variant, never as a
//!   transport error.

use crate::context::ContextError;
use crate::db::DbError;
use crate::model::todo::TodoId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod todo_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user and todo storage operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UserNotFound(String),
    TodoNotFound(TodoId),
    InvalidData(String),
    Context(ContextError),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::TodoNotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(email) => write!(f, "user not found: {email}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Context(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::UserNotFound(_) | Self::TodoNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ContextError> for RepoError {
    fn from(value: ContextError) -> Self {
        Self::Context(value)
    }
}
