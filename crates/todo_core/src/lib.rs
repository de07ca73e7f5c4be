//! Core domain logic for the todo backend.
//! This crate owns validation, normalization, and error semantics for users
//! and todos, over storage-agnostic repository contracts.

pub mod clock;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{ContextError, RequestContext};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::todo::{InvalidTodoId, NewTodo, Todo, TodoId, TodoResponse, TodoUpdate};
pub use model::user::{PublicUser, User};
pub use normalize::{normalize_email, normalize_text};
pub use repo::memory::{InMemoryTodoRepository, InMemoryUserRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::todo_service::{TodoService, TodoServiceError};
pub use service::user_service::{UserService, UserServiceError};
pub use service::ErrorKind;

/// Minimal health-check probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
