//! Todo use-cases: create, filtered list, partial update, delete, clear.
//!
//! # Invariants
//! - Owner emails and filters are normalized; titles are trimmed.
//! - `created_at` comes from the injected clock, never directly from the
//!   wall clock.
//! - A supplied title that trims to empty is rejected; an update carrying
//!   only `completed` is always accepted as input.

use crate::clock::{Clock, SystemClock};
use crate::context::RequestContext;
use crate::model::todo::{NewTodo, TodoId, TodoResponse, TodoUpdate};
use crate::normalize::{normalize_email, normalize_text};
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoError;
use crate::service::ErrorKind;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from todo service operations.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Email/title missing or blank, or an update with no fields.
    InvalidInput,
    /// Identifier text does not parse.
    InvalidId(String),
    /// No todo has the given id.
    NotFound(TodoId),
    /// Repository-level failure.
    Store(RepoError),
}

impl TodoServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput => ErrorKind::InvalidInput,
            Self::InvalidId(_) => ErrorKind::InvalidId,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid todo input"),
            Self::InvalidId(value) => write!(f, "invalid todo id: `{value}`"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Store(err) => write!(f, "todo store failure: {err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TodoNotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Todo service facade over a repository implementation and a clock.
pub struct TodoService<R: TodoRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service stamping todos with the wall clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TodoRepository, C: Clock> TodoService<R, C> {
    /// Creates a service stamping todos with `clock`.
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Lists todos for `email`, or every todo when the filter is blank.
    pub fn list(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Vec<TodoResponse>, TodoServiceError> {
        let email = normalize_email(email);
        let todos = self.repo.list(ctx, &email)?;
        debug!(
            "event=todo_list module=service status=ok filtered={} count={}",
            !email.is_empty(),
            todos.len()
        );
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    /// Creates an incomplete todo owned by `email`.
    ///
    /// # Errors
    /// - `InvalidInput` when email or title is blank after normalization.
    /// - `Store` for repository failures.
    pub fn create(
        &self,
        ctx: &RequestContext,
        email: &str,
        title: &str,
    ) -> Result<TodoResponse, TodoServiceError> {
        let email = normalize_email(email);
        let title = normalize_text(title);
        if email.is_empty() || title.is_empty() {
            return Err(TodoServiceError::InvalidInput);
        }

        let todo = NewTodo {
            email,
            title,
            completed: false,
            created_at: self.clock.now_ms(),
        };
        let created = self.repo.create(ctx, todo).map_err(|err| {
            warn!("event=todo_create module=service status=error error={err}");
            TodoServiceError::from(err)
        })?;
        info!(
            "event=todo_create module=service status=ok todo_id={}",
            created.id
        );
        Ok(created.to_response())
    }

    /// Applies a partial update to the todo identified by `id`.
    ///
    /// Checks run in order: empty update, id parse, blank title.
    pub fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        update: TodoUpdate,
    ) -> Result<TodoResponse, TodoServiceError> {
        if update.is_empty() {
            return Err(TodoServiceError::InvalidInput);
        }
        let todo_id = parse_id(id)?;

        let title = match update.title {
            Some(title) => {
                let title = normalize_text(&title);
                if title.is_empty() {
                    return Err(TodoServiceError::InvalidInput);
                }
                Some(title)
            }
            None => None,
        };
        let update = TodoUpdate {
            title,
            completed: update.completed,
        };

        let updated = self.repo.update(ctx, todo_id, &update)?;
        info!("event=todo_update module=service status=ok todo_id={todo_id}");
        Ok(updated.to_response())
    }

    /// Deletes the todo identified by `id`.
    pub fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), TodoServiceError> {
        let todo_id = parse_id(id)?;
        self.repo.delete(ctx, todo_id)?;
        info!("event=todo_delete module=service status=ok todo_id={todo_id}");
        Ok(())
    }

    /// Deletes todos for `email`, or every todo when the filter is blank.
    pub fn clear(&self, ctx: &RequestContext, email: &str) -> Result<(), TodoServiceError> {
        let email = normalize_email(email);
        self.repo.clear(ctx, &email)?;
        info!(
            "event=todo_clear module=service status=ok filtered={}",
            !email.is_empty()
        );
        Ok(())
    }
}

fn parse_id(value: &str) -> Result<TodoId, TodoServiceError> {
    TodoId::parse(value).map_err(|err| TodoServiceError::InvalidId(err.0))
}
