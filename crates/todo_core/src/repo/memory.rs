//! In-memory repository variants for tests and local tooling.
//!
//! # Responsibility
//! - Mirror the SQLite repositories' observable behavior without I/O.
//!
//! # Invariants
//! - Each repository serializes all access behind one mutex; every method
//!   holds it for its whole critical section.
//! - Clones share the same underlying data.
//! - Todos are kept in insertion order and listed stably sorted by
//!   `created_at`, so equal timestamps keep creation order.

use crate::context::RequestContext;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoUpdate};
use crate::model::user::User;
use crate::repo::todo_repo::TodoRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mutex-guarded user store keyed by email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<BTreeMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_email(&self, ctx: &RequestContext, email: &str) -> RepoResult<User> {
        ctx.check()?;

        self.users
            .lock()
            .get(email)
            .cloned()
            .ok_or_else(|| RepoError::UserNotFound(email.to_string()))
    }

    fn insert(&self, ctx: &RequestContext, user: &User) -> RepoResult<()> {
        ctx.check()?;

        self.users.lock().insert(user.email.clone(), user.clone());
        Ok(())
    }

    fn list(&self, ctx: &RequestContext) -> RepoResult<Vec<User>> {
        ctx.check()?;

        Ok(self.users.lock().values().cloned().collect())
    }

    fn clear(&self, ctx: &RequestContext) -> RepoResult<()> {
        ctx.check()?;

        self.users.lock().clear();
        Ok(())
    }
}

/// Mutex-guarded todo store in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos, regardless of owner.
    pub fn len(&self) -> usize {
        self.todos.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.lock().is_empty()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn list(&self, ctx: &RequestContext, email: &str) -> RepoResult<Vec<Todo>> {
        ctx.check()?;

        let mut todos: Vec<Todo> = self
            .todos
            .lock()
            .iter()
            .filter(|todo| email.is_empty() || todo.email == email)
            .cloned()
            .collect();
        todos.sort_by_key(|todo| todo.created_at);
        Ok(todos)
    }

    fn create(&self, ctx: &RequestContext, todo: NewTodo) -> RepoResult<Todo> {
        ctx.check()?;

        let mut todos = self.todos.lock();
        let mut id = TodoId::generate();
        while todos.iter().any(|existing| existing.id == id) {
            id = TodoId::generate();
        }
        let todo = todo.with_id(id);
        todos.push(todo.clone());
        Ok(todo)
    }

    fn update(&self, ctx: &RequestContext, id: TodoId, update: &TodoUpdate) -> RepoResult<Todo> {
        ctx.check()?;

        let mut todos = self.todos.lock();
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(RepoError::TodoNotFound(id))?;
        todo.apply(update);
        Ok(todo.clone())
    }

    fn delete(&self, ctx: &RequestContext, id: TodoId) -> RepoResult<()> {
        ctx.check()?;

        let mut todos = self.todos.lock();
        let position = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(RepoError::TodoNotFound(id))?;
        todos.remove(position);
        Ok(())
    }

    fn clear(&self, ctx: &RequestContext, email: &str) -> RepoResult<()> {
        ctx.check()?;

        self.todos
            .lock()
            .retain(|todo| !email.is_empty() && todo.email != email);
        Ok(())
    }
}
