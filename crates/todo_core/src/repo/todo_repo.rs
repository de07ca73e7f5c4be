//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist todos and assign their identifiers.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - An empty `email` filter selects every todo.
//! - `list` orders by `created_at ASC`, ties broken by insertion order.
//! - Read paths reject undecodable rows instead of masking them.

use crate::context::RequestContext;
use crate::db::migrations::ensure_table;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoUpdate};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    email,
    title,
    completed,
    created_at
FROM todos";

/// Storage contract required by `TodoService`.
pub trait TodoRepository {
    /// Lists todos owned by `email`, or all todos when `email` is empty.
    fn list(&self, ctx: &RequestContext, email: &str) -> RepoResult<Vec<Todo>>;
    /// Stores `todo` under a freshly assigned id.
    fn create(&self, ctx: &RequestContext, todo: NewTodo) -> RepoResult<Todo>;
    /// Applies the present fields of `update` and returns the stored result.
    fn update(&self, ctx: &RequestContext, id: TodoId, update: &TodoUpdate) -> RepoResult<Todo>;
    fn delete(&self, ctx: &RequestContext, id: TodoId) -> RepoResult<()>;
    /// Deletes todos owned by `email`, or all todos when `email` is empty.
    fn clear(&self, ctx: &RequestContext, email: &str) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "todos")?;
        Ok(Self { conn })
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn list(&self, ctx: &RequestContext, email: &str) -> RepoResult<Vec<Todo>> {
        ctx.check()?;

        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        if !email.is_empty() {
            sql.push_str(" AND email = ?");
            bind_values.push(Value::Text(email.to_string()));
        }
        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn create(&self, ctx: &RequestContext, todo: NewTodo) -> RepoResult<Todo> {
        ctx.check()?;

        let todo = todo.with_id(TodoId::generate());
        self.conn.execute(
            "INSERT INTO todos (uuid, email, title, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                todo.id.to_string(),
                todo.email.as_str(),
                todo.title.as_str(),
                bool_to_int(todo.completed),
                todo.created_at,
            ],
        )?;
        Ok(todo)
    }

    fn update(&self, ctx: &RequestContext, id: TodoId, update: &TodoUpdate) -> RepoResult<Todo> {
        ctx.check()?;

        let tx = self.conn.unchecked_transaction()?;
        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(title) = &update.title {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(completed) = update.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        if !assignments.is_empty() {
            bind_values.push(Value::Text(id.to_string()));
            let sql = format!("UPDATE todos SET {} WHERE uuid = ?;", assignments.join(", "));
            let changed = tx.execute(&sql, params_from_iter(bind_values))?;
            if changed == 0 {
                return Err(RepoError::TodoNotFound(id));
            }
        }

        let updated = self.get(id)?.ok_or(RepoError::TodoNotFound(id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&self, ctx: &RequestContext, id: TodoId) -> RepoResult<()> {
        ctx.check()?;

        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::TodoNotFound(id));
        }
        Ok(())
    }

    fn clear(&self, ctx: &RequestContext, email: &str) -> RepoResult<()> {
        ctx.check()?;

        if email.is_empty() {
            self.conn.execute("DELETE FROM todos;", [])?;
        } else {
            self.conn
                .execute("DELETE FROM todos WHERE email = ?1;", [email])?;
        }
        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let id = TodoId::parse(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    Ok(Todo {
        id,
        email: row.get("email")?,
        title: row.get("title")?,
        completed,
        created_at: row.get("created_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

