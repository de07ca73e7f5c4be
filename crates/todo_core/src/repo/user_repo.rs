//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `find_by_email` reports a missing row as `RepoError::UserNotFound`.
//! - `list` returns users ordered by email.

use crate::context::RequestContext;
use crate::db::migrations::ensure_table;
use crate::model::user::User;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Storage contract required by `UserService`.
pub trait UserRepository {
    fn find_by_email(&self, ctx: &RequestContext, email: &str) -> RepoResult<User>;
    fn insert(&self, ctx: &RequestContext, user: &User) -> RepoResult<()>;
    fn list(&self, ctx: &RequestContext) -> RepoResult<Vec<User>>;
    fn clear(&self, ctx: &RequestContext) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "users")?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_email(&self, ctx: &RequestContext, email: &str) -> RepoResult<User> {
        ctx.check()?;

        self.conn
            .query_row(
                "SELECT email, password FROM users WHERE email = ?1;",
                [email],
                |row| {
                    Ok(User {
                        email: row.get("email")?,
                        password: row.get("password")?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| RepoError::UserNotFound(email.to_string()))
    }

    fn insert(&self, ctx: &RequestContext, user: &User) -> RepoResult<()> {
        ctx.check()?;

        self.conn.execute(
            "INSERT INTO users (email, password) VALUES (?1, ?2);",
            params![user.email.as_str(), user.password.as_str()],
        )?;
        Ok(())
    }

    fn list(&self, ctx: &RequestContext) -> RepoResult<Vec<User>> {
        ctx.check()?;

        let mut stmt = self
            .conn
            .prepare("SELECT email, password FROM users ORDER BY email ASC;")?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                email: row.get("email")?,
                password: row.get("password")?,
            })
        })?;

        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }

    fn clear(&self, ctx: &RequestContext) -> RepoResult<()> {
        ctx.check()?;

        self.conn.execute("DELETE FROM users;", [])?;
        Ok(())
    }
}
