//! Command-line surface: argument definitions and dispatch.
//!
//! Each subcommand builds the services over the SQLite repositories and
//! calls exactly one service method.

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::path::PathBuf;
use todo_core::{
    core_version, ping, ErrorKind, RepoError, RequestContext, SqliteTodoRepository,
    SqliteUserRepository, TodoService, TodoServiceError, TodoUpdate, User, UserService,
    UserServiceError,
};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Multi-tenant todo tracker")]
pub struct Cli {
    /// SQLite database file (overrides `database.path`).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides `logging.level`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides `logging.dir`).
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    /// Deadline for the service call in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the database and report status.
    Health,
    /// Register a new user.
    Register(Credentials),
    /// Check a user's credentials.
    Login(Credentials),
    /// User administration.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Todo management.
    #[command(subcommand)]
    Todos(TodosCommand),
}

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users (emails only).
    List,
    /// Delete every user.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum TodosCommand {
    /// List todos, optionally for one owner.
    List {
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Create a todo.
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        title: String,
    },
    /// Change a todo's title and/or completion state.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete one todo.
    Delete { id: String },
    /// Delete todos, optionally only one owner's.
    Clear {
        #[arg(long, default_value = "")]
        email: String,
    },
}

/// A service failure ready to be reported to the caller.
#[derive(Debug)]
pub struct CommandFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandFailure {
    /// Distinct exit status per failure kind.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::InvalidInput => 10,
            ErrorKind::InvalidCredentials => 11,
            ErrorKind::AlreadyExists => 12,
            ErrorKind::InvalidId => 13,
            ErrorKind::NotFound => 14,
            ErrorKind::Store => 15,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "error": self.kind.code(), "message": self.message })
    }
}

impl From<UserServiceError> for CommandFailure {
    fn from(value: UserServiceError) -> Self {
        Self {
            kind: value.kind(),
            message: value.to_string(),
        }
    }
}

impl From<TodoServiceError> for CommandFailure {
    fn from(value: TodoServiceError) -> Self {
        Self {
            kind: value.kind(),
            message: value.to_string(),
        }
    }
}

impl From<RepoError> for CommandFailure {
    fn from(value: RepoError) -> Self {
        Self {
            kind: ErrorKind::Store,
            message: value.to_string(),
        }
    }
}

impl Command {
    pub fn execute(
        self,
        conn: &Connection,
        ctx: &RequestContext,
    ) -> Result<Value, CommandFailure> {
        match self {
            Self::Health => Ok(json!({
                "status": "ok",
                "ping": ping(),
                "version": core_version(),
            })),
            Self::Register(credentials) => {
                let users = UserService::new(SqliteUserRepository::try_new(conn)?);
                users.register(ctx, User::new(credentials.email, credentials.password))?;
                Ok(json!({ "message": "user registered" }))
            }
            Self::Login(credentials) => {
                let users = UserService::new(SqliteUserRepository::try_new(conn)?);
                users.login(ctx, &credentials.email, &credentials.password)?;
                Ok(json!({ "message": "login ok" }))
            }
            Self::Users(command) => {
                let users = UserService::new(SqliteUserRepository::try_new(conn)?);
                match command {
                    UsersCommand::List => Ok(json!({ "users": users.list(ctx)? })),
                    UsersCommand::Clear => {
                        users.clear(ctx)?;
                        Ok(json!({ "message": "users deleted" }))
                    }
                }
            }
            Self::Todos(command) => {
                let todos = TodoService::new(SqliteTodoRepository::try_new(conn)?);
                match command {
                    TodosCommand::List { email } => Ok(json!({ "todos": todos.list(ctx, &email)? })),
                    TodosCommand::Add { email, title } => {
                        Ok(json!({ "todo": todos.create(ctx, &email, &title)? }))
                    }
                    TodosCommand::Update {
                        id,
                        title,
                        completed,
                    } => {
                        let update = TodoUpdate { title, completed };
                        Ok(json!({ "todo": todos.update(ctx, &id, update)? }))
                    }
                    TodosCommand::Delete { id } => {
                        todos.delete(ctx, &id)?;
                        Ok(json!({ "message": "todo deleted" }))
                    }
                    TodosCommand::Clear { email } => {
                        todos.clear(ctx, &email)?;
                        Ok(json!({ "message": "todos deleted" }))
                    }
                }
            }
        }
    }
}
