//! User registration and authentication use-cases.
//!
//! # Invariants
//! - Emails are normalized before lookup and storage.
//! - Login failures never reveal whether the email is registered.
//! - Passwords are compared by exact equality after trimming.

use crate::context::RequestContext;
use crate::model::user::{PublicUser, User};
use crate::normalize::{normalize_email, normalize_text};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::service::ErrorKind;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from user service operations.
#[derive(Debug)]
pub enum UserServiceError {
    /// Email or password is blank after normalization.
    InvalidInput,
    /// The normalized email is already registered.
    AlreadyExists,
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// Repository-level failure.
    Store(RepoError),
}

impl UserServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput => ErrorKind::InvalidInput,
            Self::AlreadyExists => ErrorKind::AlreadyExists,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "email and password are required"),
            Self::AlreadyExists => write!(f, "user already exists"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Store(err) => write!(f, "user store failure: {err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// User service facade over a repository implementation.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new user.
    ///
    /// # Errors
    /// - `InvalidInput` when email or password is blank after normalization.
    /// - `AlreadyExists` when the normalized email is taken.
    /// - `Store` for any other repository failure.
    pub fn register(&self, ctx: &RequestContext, user: User) -> Result<(), UserServiceError> {
        let user = User {
            email: normalize_email(&user.email),
            password: normalize_text(&user.password),
        };
        if user.email.is_empty() || user.password.is_empty() {
            return Err(UserServiceError::InvalidInput);
        }

        match self.repo.find_by_email(ctx, &user.email) {
            Ok(_) => {
                info!("event=user_register module=service status=rejected reason=already_exists");
                return Err(UserServiceError::AlreadyExists);
            }
            Err(RepoError::UserNotFound(_)) => {}
            Err(err) => {
                warn!("event=user_register module=service status=error error={err}");
                return Err(err.into());
            }
        }

        self.repo.insert(ctx, &user)?;
        info!("event=user_register module=service status=ok");
        Ok(())
    }

    /// Checks an email/password pair against stored credentials.
    ///
    /// Blank input, unknown email, and wrong password all produce
    /// `InvalidCredentials`.
    pub fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<(), UserServiceError> {
        let email = normalize_email(email);
        let password = normalize_text(password);
        if email.is_empty() || password.is_empty() {
            return Err(UserServiceError::InvalidCredentials);
        }

        let user = match self.repo.find_by_email(ctx, &email) {
            Ok(user) => user,
            Err(RepoError::UserNotFound(_)) => {
                info!("event=user_login module=service status=rejected");
                return Err(UserServiceError::InvalidCredentials);
            }
            Err(err) => {
                warn!("event=user_login module=service status=error error={err}");
                return Err(err.into());
            }
        };

        if user.password != password {
            info!("event=user_login module=service status=rejected");
            return Err(UserServiceError::InvalidCredentials);
        }

        info!("event=user_login module=service status=ok");
        Ok(())
    }

    /// Lists every user without passwords.
    pub fn list(&self, ctx: &RequestContext) -> Result<Vec<PublicUser>, UserServiceError> {
        let users = self.repo.list(ctx)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Removes every user.
    pub fn clear(&self, ctx: &RequestContext) -> Result<(), UserServiceError> {
        self.repo.clear(ctx)?;
        info!("event=user_clear module=service status=ok");
        Ok(())
    }
}
