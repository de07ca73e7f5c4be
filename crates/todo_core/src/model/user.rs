//! User entity and public projection.
//!
//! # Invariants
//! - Stored emails are normalized (trimmed, lowercase) and unique.
//! - `Debug` output never includes the password.

use serde::Serialize;
use std::fmt::{Debug, Formatter};

/// Registered account. Identity key is the normalized `email`.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Drops the password, keeping only externally visible fields.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            email: self.email.clone(),
        }
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// User projection safe to expose to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(value: User) -> Self {
        Self { email: value.email }
    }
}
