//! Core use-case services.
//!
//! # Responsibility
//! - Own validation, normalization, and error semantics.
//! - Orchestrate exactly one repository call per operation.
//!
//! # Invariants
//! - Services hold no mutable state; all state lives in repositories.
//! - Validation failures are reported before any repository call.
//! - Unrecognized repository failures surface as `ErrorKind::Store`.

use std::fmt::{Display, Formatter};

pub mod todo_service;
pub mod user_service;

/// Caller-facing classification of service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is missing or blank after normalization.
    InvalidInput,
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// The normalized email is already registered.
    AlreadyExists,
    /// An identifier string does not parse.
    InvalidId,
    /// A parsed identifier has no matching record.
    NotFound,
    /// The backing store failed or the request context ended.
    Store,
}

impl ErrorKind {
    /// Stable snake_case code for logs and client payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AlreadyExists => "already_exists",
            Self::InvalidId => "invalid_id",
            Self::NotFound => "not_found",
            Self::Store => "store_error",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            ErrorKind::InvalidInput,
            ErrorKind::InvalidCredentials,
            ErrorKind::AlreadyExists,
            ErrorKind::InvalidId,
            ErrorKind::NotFound,
            ErrorKind::Store,
        ];
        let codes: HashSet<_> = kinds.iter().map(|kind| kind.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }
}
