//! Domain entities and their read projections.
//!
//! # Responsibility
//! - Define the records owned by the repository layer.
//! - Define the projections handed to callers outside the core.
//!
//! # Invariants
//! - Projections are derived on read and never persisted.
//! - A `PublicUser` never carries a password.

pub mod todo;
pub mod user;
