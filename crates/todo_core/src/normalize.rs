//! Field normalization shared by user and todo use-cases.
//!
//! # Invariants
//! - Both functions are pure and total.
//! - Applying a function twice yields the same value as applying it once.

/// Trims surrounding whitespace and lowercases an email value.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims surrounding whitespace from free-form text.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}
