//! Per-request execution context.
//!
//! # Responsibility
//! - Carry caller-supplied cancellation and deadline signals down to
//!   repository calls.
//!
//! # Invariants
//! - Clones share one cancellation flag; cancelling any clone cancels all.
//! - Cancellation takes precedence over an expired deadline.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reason a context is no longer usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The caller cancelled the request.
    Cancelled,
    /// The request deadline passed.
    DeadlineExceeded,
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "request cancelled"),
            Self::DeadlineExceeded => write!(f, "request deadline exceeded"),
        }
    }
}

impl Error for ContextError {}

/// Cancellation flag plus optional deadline for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context that is never cancelled unless asked to be.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_at(Instant::now() + timeout)
    }

    /// Creates a context with an absolute deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::new().deadline_at(deadline)
    }

    /// Returns a clone sharing this context's cancellation flag but bounded
    /// by the earlier of the existing and the given deadline.
    pub fn deadline_at(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
        }
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails when the context was cancelled or its deadline has passed.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextError, RequestContext};
    use std::time::{Duration, Instant};

    #[test]
    fn fresh_context_is_active() {
        assert_eq!(RequestContext::new().check(), Ok(()));
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let ctx = RequestContext::new();
        let child = ctx.deadline_at(Instant::now() + Duration::from_secs(60));
        ctx.cancel();
        assert_eq!(child.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn expired_deadline_fails_check() {
        let ctx = RequestContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
    }

    #[test]
    fn deadline_at_keeps_earlier_deadline() {
        let early = Instant::now() + Duration::from_secs(1);
        let ctx = RequestContext::with_deadline(early);
        let child = ctx.deadline_at(early + Duration::from_secs(30));
        assert_eq!(child.deadline(), Some(early));
    }

    #[test]
    fn cancellation_wins_over_expired_deadline() {
        let ctx = RequestContext::with_deadline(Instant::now() - Duration::from_millis(1));
        ctx.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }
}
