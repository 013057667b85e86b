//! Cancellable execution scopes.
//!
//! A [`Scope`] bounds the lifetime of every pending operation of a page or
//! element. Each suspension point (protocol round-trip, input dispatch,
//! retry sleep, timer tick) is raced against the scope, so cancelling it
//! aborts the operation in flight instead of waiting for the next poll
//! boundary.
//!
//! Scopes form a tree: an element's scope is a child of its page's scope,
//! so closing a page cancels every element created from it.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Deadline attached to a scope.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    granted: Duration,
}

// ============================================================================
// Scope
// ============================================================================

/// Cancellable lifetime boundary for pending operations.
///
/// Cloning shares the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    token: CancellationToken,
    deadline: Option<Deadline>,
}

impl Scope {
    /// Creates a new root scope.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child scope.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves
    /// the parent untouched. The deadline, if any, is inherited.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Returns a view of this scope that also expires after `duration`.
    ///
    /// Shares cancellation with `self`. Keeps the earlier deadline when one
    /// is already set.
    #[must_use]
    pub fn with_timeout(&self, duration: Duration) -> Self {
        let candidate = Deadline {
            at: Instant::now() + duration,
            granted: duration,
        };
        let deadline = match self.deadline {
            Some(current) if current.at <= candidate.at => current,
            _ => candidate,
        };

        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// Cancels the scope and all of its children.
    #[inline]
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the scope has been cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the underlying cancellation token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Runs `operation` until it completes or the scope ends.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if the scope is cancelled first
    /// - [`Error::Timeout`] if the deadline passes first
    /// - whatever `operation` returns otherwise
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(Error::Cancelled),
                    _ = sleep_until(deadline.at) => Err(Error::timeout(
                        "scope deadline",
                        deadline.granted.as_millis() as u64,
                    )),
                    result = operation => result,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(Error::Cancelled),
                    result = operation => result,
                }
            }
        }
    }

    /// Sleeps for `duration` unless the scope ends first.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(async {
            sleep(duration).await;
            Ok(())
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================
