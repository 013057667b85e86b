//! Session-wide interaction options.
//!
//! Every page and element created from one [`Session`](crate::Session)
//! shares the same [`Options`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use cdp_element::{Options, PollPolicy};
//!
//! let options = Options::new()
//!     .with_slow_motion(Duration::from_millis(250))
//!     .with_trace()
//!     .with_poll_policy(PollPolicy::fixed(Duration::from_millis(50)));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// First retry delay of the default poll policy.
pub const DEFAULT_POLL_INITIAL: Duration = Duration::from_millis(100);

/// Delay cap of the default poll policy.
pub const DEFAULT_POLL_MAX: Duration = Duration::from_secs(1);

// ============================================================================
// PollPolicy
// ============================================================================

/// Retry-with-sleep policy used by predicate waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPolicy {
    /// Doubling delay starting at `initial`, capped at `max`.
    Backoff {
        /// First delay.
        initial: Duration,
        /// Upper bound.
        max: Duration,
    },
    /// Constant delay.
    Fixed {
        /// Delay between attempts.
        interval: Duration,
    },
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::backoff(DEFAULT_POLL_INITIAL, DEFAULT_POLL_MAX)
    }
}

impl PollPolicy {
    /// Creates a doubling backoff policy.
    #[inline]
    #[must_use]
    pub const fn backoff(initial: Duration, max: Duration) -> Self {
        Self::Backoff { initial, max }
    }

    /// Creates a constant-interval policy.
    #[inline]
    #[must_use]
    pub const fn fixed(interval: Duration) -> Self {
        Self::Fixed { interval }
    }

    /// Checks that every delay is positive and the cap is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for zero delays or `max < initial`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Backoff { initial, max } => {
                if initial.is_zero() || max.is_zero() {
                    return Err(Error::config("poll backoff delays must be positive"));
                }
                if max < initial {
                    return Err(Error::config(format!(
                        "poll backoff cap {max:?} is below the initial delay {initial:?}"
                    )));
                }
                Ok(())
            }
            Self::Fixed { interval } if interval.is_zero() => {
                Err(Error::config("poll interval must be positive"))
            }
            Self::Fixed { .. } => Ok(()),
        }
    }

    /// Returns the endless sequence of delays between attempts.
    #[must_use]
    pub fn delays(&self) -> Delays {
        let next = match *self {
            Self::Backoff { initial, .. } => initial,
            Self::Fixed { interval } => interval,
        };
        Delays { policy: *self, next }
    }
}

/// Iterator over the delays of a [`PollPolicy`]. Never ends.
#[derive(Debug, Clone)]
pub struct Delays {
    policy: PollPolicy,
    next: Duration,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        if let PollPolicy::Backoff { max, .. } = self.policy {
            self.next = current.saturating_mul(2).min(max);
        }
        Some(current)
    }
}

// ============================================================================
// Options
// ============================================================================

/// Interaction options shared by a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Delay injected before every UI-mutating step.
    pub slow_motion: Option<Duration>,

    /// Emit human-readable interaction records.
    pub trace: bool,

    /// Draw a label next to traced elements inside the page.
    pub overlay: bool,

    /// Retry policy for predicate waits.
    pub poll: PollPolicy,
}

impl Options {
    /// Creates options with every feature off and the default poll policy.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slow-motion delay.
    #[inline]
    #[must_use]
    pub fn with_slow_motion(mut self, delay: Duration) -> Self {
        self.slow_motion = Some(delay);
        self
    }

    /// Enables interaction tracing.
    #[inline]
    #[must_use]
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    /// Enables the in-page trace overlay.
    #[inline]
    #[must_use]
    pub fn with_overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    /// Sets the poll policy.
    #[inline]
    #[must_use]
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll = policy;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero slow-motion delay or an invalid
    /// poll policy.
    pub fn validate(&self) -> Result<()> {
        if self.slow_motion.is_some_and(|d| d.is_zero()) {
            return Err(Error::config(
                "slow motion delay must be positive; leave it unset to disable",
            ));
        }
        self.poll.validate()
    }
}

// ============================================================================
// Tests
// ============================================================================
