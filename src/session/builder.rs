//! Builder pattern for session configuration.
//!
//! Provides a fluent API for wiring the external collaborators and options
//! into a [`Session`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cdp_element::Session;
//!
//! let session = Session::builder()
//!     .client(Arc::new(wire))
//!     .input(Arc::new(device))
//!     .slow_motion(Duration::from_millis(200))
//!     .trace(true)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::input::InputDevice;
use crate::protocol::ProtocolClient;

use super::core::Session;
use super::options::{Options, PollPolicy};

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a [`Session`].
///
/// Use [`Session::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct SessionBuilder {
    /// Protocol client.
    client: Option<Arc<dyn ProtocolClient>>,
    /// Input device driver.
    input: Option<Arc<dyn InputDevice>>,
    /// Interaction options.
    options: Options,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("client", &self.client.is_some())
            .field("input", &self.input.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with default options and no collaborators.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol client.
    #[inline]
    #[must_use]
    pub fn client(mut self, client: Arc<dyn ProtocolClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the input device driver.
    #[inline]
    #[must_use]
    pub fn input(mut self, input: Arc<dyn InputDevice>) -> Self {
        self.input = Some(input);
        self
    }

    /// Injects `delay` before every UI-mutating step.
    #[inline]
    #[must_use]
    pub fn slow_motion(mut self, delay: Duration) -> Self {
        self.options.slow_motion = Some(delay);
        self
    }

    /// Enables or disables interaction tracing.
    #[inline]
    #[must_use]
    pub fn trace(mut self, enabled: bool) -> Self {
        self.options.trace = enabled;
        self
    }

    /// Enables or disables the in-page trace overlay.
    #[inline]
    #[must_use]
    pub fn overlay(mut self, enabled: bool) -> Self {
        self.options.overlay = enabled;
        self
    }

    /// Sets the poll policy for predicate waits.
    #[inline]
    #[must_use]
    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.options.poll = policy;
        self
    }

    /// Replaces all options at once.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Builds the session with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the client or input device is not set
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self) -> Result<Session> {
        let client = self.client.ok_or_else(|| {
            Error::config(
                "Protocol client is required. Use .client() to set it.\n\
                 Example: Session::builder().client(Arc::new(connection))",
            )
        })?;
        let input = self.input.ok_or_else(|| {
            Error::config(
                "Input device is required. Use .input() to set it.\n\
                 Example: Session::builder().input(Arc::new(device))",
            )
        })?;
        self.options.validate()?;

        Ok(Session::new(client, input, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================
