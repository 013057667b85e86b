//! Error types for the element interaction core.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use cdp_element::{Result, Error};
//!
//! async fn example(page: &Page) -> Result<()> {
//!     let element = page.element("#submit").await?;
//!     element.click(MouseButton::Left).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Protocol | [`Error::Protocol`] |
//! | Evaluation | [`Error::Evaluation`] |
//! | Scope | [`Error::Cancelled`], [`Error::Timeout`] |
//! | Lookup | [`Error::NotFoundInAnyFrame`], [`Error::ElementNotFound`] |
//! | Cleanup | [`Error::Release`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Base64`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::NodeId;

// ============================================================================
// Constants
// ============================================================================

/// Generic server-side error code reported by the browser.
///
/// Used for "handle belongs to another context" and "no node with given id".
pub const SERVER_ERROR_CODE: i64 = -32000;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when a session is built with missing or invalid settings.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The browser or transport rejected a call.
    ///
    /// Never retried by this crate.
    #[error("Protocol error {code}: {message}")]
    Protocol {
        /// Error code reported by the browser (0 when unknown).
        code: i64,
        /// Error message reported by the browser.
        message: String,
    },

    /// A script threw inside the page.
    ///
    /// Carries the description reported by the page.
    #[error("Evaluation error: {description}")]
    Evaluation {
        /// Exception description from the page.
        description: String,
    },

    // ========================================================================
    // Scope Errors
    // ========================================================================
    /// The execution scope was cancelled before the operation completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// The execution scope's deadline passed before the operation completed.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds granted to the scope.
        timeout_ms: u64,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Frame resolution searched every reachable frame without a match.
    #[error("Node {node_id} not found in any frame")]
    NotFoundInAnyFrame {
        /// Node that could not be resolved.
        node_id: NodeId,
    },

    /// A query matched no element.
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector or description of what was looked up.
        selector: String,
    },

    // ========================================================================
    // Cleanup Errors
    // ========================================================================
    /// An operation failed and releasing its resource failed as well.
    #[error("{source} (release also failed: {release})")]
    Release {
        /// Original error from the protected region.
        source: Box<Error>,
        /// Error raised by the release itself.
        release: Box<Error>,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 payload could not be decoded.
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// URL could not be parsed.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a protocol error with a browser error code.
    #[inline]
    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
        }
    }

    /// Creates a protocol error for a malformed or unexpected response.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::protocol(0, message)
    }

    /// Creates an evaluation error.
    #[inline]
    pub fn evaluation(description: impl Into<String>) -> Self {
        Self::Evaluation {
            description: description.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a not-found-in-any-frame error.
    #[inline]
    pub fn not_found_in_any_frame(node_id: NodeId) -> Self {
        Self::NotFoundInAnyFrame { node_id }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Combines an error with the failure of the release that followed it.
    #[inline]
    pub fn release(source: Error, release: Error) -> Self {
        Self::Release {
            source: Box::new(source),
            release: Box::new(release),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the execution scope ended (cancelled or expired).
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout { .. })
    }

    /// Returns `true` if the browser rejected a call.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    /// Returns `true` if a script threw inside the page.
    #[inline]
    #[must_use]
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Self::Evaluation { .. })
    }

    /// Returns `true` if a lookup found nothing.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFoundInAnyFrame { .. } | Self::ElementNotFound { .. }
        )
    }

    /// Returns `true` for the browser's generic server error.
    ///
    /// The browser reports handles used in the wrong context and unknown
    /// node ids this way.
    #[inline]
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Protocol { code, .. } if *code == SERVER_ERROR_CODE)
    }
}

// ============================================================================
// Tests
// ============================================================================
