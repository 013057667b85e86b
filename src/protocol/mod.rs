//! Remote debugging protocol surface used by the element core.
//!
//! # Protocol Overview
//!
//! Every call is a `Domain.methodName` plus a JSON params object, sent on
//! the session attached to one target. Results are JSON objects.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `client` | [`ProtocolClient`] seam to the external transport |
//! | `command` | Command definitions by domain |
//! | `types` | Result and parameter shapes |

// ============================================================================
// Submodules
// ============================================================================

/// Protocol client trait.
pub mod client;

/// Command definitions organized by domain.
pub mod command;

/// Result and parameter types.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ProtocolClient;
pub use command::{Command, DomCommand, PageCommand, RuntimeCommand};
pub use types::{
    BoxModel, CallArgument, DescribeNodeResult, EvaluateResult, ExceptionDetails, Node,
    RemoteObject, ResourceContent, Viewport,
};
