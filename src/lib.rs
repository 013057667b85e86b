//! Element interaction core for remote-debugging-protocol browser automation.
//!
//! This library drives DOM elements of a browser page through an external
//! protocol client: evaluation with `this` bound to an element, frame
//! resolution across nested iframes, strictly ordered interaction
//! sequences, predicate waits, and scoped domain enablement.
//!
//! # Architecture
//!
//! The crate sits between two seams it does not implement:
//!
//! - **[`ProtocolClient`]**: sends `Domain.method` calls on a target session
//! - **[`InputDevice`]**: dispatches mouse and keyboard events
//!
//! Key design principles:
//!
//! - Every pending operation runs under a cancellable [`Scope`]
//! - An [`Element`] keeps its identity when frame resolution rebinds it
//! - Domain toggles are reference counted per session
//! - Remote handles acquired during a lookup are always released
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cdp_element::{MouseButton, Result, Session};
//!
//! async fn example(client: Arc<MyClient>, input: Arc<MyInput>) -> Result<()> {
//!     let session = Session::builder()
//!         .client(client)
//!         .input(input)
//!         .slow_motion(Duration::from_millis(200))
//!         .trace(true)
//!         .build()?;
//!
//!     let page = session.page("8F2A...");
//!     let button = page.element("#submit").await?;
//!     button.timeout(Duration::from_secs(5)).click(MouseButton::Left).await?;
//!
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Page`] and [`Element`], frame resolution, geometry |
//! | [`session`] | [`Session`] builder, shared [`Options`], domain toggles |
//! | [`scope`] | Cancellable execution scopes |
//! | [`protocol`] | Command and result types, [`ProtocolClient`] seam |
//! | [`input`] | [`InputDevice`] seam, [`MouseButton`], [`Key`] |
//! | [`scripts`] | Bundled in-page helper scripts |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |

// ============================================================================
// Modules
// ============================================================================

/// Frame contexts and element handles.
pub mod browser;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
pub mod identifiers;

/// Input device seam and key definitions.
pub mod input;

/// Protocol command and result types.
pub mod protocol;

/// Cancellable execution scopes.
pub mod scope;

/// Bundled in-page helper scripts.
pub mod scripts;

/// Session configuration and shared state.
pub mod session;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{
    Arg, BoundingBox, Element, FrameContext, ImageFormat, Page, Point, Resolution,
    ScreenshotBuilder, locate,
};

// Session types
pub use session::{Domain, Options, PollPolicy, Session, SessionBuilder};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{
    BackendNodeId, ElementId, ExecutionContextId, FrameId, NodeId, ObjectId, SessionId,
};

// Seams
pub use input::{InputDevice, Key, MouseButton};
pub use protocol::ProtocolClient;
pub use scope::Scope;
pub use scripts::Helper;
