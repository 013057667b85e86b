//! Session entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Owns the collaborators, hands out pages |
//! | [`SessionBuilder`] | Fluent configuration builder |
//! | [`Options`] | Slow motion, tracing, poll policy |
//! | [`PollPolicy`] | Retry-with-sleep policy for waits |
//! | [`Domain`] | Protocol domains toggled by scoped regions |
//!
//! # Example
//!
//! ```ignore
//! use cdp_element::{MouseButton, Result, Session};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let page = session.page("8C0B6A2F");
//!     let button = page.element("#submit").await?;
//!     button.click(MouseButton::Left).await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for sessions.
pub mod builder;

/// Core session implementation.
pub mod core;

/// Reference-counted domain toggles.
pub mod domain;

/// Interaction options and poll policy.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use core::Session;
pub use domain::Domain;
pub use options::{Delays, Options, PollPolicy};
