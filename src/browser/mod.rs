//! Frame contexts and the elements inside them.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Page`] | Top-level page or nested iframe context |
//! | [`Element`] | DOM element handle bound to one page |
//! | [`FrameContext`] | Capabilities frame resolution needs from a page |
//!
//! # Example
//!
//! ```ignore
//! use cdp_element::{MouseButton, Result, Session};
//!
//! async fn login(session: &Session) -> Result<()> {
//!     let page = session.page("8F2A...");
//!
//!     let user = page.element("#user").await?;
//!     user.input("alice").await?;
//!
//!     page.element("button[type=submit]")
//!         .await?
//!         .click(MouseButton::Left)
//!         .await
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// DOM element handles and interactions.
pub mod element;

/// Function calls on remote objects.
pub mod eval;

/// Depth-first frame resolution.
pub mod frame;

/// Box model geometry.
pub mod geometry;

/// Frame contexts.
pub mod page;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::Element;
pub use eval::Arg;
pub use frame::{FrameContext, Resolution, locate};
pub use geometry::{BoundingBox, Point};
pub use page::{ImageFormat, Page, ScreenshotBuilder};
