//! Frame contexts.
//!
//! Each [`Page`] is either the top-level page of a target or a nested
//! iframe context evaluated in its own isolated world.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Page struct and accessors |
//! | `script` | JavaScript execution, frame id, window handle |
//! | `elements` | Element lookup by selector, handle or node id |
//! | `frames` | Frame resolution over pages |
//! | `domain` | Scoped domain enablement |
//! | `screenshot` | Page capture |
//!
//! # Example
//!
//! ```ignore
//! let page = session.page(session_id);
//!
//! let items = page.elements("ul > li").await?;
//! let frame = page.element("iframe").await?.frame();
//! let inner = frame.element("#login").await?;
//!
//! let png = page.screenshot().capture_bytes().await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod domain;
mod elements;
mod frames;
mod screenshot;
mod script;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Page;
pub use screenshot::{ImageFormat, ScreenshotBuilder};
