//! DOM element handles.
//!
//! An [`Element`] pairs a stable identity with a remote handle and the
//! frame context that issued it. Frame resolution may replace the pair
//! in place; clones observe the new binding.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Element struct, binding, evaluation, frame resolution |
//! | `properties` | Attributes, text, geometry, DOM description |
//! | `actions` | Click, focus, key, text input, select, file inputs |
//! | `wait` | Predicate waits and layout stability |
//! | `resource` | Canvas export, media resources, element screenshots |
//! | `trace` | Slow motion and interaction tracing |

// ============================================================================
// Submodules
// ============================================================================

mod actions;
mod core;
mod properties;
mod resource;
mod trace;
mod wait;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Element;
