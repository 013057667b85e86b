//! Type-safe identifiers for protocol entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//! a remote object handle can never be passed where a node id is expected.
//!
//! | Type | Wraps | Issued by |
//! |------|-------|-----------|
//! | [`ElementId`] | UUID | this crate, stable across frame re-binding |
//! | [`ObjectId`] | string | browser, valid in one JS runtime only |
//! | [`NodeId`] | integer | browser DOM agent |
//! | [`BackendNodeId`] | integer | browser DOM agent |
//! | [`FrameId`] | string | browser page agent |
//! | [`SessionId`] | string | browser target attachment |
//! | [`ExecutionContextId`] | integer | browser runtime agent |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ElementId
// ============================================================================

/// Identity of an [`Element`](crate::Element) handle.
///
/// Generated locally. Survives frame re-binding, where the remote handle
/// changes but the element stays the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generates a fresh random identity.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// String Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from its protocol string.
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the protocol string.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Remote object handle.
    ///
    /// Opaque reference to a live JS value. Meaningful only inside the
    /// JS runtime that issued it.
    ObjectId
}

string_id! {
    /// Frame identifier assigned by the browser.
    FrameId
}

string_id! {
    /// Protocol session attached to one target.
    SessionId
}

// ============================================================================
// Integer Identifiers
// ============================================================================

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from its protocol value.
            #[inline]
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the protocol value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

int_id! {
    /// DOM node id, scoped to the DOM agent of a session.
    NodeId
}

int_id! {
    /// Backend DOM node id, stable for the life of the node.
    BackendNodeId
}

int_id! {
    /// JS execution context (one per frame world).
    ExecutionContextId
}

// ============================================================================
// Tests
// ============================================================================
