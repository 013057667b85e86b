//! Core Page struct and accessors.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::{ExecutionContextId, FrameId, ObjectId, SessionId};
use crate::protocol::{Command, RuntimeCommand};
use crate::scope::Scope;
use crate::session::Session;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a page.
pub(crate) struct PageInner {
    /// Owning session.
    pub session: Session,

    /// Protocol session of the target.
    pub session_id: SessionId,

    /// Enclosing frame context, `None` for the top-level page.
    pub parent: Option<Page>,

    /// Iframe element owning this frame, issued by `parent`.
    pub owner: Option<ObjectId>,

    /// Frame id, resolved on first use.
    pub frame_id: OnceCell<FrameId>,

    /// Isolated world of a nested frame, resolved on first use.
    pub context_id: OnceCell<ExecutionContextId>,

    /// `window` of this context, resolved on first use.
    pub window: OnceCell<ObjectId>,
}

// ============================================================================
// Page
// ============================================================================

/// A frame context: the top-level page of a target or a nested iframe.
///
/// Cheap to clone. Clones share frame state; each carries its own scope.
#[derive(Clone)]
pub struct Page {
    pub(crate) inner: Arc<PageInner>,
    pub(crate) scope: Scope,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("session_id", &self.inner.session_id)
            .field("owner", &self.inner.owner)
            .field("frame_id", &self.inner.frame_id.get())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Creates the top-level page of a target.
    pub(crate) fn top(session: Session, session_id: SessionId) -> Self {
        let scope = session.scope().child();
        Self {
            inner: Arc::new(PageInner {
                session,
                session_id,
                parent: None,
                owner: None,
                frame_id: OnceCell::new(),
                context_id: OnceCell::new(),
                window: OnceCell::new(),
            }),
            scope,
        }
    }

    /// Creates the context of the frame owned by `iframe`.
    ///
    /// No protocol call is made until the context is first used.
    pub(crate) fn frame_of(&self, iframe: ObjectId) -> Self {
        debug!(session_id = %self.inner.session_id, iframe = %iframe, "Entering iframe");
        Self {
            inner: Arc::new(PageInner {
                session: self.inner.session.clone(),
                session_id: self.inner.session_id.clone(),
                parent: Some(self.clone()),
                owner: Some(iframe),
                frame_id: OnceCell::new(),
                context_id: OnceCell::new(),
                window: OnceCell::new(),
            }),
            scope: self.scope.child(),
        }
    }

    /// Returns a view of this page running under `scope`.
    #[must_use]
    pub fn with_scope(&self, scope: Scope) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            scope,
        }
    }
}

// ============================================================================
// Page - Accessors
// ============================================================================

impl Page {
    /// Returns the protocol session id.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.inner.session_id
    }

    /// Returns the execution scope.
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns `true` for the top-level page.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// Returns the enclosing frame context.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&Page> {
        self.inner.parent.as_ref()
    }

    /// Returns the iframe element handle owning this frame.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<&ObjectId> {
        self.inner.owner.as_ref()
    }

    /// Returns the top-level page.
    #[must_use]
    pub fn root(&self) -> Page {
        let mut page = self;
        while let Some(parent) = page.parent() {
            page = parent;
        }
        page.clone()
    }

    /// Returns `true` if both handles refer to the same frame context.
    #[inline]
    #[must_use]
    pub fn same_frame(&self, other: &Page) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// Page - Internal
// ============================================================================

impl Page {
    #[inline]
    pub(crate) fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Sends a command raced against the page scope.
    pub(crate) async fn call<T>(&self, command: Command) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.scope
            .run(self.session().send(&self.inner.session_id, command))
            .await
    }

    /// Releases a handle issued by this context.
    ///
    /// Never raced against the scope so cleanup still happens after cancel.
    pub async fn release(&self, object_id: &ObjectId) -> Result<()> {
        debug!(session_id = %self.inner.session_id, object_id = %object_id, "Releasing object");
        self.session()
            .send::<serde_json::Value>(
                &self.inner.session_id,
                RuntimeCommand::ReleaseObject {
                    object_id: object_id.clone(),
                }
                .into(),
            )
            .await
            .map(drop)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::Harness;

    #[test]
    fn test_nested_page_keeps_root() {
        let harness = Harness::new(|_, _| Ok(json!({})));
        let top = harness.session.page("S1");
        let child = top.frame_of(ObjectId::new("iframe-1"));
        let grandchild = child.frame_of(ObjectId::new("iframe-2"));

        assert!(top.is_root());
        assert!(!grandchild.is_root());
        assert!(grandchild.root().same_frame(&top));
        assert_eq!(grandchild.owner(), Some(&ObjectId::new("iframe-2")));
        assert_eq!(grandchild.session_id(), &SessionId::new("S1"));
    }

    #[test]
    fn test_nested_scope_follows_parent() {
        let harness = Harness::new(|_, _| Ok(json!({})));
        let top = harness.session.page("S1");
        let child = top.frame_of(ObjectId::new("iframe-1"));

        top.scope().cancel();
        assert!(child.scope().is_cancelled());
    }

    #[tokio::test]
    async fn test_release_ignores_cancelled_scope() {
        let harness = Harness::new(|_, _| Ok(json!({})));
        let page = harness.session.page("S1");
        page.scope().cancel();

        page.release(&ObjectId::new("obj")).await.expect("release");
        assert_eq!(harness.client.params("Runtime.releaseObject"), vec![json!({"objectId": "obj"})]);
        assert_eq!(harness.client.calls()[0].session_id, SessionId::new("S1"));
    }
}
