//! Core Element struct, binding and lifecycle.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::browser::eval::{self, Arg};
use crate::browser::frame;
use crate::browser::page::Page;
use crate::error::{Error, Result};
use crate::identifiers::{ElementId, NodeId, ObjectId};
use crate::input::InputDevice;
use crate::protocol::{Command, RemoteObject};
use crate::scope::Scope;
use crate::scripts::Helper;
use crate::session::Options;

// ============================================================================
// Types
// ============================================================================

/// Frame context and handle of an element, replaced as a pair.
pub(crate) struct Binding {
    /// Frame context that issued the handle.
    pub page: Page,

    /// Remote handle, valid only in `page`.
    pub object_id: ObjectId,
}

/// Internal shared state for an element.
pub(crate) struct ElementInner {
    /// Stable identity.
    pub id: ElementId,

    /// Current binding. Swapped whole on frame resolution.
    pub binding: RwLock<Arc<Binding>>,
}

// ============================================================================
// Element
// ============================================================================

/// A handle to a DOM element.
///
/// Every pending operation runs under the element's scope: cancelling it
/// (through [`release`](Self::release) or the owning page or session)
/// aborts calls, waits and retry sleeps in flight.
///
/// # Example
///
/// ```ignore
/// let field = page.element("input[name=email]").await?;
/// field.input("user@example.com").await?;
/// field.press(Key::Enter).await?;
/// ```
#[derive(Clone)]
pub struct Element {
    pub(crate) inner: Arc<ElementInner>,
    pub(crate) scope: Scope,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = self.binding();
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("object_id", &binding.object_id)
            .field("session_id", binding.page.session_id())
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Creates an element from a handle issued by `page`.
    pub(crate) fn new(page: Page, object_id: ObjectId) -> Self {
        let scope = page.scope().child();
        Self {
            inner: Arc::new(ElementInner {
                id: ElementId::generate(),
                binding: RwLock::new(Arc::new(Binding { page, object_id })),
            }),
            scope,
        }
    }
}

// ============================================================================
// Element - Accessors
// ============================================================================

impl Element {
    /// Returns this element's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }

    /// Returns the current remote handle.
    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        self.binding().object_id.clone()
    }

    /// Returns the frame context owning the element.
    #[must_use]
    pub fn page(&self) -> Page {
        self.binding().page.clone()
    }

    /// Returns the execution scope.
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns a view of this element whose operations also expire after `duration`.
    ///
    /// The view shares identity, binding and cancellation with `self`.
    #[must_use]
    pub fn timeout(&self, duration: Duration) -> Element {
        Self {
            inner: Arc::clone(&self.inner),
            scope: self.scope.with_timeout(duration),
        }
    }

    /// Returns the frame context of an iframe element.
    #[must_use]
    pub fn frame(&self) -> Page {
        let binding = self.binding();
        binding.page.frame_of(binding.object_id.clone())
    }
}

// ============================================================================
// Element - Evaluation
// ============================================================================

impl Element {
    /// Evaluates `script` with `this` bound to the element.
    ///
    /// Function sources are called with `args` in order. With `by_value`
    /// the result is converted to JSON; otherwise a handle is kept.
    ///
    /// # Errors
    ///
    /// - [`Error::Evaluation`] if the script throws
    /// - [`Error::Cancelled`] or [`Error::Timeout`] if the scope ends first
    /// - protocol errors unchanged
    pub async fn eval(&self, by_value: bool, script: &str, args: Vec<Arg>) -> Result<RemoteObject> {
        let binding = self.binding();
        eval::call_on(&self.scope, &binding.page, &binding.object_id, script, args, by_value).await
    }

    /// Runs a bundled helper script with positional arguments.
    pub(crate) async fn call_helper(&self, helper: Helper, args: Vec<Arg>) -> Result<RemoteObject> {
        if args.len() != helper.arity() {
            return Err(Error::invalid_argument(format!(
                "helper {helper} takes {} arguments, got {}",
                helper.arity(),
                args.len()
            )));
        }
        self.eval(true, helper.source(), args).await
    }
}

// ============================================================================
// Element - Frame Resolution
// ============================================================================

impl Element {
    /// Makes sure the element is bound to the frame that owns `node_id`.
    ///
    /// If the current handle is not valid in the current frame, iframes are
    /// searched depth-first and the first frame resolving the node becomes
    /// the new owner. Identity is kept; the frame and handle are replaced
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFoundInAnyFrame`] if no reachable frame owns the node.
    pub async fn ensure_parent_page(&self, node_id: NodeId) -> Result<()> {
        let current = self.binding();
        let page = current.page.with_scope(self.scope.clone());

        let located = frame::locate(&page, Some(&current.object_id), node_id)
            .await?
            .require(node_id)?;

        if let Some((owner, object_id)) = located {
            debug!(
                element_id = %self.inner.id,
                node_id = %node_id,
                object_id = %object_id,
                "Rebinding element to nested frame"
            );
            let owner = owner.with_scope(current.page.scope().child());
            *self.inner.binding.write() = Arc::new(Binding {
                page: owner,
                object_id,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Element - Lifecycle
// ============================================================================

impl Element {
    /// Releases the remote handle and cancels the element's scope.
    ///
    /// The release itself is not raced against the scope.
    pub async fn release(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Releasing element");
        let binding = self.binding();
        binding.page.release(&binding.object_id).await?;
        self.scope.cancel();
        Ok(())
    }
}

// ============================================================================
// Element - Internal
// ============================================================================

impl Element {
    /// Snapshot of the current binding.
    #[inline]
    pub(crate) fn binding(&self) -> Arc<Binding> {
        Arc::clone(&self.inner.binding.read())
    }

    /// Sends a command on the owning session, raced against the element scope.
    pub(crate) async fn call<T>(&self, command: Command) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let page = self.page();
        self.scope
            .run(page.session().send(page.session_id(), command))
            .await
    }

    /// Runs an input device step, raced against the element scope.
    pub(crate) async fn with_input<F, Fut>(&self, step: F) -> Result<()>
    where
        F: FnOnce(Arc<dyn InputDevice>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let input = self.page().session().input();
        self.scope.run(step(input)).await
    }

    pub(crate) fn options(&self) -> Options {
        self.page().session().options().clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
