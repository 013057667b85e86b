//! Session coordinator and page factory.
//!
//! A [`Session`] owns the external collaborators and the shared options.
//! Every [`Page`] handed out by it runs under a child of the session scope,
//! so closing the session cancels all pending work.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::browser::Page;
use crate::error::Result;
use crate::identifiers::SessionId;
use crate::input::InputDevice;
use crate::protocol::client::send;
use crate::protocol::{Command, ProtocolClient};
use crate::scope::Scope;

use super::builder::SessionBuilder;
use super::domain::DomainToggles;
use super::options::Options;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the session.
pub(crate) struct SessionInner {
    /// Protocol client.
    pub client: Arc<dyn ProtocolClient>,

    /// Input device driver.
    pub input: Arc<dyn InputDevice>,

    /// Shared interaction options.
    pub options: Options,

    /// Domain holder counts.
    pub domains: DomainToggles,

    /// Root scope for every page.
    pub scope: Scope,
}

// ============================================================================
// Session
// ============================================================================

/// Element automation session over one protocol client.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.inner.options)
            .field("closed", &self.inner.scope.is_cancelled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Public API
// ============================================================================

impl Session {
    /// Creates a configuration builder for the session.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(crate) fn new(
        client: Arc<dyn ProtocolClient>,
        input: Arc<dyn InputDevice>,
        options: Options,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                input,
                options,
                domains: DomainToggles::default(),
                scope: Scope::new(),
            }),
        }
    }

    /// Returns the top-level page of the target attached as `session_id`.
    #[must_use]
    pub fn page(&self, session_id: impl Into<SessionId>) -> Page {
        let session_id = session_id.into();
        debug!(session_id = %session_id, "Opening page");
        Page::top(self.clone(), session_id)
    }

    /// Returns the shared options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Returns `true` once [`close`](Self::close) was called.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.scope.is_cancelled()
    }

    /// Cancels every pending operation of every page and element.
    pub fn close(&self) {
        debug!("Closing session");
        self.inner.scope.cancel();
    }
}

// ============================================================================
// Session - Internal
// ============================================================================

impl Session {
    #[inline]
    pub(crate) fn client(&self) -> &dyn ProtocolClient {
        self.inner.client.as_ref()
    }

    #[inline]
    pub(crate) fn input(&self) -> Arc<dyn InputDevice> {
        Arc::clone(&self.inner.input)
    }

    #[inline]
    pub(crate) fn domains(&self) -> &DomainToggles {
        &self.inner.domains
    }

    #[inline]
    pub(crate) fn scope(&self) -> &Scope {
        &self.inner.scope
    }

    /// Sends a typed command, not raced against any scope.
    pub(crate) async fn send<T>(&self, session_id: &SessionId, command: Command) -> Result<T>
    where
        T: DeserializeOwned,
    {
        send(self.client(), session_id, command).await
    }
}

// ============================================================================
// Tests
// ============================================================================
