//! Scoped domain enablement.

use std::future::Future;

use crate::error::{Error, Result};
use crate::session::Domain;

use super::Page;

// ============================================================================
// Page - Domains
// ============================================================================

impl Page {
    /// Runs `region` with `domain` enabled on this page's session.
    ///
    /// Holders are counted per session and domain, so nested or concurrent
    /// regions enable once and disable once. The disable is attempted on
    /// every exit path, and is not raced against the scope. An enable cut
    /// short by the scope is disabled again before returning.
    ///
    /// # Errors
    ///
    /// - whatever `region` returns
    /// - the disable failure if `region` succeeded
    /// - [`Error::Release`] if both failed
    pub async fn with_domain<T, F, Fut>(&self, domain: Domain, region: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.session();
        let session_id = self.session_id();

        session
            .domains()
            .acquire(session.client(), session_id, domain, &self.scope)
            .await?;

        let outcome = region().await;
        let released = session
            .domains()
            .release(session.client(), session_id, domain)
            .await;

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(e), Ok(())) => Err(e),
            (Ok(_), Err(release)) => Err(release),
            (Err(e), Err(release)) => Err(Error::release(e, release)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
