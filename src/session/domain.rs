//! Reference-counted protocol domain toggles.
//!
//! Several elements of one session may need the same domain enabled at
//! once. The first holder sends `X.enable`, the last one out sends
//! `X.disable`. Each `(session, domain)` slot is guarded by an async mutex
//! so enable and disable never interleave.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::client::send;
use crate::protocol::{Command, DomCommand, PageCommand, ProtocolClient};
use crate::scope::Scope;

// ============================================================================
// Domain
// ============================================================================

/// Protocol domain that can be toggled for a scoped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// `Page` domain (frame resources).
    Page,
    /// `DOM` domain.
    Dom,
}

impl Domain {
    fn enable(self) -> Command {
        match self {
            Self::Page => PageCommand::Enable.into(),
            Self::Dom => DomCommand::Enable.into(),
        }
    }

    fn disable(self) -> Command {
        match self {
            Self::Page => PageCommand::Disable.into(),
            Self::Dom => DomCommand::Disable.into(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Page => "Page",
            Self::Dom => "DOM",
        })
    }
}

// ============================================================================
// DomainToggles
// ============================================================================

type Slot = Arc<tokio::sync::Mutex<usize>>;

/// Holder counts per `(session, domain)`.
#[derive(Default)]
pub(crate) struct DomainToggles {
    slots: Mutex<FxHashMap<(SessionId, Domain), Slot>>,
}

impl DomainToggles {
    fn slot(&self, session_id: &SessionId, domain: Domain) -> Slot {
        Arc::clone(
            self.slots
                .lock()
                .entry((session_id.clone(), domain))
                .or_default(),
        )
    }

    /// Registers one holder, enabling the domain if it is the first.
    ///
    /// The count only moves once the enable call succeeded. If `scope` ends
    /// while the enable is in flight, the browser may already have applied
    /// it, so a disable is sent before returning.
    pub async fn acquire(
        &self,
        client: &dyn ProtocolClient,
        session_id: &SessionId,
        domain: Domain,
        scope: &Scope,
    ) -> Result<()> {
        let slot = self.slot(session_id, domain);
        let mut holders = scope.run(async { Ok(slot.lock().await) }).await?;
        if *holders == 0 {
            debug!(session_id = %session_id, %domain, "Enabling domain");
            let enabled = scope.run(send::<Value>(client, session_id, domain.enable())).await;
            match enabled {
                Ok(_) => {}
                Err(e) if e.is_cancelled() => {
                    debug!(session_id = %session_id, %domain, "Enable interrupted, disabling domain");
                    return match send::<Value>(client, session_id, domain.disable()).await {
                        Ok(_) => Err(e),
                        Err(release) => Err(Error::release(e, release)),
                    };
                }
                Err(e) => return Err(e),
            }
        }
        *holders += 1;
        Ok(())
    }

    /// Drops one holder, disabling the domain when none remain.
    ///
    /// The holder is dropped even if the disable call fails.
    pub async fn release(
        &self,
        client: &dyn ProtocolClient,
        session_id: &SessionId,
        domain: Domain,
    ) -> Result<()> {
        let slot = self.slot(session_id, domain);
        let mut holders = slot.lock().await;
        *holders = holders.saturating_sub(1);
        if *holders == 0 {
            debug!(session_id = %session_id, %domain, "Disabling domain");
            send::<Value>(client, session_id, domain.disable()).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn holders(&self, session_id: &SessionId, domain: Domain) -> usize {
        *self.slot(session_id, domain).lock().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::MockClient;

    #[tokio::test]
    async fn test_nested_holders_toggle_once() {
        let client = MockClient::new(|_, _| Ok(json!({})));
        let toggles = DomainToggles::default();
        let session = SessionId::new("S1");

        toggles.acquire(&client, &session, Domain::Page, &Scope::new()).await.expect("first");
        toggles.acquire(&client, &session, Domain::Page, &Scope::new()).await.expect("second");
        toggles.release(&client, &session, Domain::Page).await.expect("release");
        assert_eq!(client.count("Page.disable"), 0);
        toggles.release(&client, &session, Domain::Page).await.expect("release");

        assert_eq!(client.count("Page.enable"), 1);
        assert_eq!(client.count("Page.disable"), 1);
        assert_eq!(toggles.holders(&session, Domain::Page).await, 0);
    }

    #[tokio::test]
    async fn test_sessions_are_counted_separately() {
        let client = MockClient::new(|_, _| Ok(json!({})));
        let toggles = DomainToggles::default();

        toggles
            .acquire(&client, &SessionId::new("A"), Domain::Dom, &Scope::new())
            .await
            .expect("A");
        toggles
            .acquire(&client, &SessionId::new("B"), Domain::Dom, &Scope::new())
            .await
            .expect("B");

        assert_eq!(client.count("DOM.enable"), 2);
    }

    #[tokio::test]
    async fn test_failed_enable_leaves_count_untouched() {
        let client = MockClient::new(|method, _| match method {
            "Page.enable" => Err(Error::protocol(-32000, "not allowed")),
            _ => Ok(json!({})),
        });
        let toggles = DomainToggles::default();
        let session = SessionId::new("S1");

        assert!(toggles.acquire(&client, &session, Domain::Page, &Scope::new()).await.is_err());
        assert_eq!(toggles.holders(&session, Domain::Page).await, 0);
        assert_eq!(client.count("Page.disable"), 0);
    }

    #[tokio::test]
    async fn test_cancelled_enable_is_paired_with_disable() {
        let client = MockClient::new(|_, _| Ok(json!({})));
        client.hang("Page.enable");
        let toggles = DomainToggles::default();
        let session = SessionId::new("S1");
        let scope = Scope::new();

        let acquire = toggles.acquire(&client, &session, Domain::Page, &scope);
        let cancel = async {
            tokio::task::yield_now().await;
            scope.cancel();
        };
        let (result, ()) = tokio::join!(acquire, cancel);

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(client.methods(), vec!["Page.enable", "Page.disable"]);
        assert_eq!(toggles.holders(&session, Domain::Page).await, 0);
    }

    #[tokio::test]
    async fn test_cancelled_scope_sends_nothing() {
        let client = MockClient::new(|_, _| Ok(json!({})));
        let toggles = DomainToggles::default();
        let session = SessionId::new("S1");
        let scope = Scope::new();
        scope.cancel();

        let result = toggles.acquire(&client, &session, Domain::Page, &scope).await;

        assert!(result.is_err_and(|e| e.is_cancelled()));
        assert!(client.methods().is_empty());
    }
}
