//! Interaction tracing and slow motion.
//!
//! Trace records go to the `cdp_element::trace` target at `info`. With the
//! overlay option on, a label is also drawn next to the element for the
//! duration of the step. Neither may fail the action.

use std::future::Future;

use tracing::{debug, info};

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::scripts::Helper;

use super::Element;

// ============================================================================
// Element - Tracing
// ============================================================================

impl Element {
    /// Sleeps for the slow-motion delay, if configured.
    pub(crate) async fn slow_motion(&self) -> Result<()> {
        match self.options().slow_motion {
            Some(delay) => self.scope.sleep(delay).await,
            None => Ok(()),
        }
    }

    /// Runs `step` wrapped in a trace record.
    pub(crate) async fn traced<T, Fut>(&self, action: &str, step: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let overlay = self.trace(action).await;
        let outcome = step.await;
        if let Some(overlay) = overlay {
            self.remove_overlay(&overlay).await;
        }
        outcome
    }

    /// Emits the trace record and draws the overlay. Returns the overlay id.
    async fn trace(&self, action: &str) -> Option<String> {
        let options = self.options();
        if !options.trace {
            return None;
        }
        info!(target: "cdp_element::trace", element_id = %self.inner.id, "{action}");

        if !options.overlay {
            return None;
        }
        let overlay = format!("cdp-element-trace-{}", ElementId::generate());
        match self
            .call_helper(Helper::Overlay, vec![overlay.as_str().into(), action.into()])
            .await
        {
            Ok(_) => Some(overlay),
            Err(e) => {
                debug!(element_id = %self.inner.id, error = %e, "Trace overlay failed");
                None
            }
        }
    }

    async fn remove_overlay(&self, overlay: &str) {
        if let Err(e) = self
            .call_helper(Helper::RemoveOverlay, vec![overlay.into()])
            .await
        {
            debug!(element_id = %self.inner.id, error = %e, "Trace overlay removal failed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
