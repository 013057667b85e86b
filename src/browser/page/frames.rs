//! Frame resolution over page contexts.

use async_trait::async_trait;

use crate::browser::eval::{self, Arg};
use crate::browser::frame::FrameContext;
use crate::error::Result;
use crate::identifiers::{NodeId, ObjectId};
use crate::protocol::DomCommand;
use crate::protocol::types::ResolveNodeResult;

use super::Page;

// ============================================================================
// Page - FrameContext
// ============================================================================

#[async_trait]
impl FrameContext for Page {
    async fn has_object(&self, object_id: &ObjectId) -> Result<bool> {
        let window = self.window().await?;
        let checked = eval::call_on(
            &self.scope,
            self,
            &window,
            "(o) => true",
            vec![Arg::Object(object_id.clone())],
            true,
        )
        .await;

        match checked {
            Ok(_) => Ok(true),
            Err(e) if e.is_server_error() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn iframes(&self) -> Result<Vec<ObjectId>> {
        self.query_all("iframe").await
    }

    async fn nested(&self, iframe: ObjectId) -> Result<Self> {
        Ok(self.frame_of(iframe))
    }

    async fn resolve_node(&self, node_id: NodeId) -> Result<Option<ObjectId>> {
        let execution_context_id = self.context_id().await?;
        let resolved = self
            .call::<ResolveNodeResult>(
                DomCommand::ResolveNode {
                    node_id: Some(node_id),
                    backend_node_id: None,
                    execution_context_id,
                }
                .into(),
            )
            .await;

        match resolved {
            Ok(result) => Ok(result.object.object_id),
            Err(e) if e.is_server_error() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn release(&self, object_id: &ObjectId) -> Result<()> {
        Page::release(self, object_id).await
    }

    async fn dispose(&self) -> Result<()> {
        match self.inner.window.get() {
            Some(window) => Page::release(self, window).await,
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
