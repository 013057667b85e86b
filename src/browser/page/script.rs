//! JavaScript execution in a frame context.

use tracing::debug;

use crate::browser::eval::{self, Arg};
use crate::error::{Error, Result};
use crate::identifiers::{ExecutionContextId, FrameId, ObjectId};
use crate::protocol::types::{
    CreateIsolatedWorldResult, EvaluateResult, GetFrameTreeResult,
};
use crate::protocol::{DescribeNodeResult, DomCommand, PageCommand, RemoteObject, RuntimeCommand};

use super::Page;

// ============================================================================
// Page - Script Execution
// ============================================================================

impl Page {
    /// Evaluates `script` with `this` bound to the frame's `window`.
    ///
    /// Function sources are called with `args`; other sources are
    /// evaluated as an expression.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = page.eval(true, "() => document.title", vec![]).await?;
    /// let sum = page.eval(true, "(a, b) => a + b", vec![1.into(), 2.into()]).await?;
    /// ```
    pub async fn eval(&self, by_value: bool, script: &str, args: Vec<Arg>) -> Result<RemoteObject> {
        let window = self.window().await?;
        eval::call_on(&self.scope, self, &window, script, args, by_value).await
    }

    /// Returns the frame id.
    ///
    /// Nested frames read it from their iframe element; the top-level page
    /// reads it from the frame tree.
    pub async fn frame_id(&self) -> Result<FrameId> {
        self.inner
            .frame_id
            .get_or_try_init(|| async {
                match self.owner() {
                    Some(owner) => {
                        let described: DescribeNodeResult = self
                            .call(
                                DomCommand::DescribeNode {
                                    object_id: owner.clone(),
                                    depth: 1,
                                    pierce: false,
                                }
                                .into(),
                            )
                            .await?;
                        described
                            .node
                            .frame_id
                            .ok_or_else(|| Error::malformed("iframe element has no frame id"))
                    }
                    None => {
                        let tree: GetFrameTreeResult =
                            self.call(PageCommand::GetFrameTree.into()).await?;
                        Ok(tree.frame_tree.frame.id)
                    }
                }
            })
            .await
            .cloned()
    }

    /// Returns the isolated world of a nested frame, `None` for the top-level page.
    pub(crate) async fn context_id(&self) -> Result<Option<ExecutionContextId>> {
        if self.is_root() {
            return Ok(None);
        }

        let id = self
            .inner
            .context_id
            .get_or_try_init(|| async {
                let frame_id = self.frame_id().await?;
                debug!(session_id = %self.session_id(), frame_id = %frame_id, "Creating isolated world");
                let world: CreateIsolatedWorldResult = self
                    .call(PageCommand::CreateIsolatedWorld { frame_id }.into())
                    .await?;
                Ok::<_, Error>(world.execution_context_id)
            })
            .await?;
        Ok(Some(*id))
    }

    /// Returns the handle of the frame's `window`.
    pub(crate) async fn window(&self) -> Result<ObjectId> {
        self.inner
            .window
            .get_or_try_init(|| async {
                let context_id = self.context_id().await?;
                let result: EvaluateResult = self
                    .call(
                        RuntimeCommand::Evaluate {
                            expression: "window".into(),
                            context_id,
                            return_by_value: false,
                        }
                        .into(),
                    )
                    .await?;
                result
                    .result
                    .object_id
                    .ok_or_else(|| Error::malformed("window evaluated without a handle"))
            })
            .await
            .cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
