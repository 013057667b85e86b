//! Element inspection: attributes, text, geometry, DOM description.

use serde_json::Value;
use tracing::debug;

use crate::browser::geometry::{BoundingBox, Point};
use crate::error::{Error, Result};
use crate::protocol::types::{GetBoxModelResult, ResolveNodeResult};
use crate::protocol::{DescribeNodeResult, DomCommand, Node};
use crate::scripts::Helper;

use super::Element;

// ============================================================================
// Element - Properties
// ============================================================================

impl Element {
    /// Returns `true` if the element matches a CSS selector.
    pub async fn matches(&self, selector: &str) -> Result<bool> {
        let result = self
            .eval(true, "(s) => this.matches(s)", vec![selector.into()])
            .await?;
        Ok(result.as_bool())
    }

    /// Gets an attribute value, `None` if the attribute is absent.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let result = self
            .eval(true, "(n) => this.getAttribute(n)", vec![name.into()])
            .await?;
        Ok(result.as_str().map(str::to_string))
    }

    /// Gets a JS property value as JSON.
    pub async fn property(&self, name: &str) -> Result<Value> {
        let result = self.eval(true, "(n) => this[n]", vec![name.into()]).await?;
        Ok(result.value().clone())
    }

    /// Gets the visible text, or the value of form controls.
    pub async fn text(&self) -> Result<String> {
        let result = self.call_helper(Helper::Text, vec![]).await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// Gets the outer HTML.
    pub async fn html(&self) -> Result<String> {
        let result = self.eval(true, "this.outerHTML", vec![]).await?;
        Ok(result.as_str().unwrap_or_default().to_string())
    }

    /// Returns `true` if the element is rendered with a non-empty box.
    pub async fn visible(&self) -> Result<bool> {
        let result = self.call_helper(Helper::Visible, vec![]).await?;
        Ok(result.as_bool())
    }
}

// ============================================================================
// Element - Geometry
// ============================================================================

impl Element {
    /// Gets the content box from the box model.
    pub async fn bounding_box(&self) -> Result<BoundingBox> {
        let result: GetBoxModelResult = self
            .call(
                DomCommand::GetBoxModel {
                    object_id: self.object_id(),
                }
                .into(),
            )
            .await?;
        BoundingBox::from_model(&result.model)
    }

    /// Gets the center of the content box.
    pub async fn click_point(&self) -> Result<Point> {
        Ok(self.bounding_box().await?.click_point())
    }
}

// ============================================================================
// Element - DOM
// ============================================================================

impl Element {
    /// Describes the DOM node.
    ///
    /// A negative `depth` returns the whole subtree; `0` is treated as `1`.
    /// With `pierce`, iframes and shadow roots are traversed.
    pub async fn describe(&self, depth: i64, pierce: bool) -> Result<Node> {
        let depth = match depth {
            d if d < 0 => -1,
            0 => 1,
            d => d,
        };
        let result: DescribeNodeResult = self
            .call(
                DomCommand::DescribeNode {
                    object_id: self.object_id(),
                    depth,
                    pierce,
                }
                .into(),
            )
            .await?;
        Ok(result.node)
    }

    /// Returns the shadow root hosted by this element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] if the element hosts no shadow root.
    pub async fn shadow_root(&self) -> Result<Element> {
        let node = self.describe(1, false).await?;
        let Some(root) = node.shadow_roots.first() else {
            return Err(Error::element_not_found(format!(
                "shadow root of {}",
                node.node_name
            )));
        };
        debug!(element_id = %self.inner.id, backend_node_id = %root.backend_node_id, "Resolving shadow root");

        let page = self.page();
        let execution_context_id = page.with_scope(self.scope.clone()).context_id().await?;
        let resolved: ResolveNodeResult = self
            .call(
                DomCommand::ResolveNode {
                    node_id: None,
                    backend_node_id: Some(root.backend_node_id),
                    execution_context_id,
                }
                .into(),
            )
            .await?;

        resolved
            .object
            .object_id
            .map(|object_id| page.element_from_object(object_id))
            .ok_or_else(|| Error::malformed("shadow root resolved without a handle"))
    }
}

// ============================================================================
// Tests
// ============================================================================
