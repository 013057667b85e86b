//! Element lookup in a frame context.

use tracing::{debug, warn};

use crate::browser::Element;
use crate::browser::frame;
use crate::error::{Error, Result};
use crate::identifiers::{NodeId, ObjectId};
use crate::protocol::RuntimeCommand;
use crate::protocol::types::GetPropertiesResult;

use super::Page;

// ============================================================================
// Page - Element Lookup
// ============================================================================

impl Page {
    /// Finds the first element matching a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] if nothing matches.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let button = page.element("form button[type=submit]").await?;
    /// ```
    pub async fn element(&self, selector: &str) -> Result<Element> {
        debug!(session_id = %self.session_id(), selector, "Finding element");

        let found = self
            .eval(false, "(s) => document.querySelector(s)", vec![selector.into()])
            .await?;
        if found.is_nullish() {
            return Err(Error::element_not_found(selector));
        }
        found
            .object_id
            .map(|object_id| self.element_from_object(object_id))
            .ok_or_else(|| Error::element_not_found(selector))
    }

    /// Finds every element matching a CSS selector, in document order.
    pub async fn elements(&self, selector: &str) -> Result<Vec<Element>> {
        debug!(session_id = %self.session_id(), selector, "Finding elements");

        let handles = self.query_all(selector).await?;
        Ok(handles
            .into_iter()
            .map(|object_id| self.element_from_object(object_id))
            .collect())
    }

    /// Returns the frame's `document` node.
    pub async fn document(&self) -> Result<Element> {
        let document = self.eval(false, "() => document", vec![]).await?;
        document
            .object_id
            .map(|object_id| self.element_from_object(object_id))
            .ok_or_else(|| Error::element_not_found("document"))
    }

    /// Wraps a handle issued by this context.
    #[must_use]
    pub fn element_from_object(&self, object_id: ObjectId) -> Element {
        Element::new(self.clone(), object_id)
    }

    /// Creates an element from a DOM node id.
    ///
    /// If the node lives in a nested iframe, the element is bound to that
    /// iframe's context instead of this one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFoundInAnyFrame`] if no reachable frame owns the node.
    pub async fn element_from_node(&self, node_id: NodeId) -> Result<Element> {
        debug!(session_id = %self.session_id(), node_id = %node_id, "Resolving node");

        let resolved = frame::FrameContext::resolve_node(self, node_id).await?;
        let located = frame::locate(self, resolved.as_ref(), node_id)
            .await?
            .require(node_id)?;

        match (located, resolved) {
            (Some((owner, object_id)), stale) => {
                if let Some(stale) = stale
                    && let Err(e) = self.release(&stale).await
                {
                    warn!(object_id = %stale, error = %e, "Failed to release stale handle");
                }
                Ok(owner.element_from_object(object_id))
            }
            (None, Some(object_id)) => Ok(self.element_from_object(object_id)),
            (None, None) => Err(Error::not_found_in_any_frame(node_id)),
        }
    }
}

// ============================================================================
// Page - Internal
// ============================================================================

impl Page {
    /// Handles of every element matching `selector`, in document order.
    ///
    /// The intermediate node list is always released.
    pub(crate) async fn query_all(&self, selector: &str) -> Result<Vec<ObjectId>> {
        let list = self
            .eval(false, "(s) => document.querySelectorAll(s)", vec![selector.into()])
            .await?;
        let Some(list_id) = list.object_id else {
            return Err(Error::malformed("querySelectorAll returned no handle"));
        };

        let listed = self
            .call::<GetPropertiesResult>(
                RuntimeCommand::GetProperties {
                    object_id: list_id.clone(),
                    own_properties: true,
                }
                .into(),
            )
            .await;
        let released = self.release(&list_id).await;

        let properties = match (listed, released) {
            (Ok(properties), Ok(())) => properties,
            (Err(e), Ok(())) => return Err(e),
            (Ok(_), Err(release)) => return Err(release),
            (Err(e), Err(release)) => return Err(Error::release(e, release)),
        };

        let mut indexed: Vec<(usize, ObjectId)> = properties
            .result
            .into_iter()
            .filter_map(|property| {
                let index = property.name.parse::<usize>().ok()?;
                let object_id = property.value?.object_id?;
                Some((index, object_id))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        Ok(indexed.into_iter().map(|(_, object_id)| object_id).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
