//! Result and parameter types mirroring the protocol's JSON shapes.
//!
//! Only the fields the element core reads are modelled; unknown fields are
//! ignored on deserialization.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{BackendNodeId, ExecutionContextId, FrameId, NodeId, ObjectId};

// ============================================================================
// Runtime
// ============================================================================

/// Tagged value produced by script evaluation.
///
/// `value` is populated for by-value results; `object_id` holds a live
/// handle when the result was kept by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteObject {
    /// JS type (`object`, `string`, `boolean`, `undefined`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Object subtype (`node`, `array`, `null`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Class name for object results.
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Plain JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Live handle for further reference.
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,

    /// String representation reported by the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RemoteObject {
    /// Returns the JSON value, `null` when absent.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.value.as_ref().unwrap_or(&Value::Null)
    }

    /// Reads the value as a flag.
    ///
    /// `true`, any nonzero number and the strings `"true"`, `"t"` and `"1"`
    /// (any case) count as set. Everything else, including objects, is unset.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self.value() {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "t" | "1"),
            _ => false,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value().as_str()
    }

    /// Returns `true` if the result is JS `null` or `undefined`.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        self.kind == "undefined" || self.subtype.as_deref() == Some("null")
    }
}

/// Positional argument for a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArgument {
    /// Reference to a live object in the same runtime.
    Object {
        /// Object handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
    },
    /// Plain JSON value.
    Value {
        /// Value passed by copy.
        value: Value,
    },
}

impl CallArgument {
    /// Creates a by-value argument.
    #[inline]
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value {
            value: value.into(),
        }
    }

    /// Creates a by-reference argument.
    #[inline]
    #[must_use]
    pub fn object(object_id: ObjectId) -> Self {
        Self::Object { object_id }
    }
}

/// Details of an exception thrown during evaluation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExceptionDetails {
    /// Short message.
    #[serde(default)]
    pub text: String,

    /// The thrown value.
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Returns the page-reported description of the exception.
    #[must_use]
    pub fn description(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

/// Result of `Runtime.callFunctionOn` and `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResult {
    /// Returned value.
    pub result: RemoteObject,

    /// Present if the script threw.
    #[serde(rename = "exceptionDetails", default)]
    pub exception_details: Option<ExceptionDetails>,
}

/// One entry of `Runtime.getProperties`.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,

    /// Property value.
    #[serde(default)]
    pub value: Option<RemoteObject>,
}

/// Result of `Runtime.getProperties`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPropertiesResult {
    /// Object properties.
    pub result: Vec<PropertyDescriptor>,
}

// ============================================================================
// DOM
// ============================================================================

/// Layout geometry of a node.
///
/// Each quad is eight numbers: four corner points, clockwise from top-left.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoxModel {
    /// Content box quad.
    pub content: Vec<f64>,

    /// Padding box quad.
    #[serde(default)]
    pub padding: Vec<f64>,

    /// Border box quad.
    #[serde(default)]
    pub border: Vec<f64>,

    /// Margin box quad.
    #[serde(default)]
    pub margin: Vec<f64>,
}

/// Result of `DOM.getBoxModel`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetBoxModelResult {
    /// Box model.
    pub model: BoxModel,
}

/// A DOM node as reported by `DOM.describeNode`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    /// Node id (0 when the DOM agent does not track the node).
    #[serde(rename = "nodeId", default)]
    pub node_id: Option<NodeId>,

    /// Backend node id.
    #[serde(rename = "backendNodeId")]
    pub backend_node_id: BackendNodeId,

    /// Node name (`IFRAME`, `DIV`, `#document`, ...).
    #[serde(rename = "nodeName", default)]
    pub node_name: String,

    /// Frame owned by this node, for frame owner elements.
    #[serde(rename = "frameId", default)]
    pub frame_id: Option<FrameId>,

    /// Shadow roots hosted by this element.
    #[serde(rename = "shadowRoots", default)]
    pub shadow_roots: Vec<Node>,

    /// Child nodes, when requested with depth.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Result of `DOM.describeNode`.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeNodeResult {
    /// Described node.
    pub node: Node,
}

/// Result of `DOM.resolveNode`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveNodeResult {
    /// Handle for the node.
    pub object: RemoteObject,
}

// ============================================================================
// Page
// ============================================================================

/// Capture region in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Region width.
    pub width: f64,
    /// Region height.
    pub height: f64,
    /// Device scale factor.
    pub scale: f64,
}

/// Frame description in the frame tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    /// Frame id.
    pub id: FrameId,

    /// Frame URL.
    #[serde(default)]
    pub url: String,
}

/// Frame tree rooted at the top-level frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameTree {
    /// This frame.
    pub frame: Frame,

    /// Child frames.
    #[serde(rename = "childFrames", default)]
    pub child_frames: Vec<FrameTree>,
}

/// Result of `Page.getFrameTree`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetFrameTreeResult {
    /// Frame tree.
    #[serde(rename = "frameTree")]
    pub frame_tree: FrameTree,
}

/// Result of `Page.createIsolatedWorld`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIsolatedWorldResult {
    /// Context of the new world.
    #[serde(rename = "executionContextId")]
    pub execution_context_id: ExecutionContextId,
}

/// Result of `Page.getResourceContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceContent {
    /// Resource body.
    pub content: String,

    /// `true` if `content` is base64-encoded.
    #[serde(rename = "base64Encoded", default)]
    pub base64_encoded: bool,
}

/// Result of `Page.captureScreenshot`.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotResult {
    /// Base64-encoded image.
    pub data: String,
}

// ============================================================================
// Tests
// ============================================================================
