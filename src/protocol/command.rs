//! Command definitions organized by protocol domain.
//!
//! Commands follow the `Domain.methodName` format of the remote debugging
//! protocol. Only the calls the element core issues are modelled.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `DOM` | Box model, scroll, describe/resolve node, file inputs |
//! | `Runtime` | Function calls, evaluation, properties, release |
//! | `Page` | Domain toggle, frame tree, isolated worlds, resources, capture |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identifiers::{BackendNodeId, ExecutionContextId, FrameId, NodeId, ObjectId};

use super::types::{CallArgument, Viewport};

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by domain.
///
/// This enum wraps domain-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// DOM domain commands.
    Dom(DomCommand),
    /// Runtime domain commands.
    Runtime(RuntimeCommand),
    /// Page domain commands.
    Page(PageCommand),
}

impl Command {
    /// Splits the command into its method name and params object.
    ///
    /// Commands without params produce an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn into_call(self) -> Result<(String, Value)> {
        let mut value = serde_json::to_value(self)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| Error::malformed("command did not serialize to an object"))?;

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(Error::malformed("command has no method")),
        };
        let params = object
            .remove("params")
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok((method, params))
    }
}

impl From<DomCommand> for Command {
    fn from(command: DomCommand) -> Self {
        Self::Dom(command)
    }
}

impl From<RuntimeCommand> for Command {
    fn from(command: RuntimeCommand) -> Self {
        Self::Runtime(command)
    }
}

impl From<PageCommand> for Command {
    fn from(command: PageCommand) -> Self {
        Self::Page(command)
    }
}

// ============================================================================
// DOM Commands
// ============================================================================

/// DOM domain commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum DomCommand {
    /// Enable the DOM agent.
    #[serde(rename = "DOM.enable")]
    Enable,

    /// Disable the DOM agent.
    #[serde(rename = "DOM.disable")]
    Disable,

    /// Query the box model of a node.
    #[serde(rename = "DOM.getBoxModel")]
    GetBoxModel {
        /// Element handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
    },

    /// Scroll a node into view if it is not already visible.
    #[serde(rename = "DOM.scrollIntoViewIfNeeded")]
    ScrollIntoViewIfNeeded {
        /// Element handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
    },

    /// Describe a node without requiring the DOM agent to track it.
    #[serde(rename = "DOM.describeNode")]
    DescribeNode {
        /// Element handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
        /// Subtree depth, -1 for the whole subtree.
        depth: i64,
        /// Traverse iframes and shadow roots.
        pierce: bool,
    },

    /// Resolve a node to a remote object handle.
    #[serde(rename = "DOM.resolveNode")]
    ResolveNode {
        /// Node id.
        #[serde(rename = "nodeId", skip_serializing_if = "Option::is_none")]
        node_id: Option<NodeId>,
        /// Backend node id.
        #[serde(rename = "backendNodeId", skip_serializing_if = "Option::is_none")]
        backend_node_id: Option<BackendNodeId>,
        /// Context the handle should belong to.
        #[serde(rename = "executionContextId", skip_serializing_if = "Option::is_none")]
        execution_context_id: Option<ExecutionContextId>,
    },

    /// Assign files to a file input element.
    #[serde(rename = "DOM.setFileInputFiles")]
    SetFileInputFiles {
        /// Absolute file paths.
        files: Vec<String>,
        /// Input element handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
    },
}

// ============================================================================
// Runtime Commands
// ============================================================================

/// Runtime domain commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RuntimeCommand {
    /// Call a function with `this` bound to a remote object.
    #[serde(rename = "Runtime.callFunctionOn")]
    CallFunctionOn {
        /// Object bound to `this`.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
        /// Function source.
        #[serde(rename = "functionDeclaration")]
        function_declaration: String,
        /// Positional arguments.
        arguments: Vec<CallArgument>,
        /// Convert the result to plain JSON.
        #[serde(rename = "returnByValue")]
        return_by_value: bool,
        /// Wait for a returned promise to settle.
        #[serde(rename = "awaitPromise")]
        await_promise: bool,
    },

    /// Evaluate an expression in a context.
    #[serde(rename = "Runtime.evaluate")]
    Evaluate {
        /// Expression source.
        expression: String,
        /// Target context, default context when absent.
        #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
        context_id: Option<ExecutionContextId>,
        /// Convert the result to plain JSON.
        #[serde(rename = "returnByValue")]
        return_by_value: bool,
    },

    /// List the properties of a remote object.
    #[serde(rename = "Runtime.getProperties")]
    GetProperties {
        /// Object handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
        /// Skip the prototype chain.
        #[serde(rename = "ownProperties")]
        own_properties: bool,
    },

    /// Release a remote object handle.
    #[serde(rename = "Runtime.releaseObject")]
    ReleaseObject {
        /// Object handle.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
    },
}

// ============================================================================
// Page Commands
// ============================================================================

/// Page domain commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum PageCommand {
    /// Enable the page agent (required for resource content).
    #[serde(rename = "Page.enable")]
    Enable,

    /// Disable the page agent.
    #[serde(rename = "Page.disable")]
    Disable,

    /// Get the frame tree of the page.
    #[serde(rename = "Page.getFrameTree")]
    GetFrameTree,

    /// Create an isolated world for a frame.
    #[serde(rename = "Page.createIsolatedWorld")]
    CreateIsolatedWorld {
        /// Frame to create the world in.
        #[serde(rename = "frameId")]
        frame_id: FrameId,
    },

    /// Fetch the content of a resource loaded by a frame.
    #[serde(rename = "Page.getResourceContent")]
    GetResourceContent {
        /// Frame that loaded the resource.
        #[serde(rename = "frameId")]
        frame_id: FrameId,
        /// Resource URL.
        url: String,
    },

    /// Capture a screenshot of the page.
    #[serde(rename = "Page.captureScreenshot")]
    CaptureScreenshot {
        /// Image format (`png`, `jpeg`, `webp`).
        format: String,
        /// Compression quality for lossy formats.
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<u8>,
        /// Region to capture.
        #[serde(skip_serializing_if = "Option::is_none")]
        clip: Option<Viewport>,
    },
}

// ============================================================================
// Tests
// ============================================================================
