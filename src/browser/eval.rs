//! Evaluation bridge.
//!
//! Runs a script with `this` bound to a remote handle. Arguments are
//! positional; promises are awaited; in-page exceptions become
//! [`Error::Evaluation`] while protocol failures pass through unchanged.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::ObjectId;
use crate::protocol::types::EvaluateResult;
use crate::protocol::{CallArgument, RemoteObject, RuntimeCommand};
use crate::scope::Scope;
use crate::scripts::function_declaration;

use super::element::Element;
use super::page::Page;

// ============================================================================
// Arg
// ============================================================================

/// Positional script argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Plain JSON value.
    Value(Value),
    /// Live handle in the same JS runtime as `this`.
    Object(ObjectId),
}

impl From<Arg> for CallArgument {
    fn from(arg: Arg) -> Self {
        match arg {
            Arg::Value(value) => CallArgument::value(value),
            Arg::Object(object_id) => CallArgument::object(object_id),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Vec<String>> for Arg {
    fn from(value: Vec<String>) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<ObjectId> for Arg {
    fn from(object_id: ObjectId) -> Self {
        Self::Object(object_id)
    }
}

impl From<&Element> for Arg {
    fn from(element: &Element) -> Self {
        Self::Object(element.object_id())
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Calls `script` on `this` inside `page`, raced against `scope`.
pub(crate) async fn call_on(
    scope: &Scope,
    page: &Page,
    this: &ObjectId,
    script: &str,
    args: Vec<Arg>,
    by_value: bool,
) -> Result<RemoteObject> {
    let command = RuntimeCommand::CallFunctionOn {
        object_id: this.clone(),
        function_declaration: function_declaration(script),
        arguments: args.into_iter().map(CallArgument::from).collect(),
        return_by_value: by_value,
        await_promise: true,
    };

    let result: EvaluateResult = scope
        .run(page.session().send(page.session_id(), command.into()))
        .await?;

    match result.exception_details {
        Some(details) => Err(Error::evaluation(details.description())),
        None => Ok(result.result),
    }
}

// ============================================================================
// Tests
// ============================================================================
