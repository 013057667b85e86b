//! Scripted collaborators for unit tests.

use std::future::pending;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::input::{InputDevice, Key, MouseButton};
use crate::protocol::ProtocolClient;
use crate::session::{Options, Session};

// ============================================================================
// Journal
// ============================================================================

/// Ordered log shared by the mock client and the recording input.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

// ============================================================================
// MockClient
// ============================================================================

type Handler = dyn Fn(&str, &Value) -> Result<Value> + Send + Sync;

/// One recorded protocol call.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub session_id: SessionId,
    pub method: String,
    pub params: Value,
}

/// Protocol client answering from a closure of `(method, params)`.
pub(crate) struct MockClient {
    handler: Box<Handler>,
    calls: Mutex<Vec<Call>>,
    hanging: Mutex<FxHashSet<String>>,
    journal: Journal,
}

impl MockClient {
    pub fn new(handler: impl Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self::with_journal(handler, Journal::default())
    }

    pub fn with_journal(
        handler: impl Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
        journal: Journal,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            hanging: Mutex::new(FxHashSet::default()),
            journal,
        }
    }

    /// Makes every call of `method` wait forever.
    pub fn hang(&self, method: &str) {
        self.hanging.lock().insert(method.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.method.clone()).collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }

    /// Params of every call of `method`, in order.
    pub fn params(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .map(|c| c.params.clone())
            .collect()
    }
}

#[async_trait]
impl ProtocolClient for MockClient {
    async fn call(&self, session_id: &SessionId, method: &str, params: Value) -> Result<Value> {
        self.calls.lock().push(Call {
            session_id: session_id.clone(),
            method: method.to_string(),
            params: params.clone(),
        });
        self.journal.lock().push(method.to_string());

        if self.hanging.lock().contains(method) {
            return pending().await;
        }
        (self.handler)(method, &params)
    }
}

// ============================================================================
// RecordingInput
// ============================================================================

/// Input device that only records what it was asked to do.
#[derive(Default)]
pub(crate) struct RecordingInput {
    journal: Journal,
}

impl RecordingInput {
    pub fn with_journal(journal: Journal) -> Self {
        Self { journal }
    }

    /// Recorded input events, without protocol calls.
    pub fn events(&self) -> Vec<String> {
        self.journal
            .lock()
            .iter()
            .filter(|e| e.starts_with("input:"))
            .cloned()
            .collect()
    }

    fn record(&self, event: String) {
        self.journal.lock().push(event);
    }
}

#[async_trait]
impl InputDevice for RecordingInput {
    async fn move_mouse(&self, x: f64, y: f64, steps: u32) -> Result<()> {
        self.record(format!("input:move {x},{y},{steps}"));
        Ok(())
    }

    async fn mouse_button(&self, button: MouseButton) -> Result<()> {
        self.record(format!("input:button {}", button.as_str()));
        Ok(())
    }

    async fn key(&self, key: Key) -> Result<()> {
        self.record(format!("input:key {key}"));
        Ok(())
    }

    async fn insert_text(&self, text: &str) -> Result<()> {
        self.record(format!("input:text {text}"));
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Session wired to a mock client and a recording input sharing one journal.
pub(crate) struct Harness {
    pub session: Session,
    pub client: Arc<MockClient>,
    pub input: Arc<RecordingInput>,
    pub journal: Journal,
}

impl Harness {
    pub fn new(handler: impl Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self::with_options(handler, Options::default())
    }

    pub fn with_options(
        handler: impl Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
        options: Options,
    ) -> Self {
        let journal = Journal::default();
        let client = Arc::new(MockClient::with_journal(handler, Arc::clone(&journal)));
        let input = Arc::new(RecordingInput::with_journal(Arc::clone(&journal)));
        let session = Session::builder()
            .client(client.clone())
            .input(input.clone())
            .options(options)
            .build()
            .expect("valid test session");

        Self {
            session,
            client,
            input,
            journal,
        }
    }

    /// Everything recorded so far, protocol calls and input events interleaved.
    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().clone()
    }
}

// ============================================================================
// Tracing
// ============================================================================

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Extracts the `functionDeclaration` of a `Runtime.callFunctionOn` params object.
pub(crate) fn declaration(params: &Value) -> &str {
    params["functionDeclaration"].as_str().unwrap_or_default()
}

// ============================================================================
// Scripted Pages
// ============================================================================

/// Top page holds two iframes; the node lives in the second one.
pub(crate) fn two_frames(method: &str, params: &Value) -> Result<Value> {
    match method {
        "Runtime.evaluate" => match params.get("contextId").and_then(Value::as_i64) {
            Some(ctx) => Ok(json!({"result": {"type": "object", "objectId": format!("window-{ctx}")}})),
            None => Ok(json!({"result": {"type": "object", "objectId": "window-top"}})),
        },
        "Runtime.callFunctionOn" => {
            let script = declaration(params);
            if script.contains("querySelectorAll") {
                let list = match params["objectId"].as_str() {
                    Some("window-top") => "list-top",
                    _ => "list-empty",
                };
                Ok(json!({"result": {"type": "object", "objectId": list}}))
            } else {
                // Handles from other worlds are rejected.
                Err(Error::protocol(-32000, "Argument should belong to the same JavaScript world"))
            }
        }
        "Runtime.getProperties" => match params["objectId"].as_str() {
            Some("list-top") => Ok(json!({"result": [
                {"name": "0", "value": {"type": "object", "objectId": "iframe-a"}},
                {"name": "1", "value": {"type": "object", "objectId": "iframe-b"}}
            ]})),
            _ => Ok(json!({"result": []})),
        },
        "DOM.describeNode" => {
            let frame = match params["objectId"].as_str() {
                Some("iframe-a") => "FA",
                _ => "FB",
            };
            Ok(json!({"node": {"backendNodeId": 1, "frameId": frame}}))
        }
        "Page.createIsolatedWorld" => match params["frameId"].as_str() {
            Some("FA") => Ok(json!({"executionContextId": 1})),
            _ => Ok(json!({"executionContextId": 2})),
        },
        "DOM.resolveNode" => match params.get("executionContextId").and_then(Value::as_i64) {
            Some(2) => Ok(json!({"object": {"type": "object", "objectId": "node-in-b"}})),
            _ => Err(Error::protocol(-32000, "No node with given id found")),
        },
        "Runtime.releaseObject" => Ok(json!({})),
        other => Err(Error::protocol(-32601, format!("unexpected {other}"))),
    }
}


/// Visible element with content box `{top: 10, left: 20, width: 100, height: 50}`.
///
/// Every script returns `true`; every other call succeeds with `{}`.
pub(crate) fn interactive(method: &str, _params: &Value) -> Result<Value> {
    match method {
        "Runtime.evaluate" => Ok(json!({"result": {"type": "object", "objectId": "window-top"}})),
        "Runtime.callFunctionOn" => Ok(json!({"result": {"type": "boolean", "value": true}})),
        "DOM.getBoxModel" => Ok(json!({"model": {
            "content": [20.0, 10.0, 120.0, 10.0, 120.0, 60.0, 20.0, 60.0]
        }})),
        _ => Ok(json!({})),
    }
}
