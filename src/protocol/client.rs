//! Protocol client seam.
//!
//! The wire transport (persistent connection, command/event multiplexing)
//! lives outside this crate. Anything that can round-trip one command
//! implements [`ProtocolClient`].

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::SessionId;

use super::Command;

// ============================================================================
// ProtocolClient
// ============================================================================

/// Issues protocol calls over an established connection.
///
/// Implementations report browser-side rejections as
/// [`Error::Protocol`](crate::Error::Protocol) carrying the browser's error
/// code, and connection faults as protocol errors with code `0`.
///
/// # Example
///
/// ```ignore
/// struct Wire { /* connection */ }
///
/// #[async_trait]
/// impl ProtocolClient for Wire {
///     async fn call(&self, session_id: &SessionId, method: &str, params: Value) -> Result<Value> {
///         self.connection.request(session_id, method, params).await
///     }
/// }
/// ```
#[async_trait]
pub trait ProtocolClient: Send + Sync {
    /// Sends `method` with `params` on the given session and waits for the result.
    async fn call(&self, session_id: &SessionId, method: &str, params: Value) -> Result<Value>;
}

// ============================================================================
// Typed Helpers
// ============================================================================

/// Sends a typed command and deserializes its result.
pub(crate) async fn send<T>(
    client: &dyn ProtocolClient,
    session_id: &SessionId,
    command: Command,
) -> Result<T>
where
    T: DeserializeOwned,
{
    let (method, params) = command.into_call()?;
    let value = client.call(session_id, &method, params).await?;
    Ok(serde_json::from_value(value)?)
}
