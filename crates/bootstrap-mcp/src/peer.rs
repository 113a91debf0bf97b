//! Server-to-client requests over the shared stdio channel
//!
//! Outgoing requests get an id from [`RequestIdGenerator`] and a oneshot
//! channel in the pending map. The read loop hands every response to
//! [`Peer::resolve`], which completes the matching waiter.

use crate::jsonrpc::{self, RequestIdGenerator, RpcError};
use bootstrap_core::elicitation::{ElicitationRequest, ElicitationResponse, Elicitor};
use bootstrap_core::ElicitationError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Method used to ask the client for structured input
pub const ELICITATION_METHOD: &str = "elicitation/create";

type PendingMap = HashMap<u64, oneshot::Sender<Result<Value, RpcError>>>;

/// Handle for talking back to the connected client
#[derive(Debug, Clone)]
pub struct Peer {
    outgoing: mpsc::UnboundedSender<Value>,
    pending: Arc<Mutex<PendingMap>>,
    ids: Arc<RequestIdGenerator>,
    elicitation: Arc<AtomicBool>,
}

/// Removes a pending entry when the waiting request is dropped (e.g. on timeout)
struct PendingGuard<'a> {
    pending: &'a Mutex<PendingMap>,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&self.id);
        }
    }
}

impl Peer {
    pub fn new(outgoing: mpsc::UnboundedSender<Value>) -> Self {
        Self {
            outgoing,
            pending: Arc::new(Mutex::new(HashMap::new())),
            ids: Arc::new(RequestIdGenerator::new()),
            elicitation: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue a message for the writer
    pub fn send(&self, message: Value) -> Result<(), RpcError> {
        self.outgoing
            .send(message)
            .map_err(|_| RpcError::internal("Output channel closed"))
    }

    /// Record whether the client declared the elicitation capability
    pub fn set_elicitation_supported(&self, supported: bool) {
        self.elicitation.store(supported, Ordering::SeqCst);
    }

    pub fn elicitation_supported(&self) -> bool {
        self.elicitation.load(Ordering::SeqCst)
    }

    /// Send a request to the client and wait for its response
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.ids.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .map_err(|_| RpcError::internal("Pending request map poisoned"))?
            .insert(id, tx);
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        debug!(id, method, "Sending request to client");
        self.send(jsonrpc::build_request(id, method, params))?;

        rx.await
            .map_err(|_| RpcError::internal("Request dropped before a response arrived"))?
    }

    /// Complete the waiter for a client response
    ///
    /// Returns false when no request with that id is pending.
    pub fn resolve(&self, id: u64, message: Value) -> bool {
        let sender = match self.pending.lock() {
            Ok(mut pending) => pending.remove(&id),
            Err(_) => None,
        };

        let Some(sender) = sender else {
            warn!(id, "Response for unknown request");
            return false;
        };

        let outcome = match jsonrpc::extract_error(&message) {
            Some(err) => Err(err),
            None => Ok(message.get("result").cloned().unwrap_or(Value::Null)),
        };
        // The waiter may have timed out already
        let _ = sender.send(outcome);
        true
    }

    /// Number of requests still waiting for a response
    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Elicitor for Peer {
    async fn elicit(
        &self,
        request: ElicitationRequest,
    ) -> Result<ElicitationResponse, ElicitationError> {
        if !self.elicitation_supported() {
            return Err(ElicitationError::Unsupported);
        }

        let params = serde_json::to_value(&request)
            .map_err(|e| ElicitationError::Transport(e.to_string()))?;
        let result = self
            .request(ELICITATION_METHOD, params)
            .await
            .map_err(|e| ElicitationError::Transport(e.to_string()))?;
        ElicitationResponse::from_value(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootstrap_core::elicitation::ElicitationAction;
    use serde_json::json;
    use std::time::Duration;

    fn request_fields() -> ElicitationRequest {
        ElicitationRequest::project_details("Configure", [("a", "a"), ("b", "b"), ("c", "c")])
    }

    #[tokio::test]
    async fn test_elicit_without_capability_is_unsupported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let peer = Peer::new(tx);
        let err = peer.elicit(request_fields()).await.unwrap_err();
        assert!(matches!(err, ElicitationError::Unsupported));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_elicit_round_trip() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let peer = Peer::new(tx);
        peer.set_elicitation_supported(true);

        let responder = peer.clone();
        let client = tokio::spawn(async move {
            let sent = rx.recv().await.unwrap();
            assert_eq!(sent["method"], ELICITATION_METHOD);
            assert!(sent["params"]["requestedSchema"].is_object());
            let id = sent["id"].as_u64().unwrap();
            responder.resolve(
                id,
                json!({"jsonrpc": "2.0", "id": id, "result": {
                    "action": "accept",
                    "content": {"project_name": "p", "domain": "d", "tools": "t"}
                }}),
            )
        });

        let response = peer.elicit(request_fields()).await.unwrap();
        assert!(client.await.unwrap());
        assert_eq!(response.action, ElicitationAction::Accept);
        assert_eq!(peer.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_client_error_becomes_transport_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let peer = Peer::new(tx);
        peer.set_elicitation_supported(true);

        let responder = peer.clone();
        tokio::spawn(async move {
            let sent = rx.recv().await.unwrap();
            let id = sent["id"].as_u64().unwrap();
            responder.resolve(
                id,
                jsonrpc::build_error_response(json!(id), -32601, "Method not found"),
            );
        });

        let err = peer.elicit(request_fields()).await.unwrap_err();
        assert!(matches!(err, ElicitationError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timed_out_request_is_removed_from_pending() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let peer = Peer::new(tx);
        let waited =
            tokio::time::timeout(Duration::from_millis(20), peer.request("ping", json!({}))).await;
        assert!(waited.is_err());
        assert_eq!(peer.pending_count(), 0);
        assert!(!peer.resolve(1, json!({"id": 1, "result": {}})));
    }
}
