//! HTTP session registry.
//!
//! Every `initialize` POST without an `Mcp-Session-Id` header opens a
//! [`SessionTransport`] keyed by a fresh UUID. Later requests carrying that
//! id are dispatched through the same transport until the client sends
//! `DELETE` or the transport is closed.
//!
//! The registry entry is removed only from the transport's close callback,
//! so a session can never be closed while still reachable from the map.

use super::error::{Result, TransportError};
use super::server::McpServer;
use opsgenie_mcp_domain::CredentialScope;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

type CloseCallback = Box<dyn FnOnce(&str) + Send>;

/// One client session of the streamable HTTP transport
pub struct SessionTransport {
    id: String,
    server: Arc<McpServer>,
    closed: AtomicBool,
    on_close: Mutex<Option<CloseCallback>>,
}

impl SessionTransport {
    fn new(id: String, server: Arc<McpServer>) -> Self {
        Self {
            id,
            server,
            closed: AtomicBool::new(false),
            on_close: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn set_on_close(&self, callback: CloseCallback) {
        *self.on_close.lock().unwrap_or_else(|e| e.into_inner()) = Some(callback);
    }

    /// Dispatch a decoded POST body through this session
    pub async fn handle(&self, payload: Value, scope: &CredentialScope) -> Result<Option<Value>> {
        if self.is_closed() {
            return Err(TransportError::SessionClosed(self.id.clone()));
        }
        Ok(self.server.handle_payload(payload, scope).await)
    }

    /// Close the session. The close callback runs at most once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let callback = self
            .on_close
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(callback) = callback {
            callback(&self.id);
        }
        debug!(session_id = %self.id, "Session transport closed");
    }
}

/// Live sessions keyed by `Mcp-Session-Id`
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<SessionTransport>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session with a fresh id and register it
    pub fn create(&self, server: Arc<McpServer>) -> Arc<SessionTransport> {
        let id = Uuid::new_v4().to_string();
        let transport = Arc::new(SessionTransport::new(id.clone(), server));

        let sessions = Arc::clone(&self.sessions);
        transport.set_on_close(Box::new(move |id| {
            sessions
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .remove(id);
            info!(session_id = %id, "Session removed");
        }));

        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone(), Arc::clone(&transport));
        info!(session_id = %id, "Session created");
        transport
    }

    pub fn get(&self, id: &str) -> Option<Arc<SessionTransport>> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Close and deregister a session; `false` if the id is unknown
    pub fn close(&self, id: &str) -> bool {
        // Release the read lock before close() takes the write lock
        let Some(transport) = self.get(id) else {
            return false;
        };
        transport.close();
        true
    }

    /// Close every live session
    pub fn close_all(&self) {
        let transports: Vec<Arc<SessionTransport>> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        for transport in transports {
            transport.close();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
