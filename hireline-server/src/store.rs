//! In-memory store of registered application contexts
//!
//! The page embedding the chat widget registers the subject's context
//! here before opening the WebSocket addressed by the application id.
//! Contexts live for the process lifetime only.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Application id -> registered context
#[derive(Debug, Default)]
pub struct ApplicationStore {
    contexts: Mutex<HashMap<String, Value>>,
}

impl ApplicationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context, generating an id when none is supplied.
    /// Re-registering an id replaces its context.
    pub fn register(&self, id: Option<String>, context: Value) -> String {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.lock().insert(id.clone(), context);
        id
    }

    /// Fetch a registered context
    pub fn get(&self, id: &str) -> Option<Value> {
        self.lock().get(id).cloned()
    }

    /// Number of registered applications
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.contexts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
