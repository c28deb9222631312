//! Registry of open sessions
//!
//! Ownership-scoped map guarded by a single mutex; the lock is never
//! held across an await. No two open sessions share an identifier:
//! ids come from a random uuid, collisions are treated as negligible.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Metadata about an open session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session identifier
    pub id: String,
    /// Application the session belongs to
    pub application_id: String,
    /// When the connection was opened
    pub opened_at: DateTime<Utc>,
}

/// Tracks active connections keyed by session identifier
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionInfo>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its identifier
    pub fn open(&self, application_id: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let info = SessionInfo {
            id: id.clone(),
            application_id: application_id.into(),
            opened_at: Utc::now(),
        };
        self.lock().insert(id.clone(), info);
        id
    }

    /// Look up an open session
    pub fn get(&self, id: &str) -> Option<SessionInfo> {
        self.lock().get(id).cloned()
    }

    /// Evict a session. Returns false if it was not open.
    pub fn close(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session is open
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionInfo>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
