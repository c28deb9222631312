//! Session tracking for relay conversations
//!
//! A session is one logical conversation tied to one transport
//! connection. The transcript lives with the connection task; the
//! registry only tracks which sessions are currently open.

pub mod registry;
pub mod store;

pub use registry::{SessionInfo, SessionRegistry};
pub use store::{ChatMessage, Session};
