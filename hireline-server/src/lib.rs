//! HTTP and WebSocket server for hireline
//!
//! Exposes the chat relay WebSocket, the one-shot review endpoint and
//! the application context registration API.

pub mod handlers;
pub mod server;
pub mod state;
pub mod store;
pub mod ws;

pub use server::{router, run_server};
pub use state::AppState;
pub use store::ApplicationStore;
