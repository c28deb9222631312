//! Session-scoped bidirectional message relay
//!
//! One relay controller per connection: it owns the session transcript,
//! decodes inbound envelopes, forwards each user turn to the analyzer
//! collaborator and hands back the reply frames to push to the client.

pub mod controller;
pub mod envelope;

pub use controller::{RelayController, RelayState, INVALID_FORMAT_NOTICE, PRIMING_MESSAGE};
pub use envelope::{decode, Frame, HistoryEntry, InboundEnvelope, CONNECTED_SENTINEL};
