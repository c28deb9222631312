//! Message envelope codec
//!
//! Inbound frames are JSON envelopes carrying the message text, the
//! client's view of the history and an optional context record.
//! Outbound frames are the bare reply text, never wrapped.

use serde::Deserialize;
use serde_json::Value;

/// Sentinel emitted once at connection establishment and ignored by
/// decoders on either side.
pub const CONNECTED_SENTINEL: &str = "connected";

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A well-formed message envelope
    Envelope(InboundEnvelope),
    /// A non-message control frame: the sentinel, or a body that is not
    /// structured data. Produces no reply.
    Control,
    /// Structured data without a usable `message` field
    Invalid { reason: String },
}

/// The inbound envelope shape
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InboundEnvelope {
    /// Latest user message
    pub message: String,
    /// Client-side history; accepted for compatibility, the relay keeps
    /// its own transcript
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Optional subject context for this conversation
    #[serde(default)]
    pub context: Option<Value>,
}

/// One client-supplied history entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Decode one text frame.
pub fn decode(frame: &str) -> Frame {
    let Ok(value) = serde_json::from_str::<Value>(frame) else {
        // Covers the bare "connected" sentinel and any other plain text.
        return Frame::Control;
    };

    if !value.is_object() {
        return Frame::Control;
    }

    match value.get("message") {
        Some(Value::String(_)) => match serde_json::from_value::<InboundEnvelope>(value) {
            Ok(envelope) => Frame::Envelope(envelope),
            Err(e) => Frame::Invalid {
                reason: e.to_string(),
            },
        },
        Some(_) => Frame::Invalid {
            reason: "message must be a string".to_string(),
        },
        None => Frame::Invalid {
            reason: "missing message field".to_string(),
        },
    }
}
