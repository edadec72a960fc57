//! WebSocket wire format for client → server events.
//!
//! Frames are JSON objects naming an event and carrying its data, e.g.
//! `{"event": "register", "data": "alice"}`. Server → client frames use
//! [`crate::domain::OutboundPayload`] with the same envelope.

use serde::{Deserialize, Serialize};

/// Events a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Claim a display name.
    Register(String),
    /// Send a chat line; a leading `@name ` makes it private.
    MessageInput(String),
}
