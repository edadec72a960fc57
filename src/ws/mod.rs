//! WebSocket layer: upgrade handler, connection loop, wire format.
//!
//! The WebSocket endpoint at `/ws` is the relay's transport: each socket is
//! one connection, its frames are the `register` and `message_input`
//! events, and its writes carry the roster and chat payloads.

pub mod connection;
pub mod handler;
pub mod messages;
