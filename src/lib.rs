//! # chat-relay
//!
//! Real-time chat relay over WebSocket.
//!
//! Clients connect to `/ws`, register a display name, and send lines that
//! are either broadcast to everyone or, when prefixed with `@name `,
//! delivered privately to one user and echoed back to the sender. Every
//! roster change is pushed to all connections as a full list.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)        REST Handlers (api/)
//!     │
//!     ├── RelayService (service/)
//!     │       one mutex, per-connection outbound queues
//!     │
//!     ├── MessageRouter (domain/)
//!     └── Registry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod routes;
pub mod service;
pub mod ws;
