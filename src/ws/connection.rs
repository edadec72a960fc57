//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! frames become relay events, and payloads queued for this connection are
//! written back as JSON text frames.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};

use super::messages::InboundEvent;
use crate::domain::{ConnectionId, OutboundPayload};
use crate::service::RelayService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the relay on entry.
/// - Reads events from the client and applies them.
/// - Forwards payloads from the connection's outbound queue to the client,
///   followed by a fresh roster if one was dropped while the queue was full.
/// - Disconnects from the relay when either side goes away.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayService>) {
    let (connection, mut outbound) = relay.connect().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&relay, connection, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection, error = %err, "ws read failed");
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!(%connection, "ignoring binary frame");
                    }
                    Some(Ok(_)) => {}
                }
            }
            payload = outbound.recv() => {
                let Some(payload) = payload else {
                    break;
                };
                if !send_payload(&mut ws_tx, connection, &payload).await {
                    break;
                }
                if let Some(roster) = relay.resync_roster(&outbound).await
                    && !send_payload(&mut ws_tx, connection, &roster).await
                {
                    break;
                }
            }
        }
    }

    relay.disconnect(connection).await;
    tracing::debug!(%connection, "ws connection closed");
}

/// Writes `payload` as a JSON text frame. Returns `false` once the socket
/// is gone; payloads that fail to encode are skipped.
async fn send_payload(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    connection: ConnectionId,
    payload: &OutboundPayload,
) -> bool {
    match serde_json::to_string(payload) {
        Ok(json) => ws_tx.send(Message::text(json)).await.is_ok(),
        Err(err) => {
            tracing::warn!(%connection, error = %err, "failed to encode payload");
            true
        }
    }
}

/// Decodes one text frame and applies it. Undecodable frames are dropped.
async fn handle_text_message(relay: &RelayService, connection: ConnectionId, text: &str) {
    match serde_json::from_str::<InboundEvent>(text) {
        Ok(InboundEvent::Register(username)) => relay.register(connection, &username).await,
        Ok(InboundEvent::MessageInput(line)) => relay.message_input(connection, &line).await,
        Err(err) => {
            tracing::debug!(%connection, error = %err, "ignoring malformed frame");
        }
    }
}
