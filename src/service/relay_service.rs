//! Relay service: applies transport events and fans out deliveries.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::router::roster_update;
use crate::domain::{
    ConnectionId, Delivery, DeliveryTarget, MessageRouter, OutboundPayload, Registry,
};

/// Receiving side of a connection's outbound queue.
///
/// Besides the bounded payload queue it carries a roster-stale flag, set when
/// a `user_list_update` could not be queued because the queue was full.
#[derive(Debug)]
pub struct Outbound {
    rx: mpsc::Receiver<OutboundPayload>,
    roster_stale: Arc<AtomicBool>,
}

impl Outbound {
    /// Waits for the next queued payload. `None` once the relay has dropped
    /// this connection.
    pub async fn recv(&mut self) -> Option<OutboundPayload> {
        self.rx.recv().await
    }

    /// Returns the next queued payload without waiting.
    pub fn try_recv(&mut self) -> Option<OutboundPayload> {
        self.rx.try_recv().ok()
    }

    /// Returns `true` if no payload is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Sending side kept in the connection table.
#[derive(Debug)]
struct Peer {
    tx: mpsc::Sender<OutboundPayload>,
    roster_stale: Arc<AtomicBool>,
}

/// Roster and connection count taken under one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySnapshot {
    /// Registered usernames, unordered.
    pub users: Vec<String>,
    /// Live connections, registered or not.
    pub connections: usize,
}

/// Everything guarded by the relay lock.
#[derive(Debug, Default)]
struct RelayState {
    registry: Registry,
    connections: HashMap<ConnectionId, Peer>,
}

/// Orchestration layer for the four transport events.
///
/// Owns the [`Registry`] and the live connection table behind one
/// [`Mutex`]. Every handler follows the pattern: acquire lock → update
/// registry → compute deliveries → push each payload into the bounded
/// outbound queue of its recipients with `try_send`. A full queue drops the
/// payload for that connection only, so a slow client never stalls the
/// others. A dropped roster is recovered through [`RelayService::resync_roster`]
/// once the client has caught up.
#[derive(Debug)]
pub struct RelayService {
    state: Mutex<RelayState>,
    router: MessageRouter,
    outbound_capacity: usize,
}

impl RelayService {
    /// Creates a relay whose connections each get an outbound queue of
    /// `outbound_capacity` payloads (at least one).
    #[must_use]
    pub fn new(router: MessageRouter, outbound_capacity: usize) -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            router,
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// Allocates a handle and outbound queue for a new connection.
    ///
    /// The connection receives broadcasts from now on but is not part of
    /// the roster until it registers.
    pub async fn connect(&self) -> (ConnectionId, Outbound) {
        let connection = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        let roster_stale = Arc::new(AtomicBool::new(false));
        let peer = Peer {
            tx,
            roster_stale: Arc::clone(&roster_stale),
        };
        let mut state = self.state.lock().await;
        state.connections.insert(connection, peer);
        tracing::info!(%connection, connections = state.connections.len(), "client connected");
        (connection, Outbound { rx, roster_stale })
    }

    /// Registers `username` for `connection` and broadcasts the new roster.
    ///
    /// Ignored for connections that are not live.
    pub async fn register(&self, connection: ConnectionId, username: &str) {
        let mut state = self.state.lock().await;
        if !state.connections.contains_key(&connection) {
            tracing::debug!(%connection, reason = "not connected", "ignoring registration");
            return;
        }
        let previous = state.registry.register(connection, username);
        tracing::info!(
            %connection,
            username,
            previous = ?previous,
            registered = state.registry.len(),
            "user registered"
        );
        let roster = roster_update(&state.registry);
        dispatch(&state, roster);
    }

    /// Routes one inbound line from `connection`.
    pub async fn message_input(&self, connection: ConnectionId, text: &str) {
        let state = self.state.lock().await;
        for delivery in self.router.route(&state.registry, connection, text) {
            dispatch(&state, delivery);
        }
    }

    /// Forgets `connection`; broadcasts the roster if it was registered.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut state = self.state.lock().await;
        state.connections.remove(&connection);
        let removed = state.registry.unregister(connection);
        tracing::info!(
            %connection,
            username = removed.as_deref(),
            registered = state.registry.len(),
            connections = state.connections.len(),
            "client disconnected"
        );
        if removed.is_some() {
            if state.registry.is_empty() {
                tracing::debug!("roster is now empty");
            }
            let roster = roster_update(&state.registry);
            dispatch(&state, roster);
        }
    }

    /// Returns a fresh `user_list_update` if this connection missed one and
    /// its queue has drained, clearing the stale flag.
    ///
    /// Returns `None` while payloads are still queued, so an older queued
    /// roster can never arrive after the fresh one.
    pub async fn resync_roster(&self, outbound: &Outbound) -> Option<OutboundPayload> {
        if !outbound.is_empty() {
            return None;
        }
        let state = self.state.lock().await;
        if !outbound.roster_stale.swap(false, Ordering::AcqRel) {
            return None;
        }
        tracing::debug!("resending roster to lagging client");
        Some(OutboundPayload::UserListUpdate(state.registry.snapshot()))
    }

    /// Returns the roster and live connection count from the same moment.
    pub async fn snapshot(&self) -> RelaySnapshot {
        let state = self.state.lock().await;
        RelaySnapshot {
            users: state.registry.snapshot(),
            connections: state.connections.len(),
        }
    }

    /// Returns the connection currently addressed by `username`.
    pub async fn find_user(&self, username: &str) -> Option<ConnectionId> {
        self.state.lock().await.registry.lookup_by_username(username)
    }
}

/// Pushes `delivery` to its recipients. Returns how many queues accepted it.
fn dispatch(state: &RelayState, delivery: Delivery) -> usize {
    let event = delivery.payload.event_str();
    let queued = match delivery.target {
        DeliveryTarget::All => state
            .connections
            .iter()
            .map(|(id, peer)| enqueue(*id, peer, delivery.payload.clone()))
            .filter(|queued| *queued)
            .count(),
        DeliveryTarget::Connection(id) => match state.connections.get(&id) {
            Some(peer) => usize::from(enqueue(id, peer, delivery.payload)),
            None => {
                tracing::debug!(
                    connection = %id,
                    event,
                    reason = "not connected",
                    "dropping delivery"
                );
                0
            }
        },
    };
    tracing::debug!(event, queued, "delivery dispatched");
    queued
}

fn enqueue(connection: ConnectionId, peer: &Peer, payload: OutboundPayload) -> bool {
    let is_roster = matches!(payload, OutboundPayload::UserListUpdate(_));
    match peer.tx.try_send(payload) {
        Ok(()) => {
            if is_roster {
                // a newer roster is queued; nothing to resend
                peer.roster_stale.store(false, Ordering::Release);
            }
            true
        }
        Err(TrySendError::Full(payload)) => {
            if is_roster {
                peer.roster_stale.store(true, Ordering::Release);
            }
            tracing::warn!(
                %connection,
                event = payload.event_str(),
                "outbound queue full; payload dropped"
            );
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}
