//! Bidirectional connection/username store.
//!
//! [`Registry`] is the source of truth for "who is online". It keeps two
//! maps over the same relationship and updates them together. It holds no
//! lock of its own: [`crate::service::RelayService`] owns it behind a single
//! mutex so that every event observes both maps in a consistent state.

use std::collections::HashMap;

use super::ConnectionId;

/// In-memory mapping between registered connections and their usernames.
///
/// # Duplicate usernames
///
/// Registration never fails. When two connections claim the same name the
/// most recent claim owns the `username -> connection` entry. The reverse
/// entry is only ever deleted by the connection it points at, and if another
/// connection still carries the name it takes the entry over.
#[derive(Debug, Default)]
pub struct Registry {
    by_connection: HashMap<ConnectionId, String>,
    by_username: HashMap<String, ConnectionId>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `connection` with `username`, overwriting any previous
    /// claim in either direction.
    ///
    /// Returns the username this connection was registered under before, if
    /// any. That name's reverse entry no longer points at `connection`.
    pub fn register(
        &mut self,
        connection: ConnectionId,
        username: impl Into<String>,
    ) -> Option<String> {
        let username = username.into();
        let previous = self.by_connection.insert(connection, username.clone());
        if let Some(old) = previous.as_deref()
            && old != username
        {
            self.release_name(old, connection);
        }
        self.by_username.insert(username, connection);
        previous
    }

    /// Removes `connection` and its username.
    ///
    /// Returns the removed username, or `None` when the connection was never
    /// registered (nothing changed).
    pub fn unregister(&mut self, connection: ConnectionId) -> Option<String> {
        let username = self.by_connection.remove(&connection)?;
        self.release_name(&username, connection);
        Some(username)
    }

    /// Returns the username registered for `connection`.
    #[must_use]
    pub fn lookup(&self, connection: ConnectionId) -> Option<&str> {
        self.by_connection.get(&connection).map(String::as_str)
    }

    /// Returns the connection currently addressed by `username`.
    #[must_use]
    pub fn lookup_by_username(&self, username: &str) -> Option<ConnectionId> {
        self.by_username.get(username).copied()
    }

    /// Returns every registered username, one per registered connection.
    ///
    /// Iteration order is unspecified.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.by_connection.values().cloned().collect()
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_connection.len()
    }

    /// Returns `true` if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_connection.is_empty()
    }

    /// Drops the `username -> connection` entry if it still belongs to
    /// `connection`, handing it to another holder of the same name if one
    /// remains.
    fn release_name(&mut self, username: &str, connection: ConnectionId) {
        if self.by_username.get(username) != Some(&connection) {
            return;
        }
        self.by_username.remove(username);
        let successor = self
            .by_connection
            .iter()
            .find(|(id, name)| **id != connection && name.as_str() == username)
            .map(|(id, _)| *id);
        if let Some(successor) = successor {
            self.by_username.insert(username.to_string(), successor);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn register_populates_both_directions() {
        let mut registry = Registry::new();
        let alice = ConnectionId::new();

        assert_eq!(registry.register(alice, "alice"), None);
        assert_eq!(registry.lookup(alice), Some("alice"));
        assert_eq!(registry.lookup_by_username("alice"), Some(alice));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_removes_pair() {
        let mut registry = Registry::new();
        let alice = ConnectionId::new();
        registry.register(alice, "alice");

        assert_eq!(registry.unregister(alice).as_deref(), Some("alice"));
        assert_eq!(registry.lookup(alice), None);
        assert_eq!(registry.lookup_by_username("alice"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_unknown_connection_is_noop() {
        let mut registry = Registry::new();
        let alice = ConnectionId::new();
        registry.register(alice, "alice");

        assert_eq!(registry.unregister(ConnectionId::new()), None);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup_by_username("alice"), Some(alice));
    }

    #[test]
    fn reregistration_drops_old_reverse_entry() {
        let mut registry = Registry::new();
        let conn = ConnectionId::new();
        registry.register(conn, "alice");

        assert_eq!(registry.register(conn, "alicia").as_deref(), Some("alice"));
        assert_eq!(registry.lookup(conn), Some("alicia"));
        assert_eq!(registry.lookup_by_username("alicia"), Some(conn));
        assert_eq!(registry.lookup_by_username("alice"), None);
        assert_eq!(registry.snapshot(), vec!["alicia".to_string()]);
    }

    #[test]
    fn reregistering_same_name_keeps_entry() {
        let mut registry = Registry::new();
        let conn = ConnectionId::new();
        registry.register(conn, "alice");
        registry.register(conn, "alice");

        assert_eq!(registry.lookup_by_username("alice"), Some(conn));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_claim_of_a_name_wins() {
        let mut registry = Registry::new();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        registry.register(first, "sam");
        registry.register(second, "sam");

        assert_eq!(registry.lookup_by_username("sam"), Some(second));
        assert_eq!(registry.lookup(first), Some("sam"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn displaced_disconnect_keeps_winner_entry() {
        let mut registry = Registry::new();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        registry.register(first, "sam");
        registry.register(second, "sam");

        registry.unregister(first);
        assert_eq!(registry.lookup_by_username("sam"), Some(second));
    }

    #[test]
    fn winner_disconnect_hands_name_to_remaining_holder() {
        let mut registry = Registry::new();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        registry.register(first, "sam");
        registry.register(second, "sam");

        registry.unregister(second);
        assert_eq!(registry.lookup_by_username("sam"), Some(first));

        registry.unregister(first);
        assert_eq!(registry.lookup_by_username("sam"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_lists_every_registered_connection() {
        let mut registry = Registry::new();
        registry.register(ConnectionId::new(), "alice");
        registry.register(ConnectionId::new(), "bob");

        let mut names = registry.snapshot();
        names.sort();
        assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn empty_username_is_accepted() {
        let mut registry = Registry::new();
        let conn = ConnectionId::new();
        registry.register(conn, "");

        assert_eq!(registry.lookup(conn), Some(""));
        assert_eq!(registry.lookup_by_username(""), Some(conn));
    }
}
