//! The replica store: one [`Replica`] per known peer, keyed by identity.
//!
//! The store is owned by a single task in the peer process; input and
//! network flows send it messages rather than locking it. That ownership is
//! the whole concurrency story for drawing state.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::replica::Replica;
use crate::protocol::messages::BoardEvent;

/// Opaque identity of a participant; also the second field of every wire
/// line. Nothing prevents two processes from picking the same identity, in
/// which case their strokes merge into one replica on everyone's board —
/// pick distinct names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PeerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// All drawing state known to one peer process.
///
/// # HashMap choice
///
/// Replicas are looked up by sender identity on every received event, so
/// O(1) lookup matters. Iteration order is not guaranteed, which is fine:
/// peers' strokes have no defined stacking order between each other.
pub struct BoardStore {
    local: PeerId,
    replicas: HashMap<PeerId, Replica>,
}

impl BoardStore {
    /// Creates a store with the local peer's replica already present.
    pub fn new(local: PeerId) -> Self {
        let mut replicas = HashMap::new();
        replicas.insert(local.clone(), Replica::new());
        Self { local, replicas }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local
    }

    pub fn local(&self) -> &Replica {
        // The local replica is inserted in `new` and never removed.
        &self.replicas[&self.local]
    }

    /// The one replica device input is allowed to mutate.
    pub fn local_mut(&mut self) -> &mut Replica {
        self.replicas
            .get_mut(&self.local)
            .expect("local replica exists for the process lifetime")
    }

    pub fn replica(&self, peer: &PeerId) -> Option<&Replica> {
        self.replicas.get(peer)
    }

    /// Looks up a peer's replica, creating it on first reference.
    ///
    /// An unknown sender is not an error: the first event from a new peer is
    /// how we learn that the peer exists. Replicas live for the process
    /// lifetime; there is no peer-leave garbage collection.
    pub fn replica_mut(&mut self, peer: &PeerId) -> &mut Replica {
        if !self.replicas.contains_key(peer) {
            debug!(peer = %peer, "first event from unseen peer, creating replica");
            self.replicas.insert(peer.clone(), Replica::new());
        }
        self.replicas
            .get_mut(peer)
            .expect("entry inserted just above")
    }

    /// Replays an event from `sender` onto that sender's replica.
    ///
    /// Identity filtering (echo suppression) is the replication loop's job;
    /// the store applies whatever it is told.
    pub fn apply_remote(&mut self, sender: &PeerId, event: &BoardEvent) {
        self.replica_mut(sender).apply_event(event);
    }

    /// All replicas, local included, for rendering.
    pub fn iter(&self) -> impl Iterator<Item = (&PeerId, &Replica)> {
        self.replicas.iter()
    }

    pub fn peer_count(&self) -> usize {
        self.replicas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::replica::Point;

    #[test]
    fn test_store_starts_with_local_replica_only() {
        let store = BoardStore::new(PeerId::from("alice"));

        assert_eq!(store.peer_count(), 1);
        assert_eq!(store.local_id(), &PeerId::from("alice"));
        assert!(store.replica(&PeerId::from("bob")).is_none());
    }

    #[test]
    fn test_unknown_sender_creates_replica_lazily() {
        let mut store = BoardStore::new(PeerId::from("alice"));

        store.apply_remote(&PeerId::from("bob"), &BoardEvent::PenDown);

        assert_eq!(store.peer_count(), 2);
        assert!(store.replica(&PeerId::from("bob")).unwrap().pen_down());
    }

    #[test]
    fn test_remote_events_only_touch_the_senders_replica() {
        let mut store = BoardStore::new(PeerId::from("alice"));
        let bob = PeerId::from("bob");

        store.apply_remote(&bob, &BoardEvent::PenDown);
        store.apply_remote(&bob, &BoardEvent::PenMotion { x: 3, y: 4 });

        assert!(store.local().strokes().is_empty());
        assert_eq!(
            store.replica(&bob).unwrap().strokes()[0].points,
            vec![Point::new(3, 4)]
        );
    }

    #[test]
    fn test_close_retains_replica_and_strokes() {
        let mut store = BoardStore::new(PeerId::from("alice"));
        let bob = PeerId::from("bob");
        store.apply_remote(&bob, &BoardEvent::PenDown);
        store.apply_remote(&bob, &BoardEvent::PenMotion { x: 1, y: 1 });
        store.apply_remote(&bob, &BoardEvent::PenUp);

        store.apply_remote(&bob, &BoardEvent::Close);

        // Stale but harmless: the departed peer's drawing stays visible.
        assert_eq!(store.peer_count(), 2);
        assert_eq!(store.replica(&bob).unwrap().strokes().len(), 1);
    }
}
