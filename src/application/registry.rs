//! Owned registry of live per-squad subscriber connections.
//!
//! Display surfaces that want push updates for a squad register a connection
//! and receive committed events on a bounded channel. The registry is an
//! explicit value passed to whoever needs it; nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::SquadId;
use crate::port::outbound::notifier::Event;

/// Handle for one registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<Event>,
}

/// Result of pushing one event to a squad's connections.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted the event.
    pub delivered: usize,
    /// Connections whose buffer was full; the event was skipped for them.
    pub lagging: usize,
    /// Connections found closed and removed.
    pub pruned: usize,
}

/// Registry of subscriber connections keyed by squad.
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    buffer: usize,
    connections: RwLock<HashMap<SquadId, Vec<Connection>>>,
}

impl ConnectionRegistry {
    /// Create a registry whose connections buffer `buffer` events each.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection for `squad_id`.
    pub fn add(&self, squad_id: &SquadId) -> (ConnectionId, mpsc::Receiver<Event>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer);
        self.connections
            .write()
            .entry(squad_id.clone())
            .or_default()
            .push(Connection { id, sender });
        debug!(squad_id = %squad_id, connection = %id, "Subscriber connected");
        (id, receiver)
    }

    /// Remove a connection. Returns `false` if it was not registered.
    pub fn remove(&self, squad_id: &SquadId, id: ConnectionId) -> bool {
        let mut connections = self.connections.write();
        let Some(list) = connections.get_mut(squad_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|c| c.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            connections.remove(squad_id);
        }
        removed
    }

    /// Connections currently registered for `squad_id`.
    #[must_use]
    pub fn lookup(&self, squad_id: &SquadId) -> Vec<ConnectionId> {
        self.connections
            .read()
            .get(squad_id)
            .map(|list| list.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    /// Total registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.read().values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push `event` to every connection of its squad without waiting.
    pub fn broadcast(&self, event: &Event) -> BroadcastReport {
        let squad_id = event.squad_id();
        let mut report = BroadcastReport::default();
        let mut closed = Vec::new();

        {
            let connections = self.connections.read();
            let Some(list) = connections.get(squad_id) else {
                return report;
            };
            for connection in list {
                match connection.sender.try_send(event.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(squad_id = %squad_id, connection = %connection.id, "Subscriber lagging, event skipped");
                        report.lagging += 1;
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(connection.id),
                }
            }
        }

        for id in closed {
            if self.remove(squad_id, id) {
                report.pruned += 1;
            }
        }
        report
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(64)
    }
}
