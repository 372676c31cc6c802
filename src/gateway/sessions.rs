use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;
use uuid::Uuid;

use super::events::ServerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub(crate) struct Session {
    /// `None` once the connection fell behind; the writer drains what is
    /// left and the connection closes.
    outbox: Option<mpsc::Sender<ServerEvent>>,
    pub(crate) username: Option<String>,
    channels: HashSet<String>,
}

/// Live connections and the channels each one has joined.
#[derive(Default)]
pub(crate) struct SessionTable {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionTable {
    pub(crate) fn insert(&mut self, id: ConnectionId, outbox: mpsc::Sender<ServerEvent>) {
        self.sessions.insert(
            id,
            Session {
                outbox: Some(outbox),
                username: None,
                channels: HashSet::new(),
            },
        );
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Ties a connection to a username and joins that username's channel.
    ///
    /// A connection carries one username at a time: switching names leaves
    /// the previous name's channel, and the previous name is returned.
    pub(crate) fn associate(&mut self, id: ConnectionId, username: &str) -> Option<String> {
        let session = self.sessions.get_mut(&id)?;
        let previous = session.username.replace(username.to_owned());
        session.channels.insert(username.to_owned());
        match previous {
            Some(previous) if previous != username => {
                session.channels.remove(&previous);
                Some(previous)
            }
            _ => None,
        }
    }

    pub(crate) fn is_associated(&self, username: &str) -> bool {
        self.sessions
            .values()
            .any(|session| session.username.as_deref() == Some(username))
    }

    pub(crate) fn join(&mut self, id: ConnectionId, channel: &str) -> bool {
        self.sessions
            .get_mut(&id)
            .is_some_and(|session| session.channels.insert(channel.to_owned()))
    }

    pub(crate) fn leave(&mut self, id: ConnectionId, channel: &str) -> bool {
        self.sessions
            .get_mut(&id)
            .is_some_and(|session| session.channels.remove(channel))
    }

    /// Sends to every live connection. Returns how many outboxes accepted it.
    pub(crate) fn emit_all(&mut self, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for (id, session) in &mut self.sessions {
            if session.deliver(*id, event) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Sends only to connections that joined `channel`.
    pub(crate) fn emit_to(&mut self, channel: &str, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for (id, session) in &mut self.sessions {
            if session.channels.contains(channel) && session.deliver(*id, event) {
                delivered += 1;
            }
        }
        delivered
    }
}

impl Session {
    /// Queues without waiting. A full outbox means the client stopped
    /// reading, so the outbox is dropped and no further events are queued.
    fn deliver(&mut self, id: ConnectionId, event: &ServerEvent) -> bool {
        let Some(outbox) = &self.outbox else {
            return false;
        };
        match outbox.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(connection = %id, "outbox full, cutting off slow connection");
                self.outbox = None;
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.outbox = None;
                false
            }
        }
    }
}
