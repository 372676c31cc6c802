use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::debug;

use crate::{db::StoreResult, messages::MessageRepository, presence::PresenceRegistry};

use super::{
    events::{ClientEvent, PresenceUpdate, SendMessage, ServerEvent},
    sessions::{ConnectionId, SessionTable},
};

/// Events a connection may have queued before it counts as too slow.
pub(crate) const OUTBOX_CAPACITY: usize = 256;

/// The realtime core: owns the session table and turns client events into
/// one store write plus one fan-out each.
///
/// Store errors are handed back to the caller untouched; nothing is
/// retried and the other party never hears about a failure.
#[derive(Clone)]
pub struct Gateway {
    sessions: Arc<RwLock<SessionTable>>,
    /// Held from the presence write through the session update, so a user
    /// coming online and its last connection leaving cannot interleave.
    presence_gate: Arc<Mutex<()>>,
    messages: MessageRepository,
    presence: PresenceRegistry,
    offline_on_disconnect: bool,
}

impl Gateway {
    pub fn new(messages: MessageRepository, presence: PresenceRegistry) -> Self {
        Self {
            sessions: Arc::default(),
            presence_gate: Arc::default(),
            messages,
            presence,
            offline_on_disconnect: false,
        }
    }

    /// When set, losing the last connection for a username marks it offline.
    pub fn offline_on_disconnect(mut self, enabled: bool) -> Self {
        self.offline_on_disconnect = enabled;
        self
    }

    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (outbox, inbox) = mpsc::channel(OUTBOX_CAPACITY);
        self.sessions.write().await.insert(id, outbox);
        (id, inbox)
    }

    pub async fn disconnect(&self, id: ConnectionId) -> StoreResult<()> {
        let Some(session) = self.sessions.write().await.remove(id) else {
            return Ok(());
        };

        if !self.offline_on_disconnect {
            return Ok(());
        }
        let Some(username) = session.username else {
            return Ok(());
        };

        let _gate = self.presence_gate.lock().await;
        self.release(username).await
    }

    /// Marks `username` offline unless some connection still carries it.
    /// Callers hold the presence gate.
    async fn release(&self, username: String) -> StoreResult<()> {
        if self.sessions.read().await.is_associated(&username) {
            return Ok(());
        }

        debug!(username = %username, "last connection gone, marking offline");
        self.user_offline(username).await
    }

    pub async fn connection_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn dispatch(&self, id: ConnectionId, event: ClientEvent) -> StoreResult<()> {
        debug!(connection = %id, event = event.name(), "dispatching");

        match event {
            ClientEvent::UserOnline(username) => self.user_online(id, &username).await,
            ClientEvent::UserOffline(username) => self.user_offline(username).await,
            ClientEvent::SendMessage(message) => self.send_message(message).await,
            ClientEvent::ReadMessage(message_id) => self.read_message(&message_id).await,
            ClientEvent::Join(channel) => {
                self.sessions.write().await.join(id, &channel);
                Ok(())
            }
            ClientEvent::Leave(channel) => {
                self.sessions.write().await.leave(id, &channel);
                Ok(())
            }
        }
    }

    async fn user_online(&self, id: ConnectionId, username: &str) -> StoreResult<()> {
        let _gate = self.presence_gate.lock().await;
        let user = self.presence.set_online(username).await?;

        let replaced = {
            let mut sessions = self.sessions.write().await;
            let replaced = sessions.associate(id, &user.username);
            sessions.emit_all(&ServerEvent::UserPresence(PresenceUpdate {
                username: user.username,
                online: user.online,
            }));
            replaced
        };

        match replaced {
            Some(previous) if self.offline_on_disconnect => self.release(previous).await,
            _ => Ok(()),
        }
    }

    async fn user_offline(&self, username: String) -> StoreResult<()> {
        if !self.presence.set_offline(&username).await? {
            debug!(username = %username, "offline update matched no user");
        }

        self.sessions
            .write()
            .await
            .emit_all(&ServerEvent::UserPresence(PresenceUpdate {
                username,
                online: false,
            }));
        Ok(())
    }

    async fn send_message(&self, SendMessage { sender, recipient, content }: SendMessage) -> StoreResult<()> {
        let record = self.messages.create(&sender, &recipient, &content).await?;

        let delivered = self
            .sessions
            .write()
            .await
            .emit_to(&recipient, &ServerEvent::ReceiveMessage(record));
        debug!(%sender, %recipient, delivered, "message stored");
        Ok(())
    }

    async fn read_message(&self, message_id: &str) -> StoreResult<()> {
        let Some(record) = self.messages.mark_read(message_id).await? else {
            debug!(message_id, "read receipt for unknown message");
            return Ok(());
        };

        let sender = record.sender.clone();
        self.sessions
            .write()
            .await
            .emit_to(&sender, &ServerEvent::MessageRead(record));
        Ok(())
    }
}
