use score_core::{ScoreEvent, ScoreEventHandler};
use score_types::ServerMessage;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub last_activity: Instant,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id,
            last_activity: Instant::now(),
            sender,
        };

        (connection, receiver)
    }

    pub fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }

    pub fn is_inactive(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Tracks open sockets. Replies go to a single connection through its own
/// channel; state updates fan out to every connection through a broadcast
/// channel fed by [`StateBroadcaster`].
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
    updates: broadcast::Sender<ServerMessage>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            connections: RwLock::new(HashMap::new()),
            updates,
        }
    }

    pub async fn create_connection(
        &self,
        id: ConnectionId,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (conn, receiver) = Connection::new(id);

        {
            let mut connections = self.connections.write().await;
            connections.insert(id, conn);
        }

        receiver
    }

    pub fn subscribe_updates(&self) -> broadcast::Receiver<ServerMessage> {
        self.updates.subscribe()
    }

    /// Scoreboard handler publishing every change to all subscribers
    pub fn broadcaster(&self) -> StateBroadcaster {
        StateBroadcaster {
            updates: self.updates.clone(),
        }
    }

    pub async fn remove_connection(&self, id: ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(&id);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn update_activity(&self, id: ConnectionId) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&id) {
            connection.update_activity();
        }
    }

    pub async fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(&id) {
            connection.send_message(message)
        } else {
            Err("Connection not found".to_string())
        }
    }

    /// Drops connections that have been silent longer than `timeout`.
    /// Dropping a connection closes its reply channel, which ends its socket.
    pub async fn cleanup_inactive_connections(&self, timeout: Duration) {
        let mut connections = self.connections.write().await;
        let before = connections.len();
        connections.retain(|_, connection| {
            let inactive = connection.is_inactive(timeout);
            if inactive {
                debug!("Dropping inactive connection {}", connection.id);
            }
            !inactive
        });

        let removed = before - connections.len();
        if removed > 0 {
            info!("Removed {} inactive connections", removed);
        }
    }

    /// Drops every connection so their sockets wind down. Called on shutdown
    /// before the final save, so no socket can apply an action after it.
    pub async fn close_all(&self) {
        let mut connections = self.connections.write().await;
        if !connections.is_empty() {
            info!("Closing {} open connections", connections.len());
        }
        connections.clear();
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StateBroadcaster {
    updates: broadcast::Sender<ServerMessage>,
}

impl ScoreEventHandler for StateBroadcaster {
    fn handle_event(&mut self, event: &ScoreEvent) {
        let message = ServerMessage::StateUpdate {
            view: event.view().clone(),
        };
        // No subscribers just means no sockets are open
        if let Ok(receivers) = self.updates.send(message) {
            debug!("Broadcast state update to {} receivers", receivers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_types::{GameAction, GameState, GameView};

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let manager = ConnectionManager::new();
        let id = ConnectionId::new();

        let mut receiver = manager.create_connection(id).await;
        assert_eq!(manager.connection_count().await, 1);

        manager
            .send_to_connection(id, ServerMessage::HeartbeatAck)
            .await
            .unwrap();
        assert!(matches!(
            receiver.recv().await,
            Some(ServerMessage::HeartbeatAck)
        ));

        manager.remove_connection(id).await;
        assert_eq!(manager.connection_count().await, 0);
        assert!(
            manager
                .send_to_connection(id, ServerMessage::HeartbeatAck)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_broadcaster_reaches_subscribers() {
        let manager = ConnectionManager::new();
        let mut first = manager.subscribe_updates();
        let mut second = manager.subscribe_updates();
        let mut broadcaster = manager.broadcaster();

        let view = GameView::new(GameState::reset(), true, false);
        broadcaster.handle_event(&ScoreEvent::ActionApplied {
            action: GameAction::ResetGame,
            view: view.clone(),
        });

        for receiver in [&mut first, &mut second] {
            match receiver.recv().await.unwrap() {
                ServerMessage::StateUpdate { view: received } => assert_eq!(received, view),
                other => panic!("unexpected message: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let manager = ConnectionManager::new();
        let mut broadcaster = manager.broadcaster();
        broadcaster.handle_event(&ScoreEvent::Undone {
            view: GameView::new(GameState::default(), false, true),
        });
    }

    #[tokio::test]
    async fn test_cleanup_inactive_connections() {
        let manager = ConnectionManager::new();
        let mut receiver = manager.create_connection(ConnectionId::new()).await;

        manager
            .cleanup_inactive_connections(Duration::from_secs(60))
            .await;
        assert_eq!(manager.connection_count().await, 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        manager
            .cleanup_inactive_connections(Duration::from_millis(1))
            .await;
        assert_eq!(manager.connection_count().await, 0);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_close_all_ends_reply_channels() {
        let manager = ConnectionManager::new();
        let mut first = manager.create_connection(ConnectionId::new()).await;
        let mut second = manager.create_connection(ConnectionId::new()).await;

        manager.close_all().await;

        assert_eq!(manager.connection_count().await, 0);
        assert!(first.recv().await.is_none());
        assert!(second.recv().await.is_none());
    }
}
