use std::sync::Arc;
use tracing::{debug, info};

use crate::session::{GameSession, Outcome};
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use score_types::{ClientMessage, GameAction, ServerMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    session: Arc<GameSession>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        session: Arc<GameSession>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            session,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        // Update connection activity
        self.connection_manager
            .update_activity(self.connection_id)
            .await;

        match message {
            ClientMessage::Action { action } => self.handle_action(action).await,
            ClientMessage::Undo => {
                let outcome = self.session.undo().await;
                self.resync_if_unchanged(outcome).await
            }
            ClientMessage::Redo => {
                let outcome = self.session.redo().await;
                self.resync_if_unchanged(outcome).await
            }
            ClientMessage::RequestState => self.send_state().await,
            ClientMessage::Heartbeat => self.send_message(ServerMessage::HeartbeatAck).await,
        }
    }

    async fn handle_action(&self, action: GameAction) -> Result<(), String> {
        debug!("Connection {} sent {:?}", self.connection_id, action);
        let outcome = self.session.apply(action).await;
        self.resync_if_unchanged(outcome).await
    }

    /// Effective changes reach this client through the broadcast. A no-op
    /// broadcasts nothing, so answer with the unchanged state directly.
    async fn resync_if_unchanged(&self, outcome: Outcome) -> Result<(), String> {
        if outcome.changed {
            return Ok(());
        }
        self.send_message(ServerMessage::StateUpdate { view: outcome.view })
            .await
    }

    pub async fn send_state(&self) -> Result<(), String> {
        let view = self.session.view().await;
        self.send_message(ServerMessage::StateUpdate { view }).await
    }

    pub async fn send_error(&self, message: String) -> Result<(), String> {
        self.send_message(ServerMessage::Error { message }).await
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);
        self.connection_manager
            .remove_connection(self.connection_id)
            .await;
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }
}
