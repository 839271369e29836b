use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameView, PlayerId, RoundId};

/// A user intent that changes the scoreboard. Undo/redo are not actions:
/// they navigate history instead of producing a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameAction {
    AddPlayer,
    RemovePlayer { player_id: PlayerId },
    RemoveLastPlayer,
    AddRound,
    RemoveRound,
    SetScore {
        player_id: PlayerId,
        round_id: RoundId,
        value: String,
    },
    RenamePlayer { player_id: PlayerId, name: String },
    ResetGame,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    Action { action: GameAction },
    Undo,
    Redo,
    RequestState,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    StateUpdate { view: GameView },
    HeartbeatAck,
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"Action":{"action":{"SetScore":{"player_id":"1","round_id":"2","value":"7"}}}}"#,
        )
        .unwrap();

        match msg {
            ClientMessage::Action { action } => assert_eq!(
                action,
                GameAction::SetScore {
                    player_id: "1".to_string(),
                    round_id: "2".to_string(),
                    value: "7".to_string(),
                }
            ),
            other => panic!("unexpected message: {:?}", other),
        }

        let undo: ClientMessage = serde_json::from_str(r#""Undo""#).unwrap();
        assert!(matches!(undo, ClientMessage::Undo));
    }
}
