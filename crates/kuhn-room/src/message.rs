use crate::event::GameResult;
use kuhn_core::Chips;
use serde::Serialize;

/// Wire-format event sent from server to client over the `/play` WebSocket.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    UpdateCoordinatorId { coordinator_id: String },
    GameStart,
    CardDeal {
        turn_order: usize,
        card_rank: String,
        card_image: Vec<u8>,
        available_actions: Vec<String>,
    },
    NextAction {
        inf_set: String,
        available_actions: Vec<String>,
    },
    RoundResult {
        round_evaluation: Chips,
        inf_set: String,
    },
    GameResult {
        game_result: String,
    },
    InvalidAction {
        available_actions: Vec<String>,
    },
    OpponentInvalidAction {
        available_actions: Vec<String>,
    },
    OpponentDisconnected {
        available_actions: Vec<String>,
    },
    Error {
        error: String,
    },
    Close,
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

impl From<GameResult> for String {
    fn from(r: GameResult) -> Self {
        match r {
            GameResult::Win => "WIN".to_string(),
            GameResult::Defeat => "DEFEAT".to_string(),
            GameResult::Error => "ERROR".to_string(),
        }
    }
}
