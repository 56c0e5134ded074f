use crate::event::Event;
use crate::message::ServerMessage;
use kuhn_game::Action;

/// Client-originated message vocabulary (§4.4 intake).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intake {
    Connect,
    Round,
    AvailableActions,
    Wait,
    Move(Action),
}

/// Errors surfaced by the protocol layer.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    InvalidMessage(String),
    IllegalAction(Action),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMessage(s) => write!(f, "invalid message: {s}"),
            Self::IllegalAction(a) => write!(f, "illegal action: {a}"),
        }
    }
}
impl std::error::Error for ProtocolError {}

/// Translates between the internal [`Event`] representation and the wire
/// [`ServerMessage`]/client-text protocol. Centralizes the boundary between
/// the Match engine and the streaming RPC handler.
pub struct Protocol;

impl Protocol {
    /// Parse one inbound text frame into an [`Intake`] message.
    pub fn decode(s: &str) -> Result<Intake, ProtocolError> {
        match s.trim().to_uppercase().as_str() {
            "CONNECT" => Ok(Intake::Connect),
            "ROUND" => Ok(Intake::Round),
            "AVAILABLE_ACTIONS" => Ok(Intake::AvailableActions),
            "WAIT" => Ok(Intake::Wait),
            other => Action::try_from(other)
                .map(Intake::Move)
                .map_err(|_| ProtocolError::InvalidMessage(s.to_string())),
        }
    }

    /// Validate that `action` is a member of the legal set; used by the
    /// Match loop before advancing the tree.
    pub fn validate(action: Action, legal: &[Action]) -> Result<Action, ProtocolError> {
        legal
            .contains(&action)
            .then_some(action)
            .ok_or(ProtocolError::IllegalAction(action))
    }

    /// Convert an internal [`Event`] into the outbound wire frame.
    pub fn encode(event: &Event, reveal_cards: bool, card_image: impl Fn(Option<char>) -> Vec<u8>) -> ServerMessage {
        match event {
            Event::UpdateCoordinatorId(id) => ServerMessage::UpdateCoordinatorId {
                coordinator_id: id.clone(),
            },
            Event::GameStart => ServerMessage::GameStart,
            Event::CardDeal { card, turn_order } => {
                let rank_char = card.filter(|_| reveal_cards).map(|r| r.label());
                ServerMessage::CardDeal {
                    turn_order: *turn_order,
                    card_rank: rank_char.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
                    card_image: card_image(rank_char),
                    available_actions: vec!["AVAILABLE_ACTIONS".to_string()],
                }
            }
            Event::NextAction { public_inf_set, actions } => ServerMessage::NextAction {
                inf_set: public_inf_set.clone(),
                available_actions: actions.iter().map(|a| a.to_string()).collect(),
            },
            Event::RoundResult {
                evaluation,
                full_inf_set,
            } => ServerMessage::RoundResult {
                round_evaluation: *evaluation,
                inf_set: full_inf_set.clone(),
            },
            Event::GameResult(r) => ServerMessage::GameResult {
                game_result: (*r).into(),
            },
            Event::InvalidAction => ServerMessage::InvalidAction {
                available_actions: vec!["WAIT".to_string()],
            },
            Event::OpponentInvalidAction => ServerMessage::OpponentInvalidAction {
                available_actions: vec!["WAIT".to_string()],
            },
            Event::OpponentDisconnected => ServerMessage::OpponentDisconnected {
                available_actions: vec!["WAIT".to_string()],
            },
            Event::Error(e) => ServerMessage::Error { error: e.clone() },
            Event::Close => ServerMessage::Close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_action() {
        assert!(matches!(Protocol::decode("fold"), Ok(Intake::Move(Action::Fold))));
        assert!(matches!(Protocol::decode("ROUND"), Ok(Intake::Round)));
    }

    #[test]
    fn decode_invalid_message() {
        assert!(Protocol::decode("raise 10").is_err());
    }

    #[test]
    fn validate_illegal_action() {
        let legal = vec![Action::Check, Action::Bet];
        assert!(Protocol::validate(Action::Fold, &legal).is_err());
        assert!(Protocol::validate(Action::Bet, &legal).is_ok());
    }
}
