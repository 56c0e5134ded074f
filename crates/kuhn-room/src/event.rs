use kuhn_cards::Rank;
use kuhn_core::Chips;
use kuhn_game::Action;

/// Events broadcast by the Match engine to one player's channel.
#[derive(Clone, Debug)]
pub enum Event {
    /// New coordinator session assigned, in reply to a `random` resolution.
    UpdateCoordinatorId(String),
    GameStart,
    /// A new round's deal, from the recipient's own perspective. Carries
    /// no legal-action list — the client must send `AVAILABLE_ACTIONS`
    /// separately to learn it (§4.3/§4.4/§6).
    CardDeal { card: Option<Rank>, turn_order: usize },
    /// This player's (or their opponent's, with `actions: [WAIT]`) turn.
    NextAction {
        public_inf_set: String,
        actions: Vec<Action>,
    },
    RoundResult {
        evaluation: Chips,
        full_inf_set: String,
    },
    GameResult(GameResult),
    InvalidAction,
    OpponentInvalidAction,
    OpponentDisconnected,
    Error(String),
    Close,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameResult {
    Win,
    Defeat,
    Error,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::UpdateCoordinatorId(id) => write!(f, "coordinator id: {id}"),
            Event::GameStart => write!(f, "game start"),
            Event::CardDeal { turn_order, .. } => write!(f, "card deal, turn order {turn_order}"),
            Event::NextAction { actions, .. } => write!(
                f,
                "next action: {}",
                actions.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
            ),
            Event::RoundResult { evaluation, .. } => write!(f, "round result: {evaluation}"),
            Event::GameResult(r) => write!(f, "game result: {r:?}"),
            Event::InvalidAction => write!(f, "invalid action"),
            Event::OpponentInvalidAction => write!(f, "opponent invalid action"),
            Event::OpponentDisconnected => write!(f, "opponent disconnected"),
            Event::Error(e) => write!(f, "error: {e}"),
            Event::Close => write!(f, "close"),
        }
    }
}
