use kuhn_cards::Variant;
use kuhn_core::{Chips, ID};
use kuhn_game::Tree;
use kuhn_records::{MatchRecord, RoundRecord};
use kuhn_room::{Event, GameResult, Intake, Protocol, WaitingRoom};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of a finished match, ready for persistence (§6 outcome tape).
pub struct MatchOutcome {
    pub winner: Option<String>,
    pub rounds: Vec<RoundRecord>,
    pub error: Option<String>,
}

/// Drives a single duel between two registered players. Owns per-round
/// Game Tree state, bank accounting, and the intake-message loop described
/// in the match algorithm.
pub struct MatchEngine {
    variant: Variant,
    message_timeout: Duration,
    tokens: (String, String),
    banks: HashMap<String, Chips>,
    room: Arc<WaitingRoom>,
    intake: mpsc::UnboundedReceiver<(String, Intake)>,
    match_id: ID<MatchRecord>,
}

impl MatchEngine {
    pub fn new(
        match_id: ID<MatchRecord>,
        variant: Variant,
        initial_bank: Chips,
        message_timeout: Duration,
        tokens: (String, String),
        room: Arc<WaitingRoom>,
        intake: mpsc::UnboundedReceiver<(String, Intake)>,
    ) -> Self {
        let mut banks = HashMap::new();
        banks.insert(tokens.0.clone(), initial_bank);
        banks.insert(tokens.1.clone(), initial_bank);
        Self {
            variant,
            message_timeout,
            tokens,
            banks,
            room,
            intake,
            match_id,
        }
    }

    fn other(&self, token: &str) -> &str {
        if token == self.tokens.0 {
            &self.tokens.1
        } else {
            &self.tokens.0
        }
    }

    async fn forfeit(&mut self, loser: &str, rounds: &mut Vec<RoundRecord>, loss_event: Event, win_event: Event) -> MatchOutcome {
        let winner = self.other(loser).to_string();
        self.banks.insert(winner.clone(), 2 * self.initial_bank());
        self.banks.insert(loser.to_string(), 0);
        self.room.notify_one(loser, loss_event).await;
        self.room.notify_one(&winner, win_event).await;
        self.room.notify_one(loser, Event::GameResult(GameResult::Defeat)).await;
        self.room.notify_one(&winner, Event::GameResult(GameResult::Win)).await;
        self.room.notify_all(Event::Close).await;
        MatchOutcome {
            winner: Some(winner),
            rounds: std::mem::take(rounds),
            error: None,
        }
    }

    fn initial_bank(&self) -> Chips {
        *self.banks.get(&self.tokens.0).unwrap_or(&0) + *self.banks.get(&self.tokens.1).unwrap_or(&0)
    }

    /// Runs the match to completion, implementing the algorithm in §4.4.
    pub async fn run(mut self) -> MatchOutcome {
        self.room.notify_all(Event::GameStart).await;

        let mut rounds: Vec<RoundRecord> = Vec::new();
        let mut seq: u16 = 0;
        let mut first = if rand::random() { self.tokens.0.clone() } else { self.tokens.1.clone() };
        let mut tree = Tree::deal(self.variant);
        // Acks for the round currently awaiting its deal. Scoped to that
        // round's lifetime: cleared only when a new round is opened, never
        // right after firing the deal, so a stray extra `ROUND` from both
        // sides mid-round can't re-trigger `deal_round` and reshuffle it.
        let mut started: HashMap<String, bool> = HashMap::new();
        let mut dealt = false;

        loop {
            if self.room.is_disconnected(&self.tokens.0).await {
                return self
                    .forfeit(
                        &self.tokens.0.clone(),
                        &mut rounds,
                        Event::OpponentDisconnected,
                        Event::OpponentDisconnected,
                    )
                    .await;
            }
            if self.room.is_disconnected(&self.tokens.1).await {
                return self
                    .forfeit(
                        &self.tokens.1.clone(),
                        &mut rounds,
                        Event::OpponentDisconnected,
                        Event::OpponentDisconnected,
                    )
                    .await;
            }

            let next = tokio::time::timeout(self.message_timeout, self.intake.recv()).await;
            let Ok(Some((sender, message))) = next else {
                self.room
                    .notify_all(Event::Error("no message within message timeout".to_string()))
                    .await;
                self.room.notify_all(Event::Close).await;
                return MatchOutcome {
                    winner: None,
                    rounds,
                    error: Some("intake timeout".to_string()),
                };
            };

            match message {
                Intake::Connect | Intake::Wait => continue,
                Intake::Round => {
                    if *self.banks.get(&self.tokens.0).unwrap_or(&0) <= 0 || *self.banks.get(&self.tokens.1).unwrap_or(&0) <= 0 {
                        let winner = if *self.banks.get(&self.tokens.0).unwrap_or(&0) > 0 {
                            self.tokens.0.clone()
                        } else {
                            self.tokens.1.clone()
                        };
                        let loser = self.other(&winner).to_string();
                        self.room.notify_one(&winner, Event::GameResult(GameResult::Win)).await;
                        self.room.notify_one(&loser, Event::GameResult(GameResult::Defeat)).await;
                        self.room.notify_all(Event::Close).await;
                        return MatchOutcome {
                            winner: Some(winner),
                            rounds,
                            error: None,
                        };
                    }
                    started.insert(sender.clone(), true);
                    if !dealt && *started.get(&self.tokens.0).unwrap_or(&false) && *started.get(&self.tokens.1).unwrap_or(&false) {
                        self.deal_round(&mut tree, &first).await;
                        dealt = true;
                    }
                }
                Intake::AvailableActions => {
                    self.send_available_actions(&tree, &sender).await;
                }
                Intake::Move(action) => {
                    if tree.turn().is_terminal() || tree.turn().position() != self.seat(&sender) {
                        log::debug!("ignoring out-of-turn or post-terminal action from {sender}");
                        continue;
                    }
                    let legal = tree.actions();
                    if Protocol::validate(action, &legal).is_err() {
                        return self
                            .forfeit(&sender, &mut rounds, Event::InvalidAction, Event::OpponentInvalidAction)
                            .await;
                    }
                    tree = tree.play(action);
                    if tree.is_terminal() {
                        self.settle_round(&tree, &first, &mut rounds, &mut seq).await;
                        first = self.other(&first).to_string();
                        tree = Tree::deal(self.variant);
                        started.clear();
                        dealt = false;
                    } else {
                        self.send_next_action(&tree, &first).await;
                    }
                }
            }
        }
    }

    fn seat(&self, token: &str) -> usize {
        usize::from(token != self.tokens.0)
    }

    async fn deal_round(&self, tree: &mut Tree, first: &str) {
        *tree = Tree::deal(self.variant);
        let second = self.other(first).to_string();
        self.room
            .notify_one(
                first,
                Event::CardDeal {
                    card: Some(tree.card(kuhn_game::Turn::Choice(0))),
                    turn_order: 1,
                },
            )
            .await;
        self.room
            .notify_one(
                &second,
                Event::CardDeal {
                    card: Some(tree.card(kuhn_game::Turn::Choice(1))),
                    turn_order: 2,
                },
            )
            .await;
    }

    async fn send_next_action(&self, tree: &Tree, first: &str) {
        let acting_seat = tree.turn().position();
        let acting = if acting_seat == 0 { first.to_string() } else { self.other(first).to_string() };
        let waiting = self.other(&acting).to_string();
        self.room
            .notify_one(
                &acting,
                Event::NextAction {
                    public_inf_set: tree.public_inf_set(),
                    actions: tree.actions(),
                },
            )
            .await;
        self.room
            .notify_one(
                &waiting,
                Event::NextAction {
                    public_inf_set: tree.public_inf_set(),
                    actions: vec![],
                },
            )
            .await;
    }

    async fn send_available_actions(&self, tree: &Tree, to: &str) {
        let actions = if tree.is_terminal() {
            vec![]
        } else if self.seat(to) == tree.turn().position() {
            tree.actions()
        } else {
            vec![]
        };
        self.room
            .notify_one(
                to,
                Event::NextAction {
                    public_inf_set: tree.public_inf_set(),
                    actions,
                },
            )
            .await;
    }

    async fn settle_round(&mut self, tree: &Tree, first: &str, rounds: &mut Vec<RoundRecord>, seq: &mut u16) {
        let evaluation = tree.evaluation();
        let second = self.other(first).to_string();
        *self.banks.get_mut(first).unwrap() += evaluation;
        *self.banks.get_mut(&second).unwrap() -= evaluation;

        self.room
            .notify_one(
                first,
                Event::RoundResult {
                    evaluation,
                    full_inf_set: tree.full_inf_set(),
                },
            )
            .await;
        self.room
            .notify_one(
                &second,
                Event::RoundResult {
                    evaluation: -evaluation,
                    full_inf_set: tree.full_inf_set(),
                },
            )
            .await;

        rounds.push(RoundRecord::new(
            self.match_id,
            *seq,
            first.to_string(),
            second,
            tree.full_inf_set(),
            evaluation,
        ));
        *seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuhn_room::WaitingRoom;

    /// a forfeit sets the survivor's bank to 2x and the offender's to 0
    #[tokio::test]
    async fn forfeit_zeroes_the_offender() {
        let room = Arc::new(WaitingRoom::new(2));
        room.register("a").await.unwrap();
        room.register("b").await.unwrap();
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut engine = MatchEngine::new(
            ID::default(),
            Variant::Three,
            5,
            Duration::from_secs(1),
            ("a".to_string(), "b".to_string()),
            room,
            rx,
        );
        let mut rounds = Vec::new();
        let outcome = engine
            .forfeit("a", &mut rounds, Event::InvalidAction, Event::OpponentInvalidAction)
            .await;
        assert_eq!(outcome.winner.as_deref(), Some("b"));
    }
}
