use kuhn_core::ID;

/// A single bracket item: two participants and the match that decided them.
#[derive(Debug, Clone)]
pub struct BracketItem {
    pub participants: (String, String),
    pub match_id: Option<ID<super::MatchRecord>>,
}

/// One round of a single-elimination bracket.
#[derive(Debug, Clone, Default)]
pub struct BracketRound {
    pub items: Vec<BracketItem>,
}

/// A single-elimination tournament over a power-of-two field.
#[derive(Debug, Clone)]
pub struct TournamentRecord {
    id: ID<Self>,
    session_id: ID<super::SessionRecord>,
    capacity: usize,
    allow_bots: bool,
    started: bool,
    rounds: Vec<BracketRound>,
    place1: Option<String>,
}

impl TournamentRecord {
    pub fn new(session_id: ID<super::SessionRecord>, capacity: usize, allow_bots: bool) -> Self {
        Self {
            id: ID::default(),
            session_id,
            capacity,
            allow_bots,
            started: false,
            rounds: Vec::new(),
            place1: None,
        }
    }
    pub fn id(&self) -> ID<Self> {
        self.id
    }
    pub fn session_id(&self) -> ID<super::SessionRecord> {
        self.session_id
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn allow_bots(&self) -> bool {
        self.allow_bots
    }
    pub fn started(&self) -> bool {
        self.started
    }
    pub fn start(&mut self) {
        self.started = true;
    }
    pub fn push_round(&mut self, round: BracketRound) {
        self.rounds.push(round);
    }
    pub fn rounds(&self) -> &[BracketRound] {
        &self.rounds
    }
    pub fn place1(&self) -> Option<&str> {
        self.place1.as_deref()
    }
    pub fn set_place1(&mut self, winner: String) {
        self.place1 = Some(winner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_accumulate_until_a_winner_is_set() {
        let mut tournament = TournamentRecord::new(ID::default(), 4, false);
        assert!(!tournament.started());
        tournament.start();
        tournament.push_round(BracketRound {
            items: vec![
                BracketItem { participants: ("alice".to_string(), "bob".to_string()), match_id: Some(ID::default()) },
                BracketItem { participants: ("carol".to_string(), "dave".to_string()), match_id: Some(ID::default()) },
            ],
        });
        assert_eq!(tournament.rounds().len(), 1);
        tournament.set_place1("alice".to_string());
        assert_eq!(tournament.place1(), Some("alice"));
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::schema::{Schema, TOURNAMENTS};

    impl Schema for TournamentRecord {
        fn name() -> &'static str {
            TOURNAMENTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                TOURNAMENTS,
                " (
                    id          UUID PRIMARY KEY,
                    session_id  UUID NOT NULL REFERENCES ",
                crate::schema::SESSIONS,
                "(id) ON DELETE CASCADE,
                    capacity    SMALLINT NOT NULL,
                    allow_bots  BOOLEAN NOT NULL,
                    started     BOOLEAN NOT NULL DEFAULT FALSE,
                    place1      TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}
