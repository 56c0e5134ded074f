use kuhn_core::ID;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MatchStatus {
    Playing,
    Finished,
    Failed,
}

/// A completed (or in-progress) duel between two players.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    id: ID<Self>,
    session_id: ID<super::SessionRecord>,
    participants: (String, String),
    winner: Option<String>,
    status: MatchStatus,
    error: Option<String>,
}

impl MatchRecord {
    pub fn new(session_id: ID<super::SessionRecord>, participants: (String, String)) -> Self {
        Self {
            id: ID::default(),
            session_id,
            participants,
            winner: None,
            status: MatchStatus::Playing,
            error: None,
        }
    }
    pub fn id(&self) -> ID<Self> {
        self.id
    }
    pub fn session_id(&self) -> ID<super::SessionRecord> {
        self.session_id
    }
    pub fn participants(&self) -> &(String, String) {
        &self.participants
    }
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }
    pub fn status(&self) -> MatchStatus {
        self.status
    }
    /// Joins each round's `<full_inf_set>:<evaluation>` with `|`, matching
    /// the persisted outcome-tape format. Excludes the trailing (unplayed)
    /// round — callers pass only the rounds actually contested.
    pub fn finish(&mut self, winner: Option<String>, rounds: &[super::RoundRecord]) -> String {
        self.winner = winner;
        self.status = MatchStatus::Finished;
        rounds
            .iter()
            .map(|r| format!("{}:{}", r.full_inf_set(), r.evaluation()))
            .collect::<Vec<_>>()
            .join("|")
    }
    pub fn fail(&mut self, error: String) {
        self.status = MatchStatus::Failed;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundRecord;
    use kuhn_core::ID;

    #[test]
    fn finish_joins_only_the_contested_rounds() {
        let mut record = MatchRecord::new(ID::default(), ("alice".to_string(), "bob".to_string()));
        let rounds = vec![
            RoundRecord::new(record.id(), 0, "alice".to_string(), "bob".to_string(), "three.JQ.BET.CALL".to_string(), 2),
            RoundRecord::new(record.id(), 1, "bob".to_string(), "alice".to_string(), "three.??.CHECK.CHECK".to_string(), -1),
        ];
        let tape = record.finish(Some("alice".to_string()), &rounds);
        assert_eq!(tape, "three.JQ.BET.CALL:2|three.??.CHECK.CHECK:-1");
        assert_eq!(record.status(), MatchStatus::Finished);
        assert_eq!(record.winner(), Some("alice"));
    }

    #[test]
    fn fail_records_the_error_and_status() {
        let mut record = MatchRecord::new(ID::default(), ("alice".to_string(), "bob".to_string()));
        record.fail("opponent disconnected".to_string());
        assert_eq!(record.status(), MatchStatus::Failed);
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::schema::{Schema, MATCHES};

    impl Schema for MatchRecord {
        fn name() -> &'static str {
            MATCHES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                MATCHES,
                " (
                    id              UUID PRIMARY KEY,
                    session_id      UUID NOT NULL REFERENCES ",
                crate::schema::SESSIONS,
                "(id) ON DELETE CASCADE,
                    player_one      TEXT NOT NULL,
                    player_two      TEXT NOT NULL,
                    winner          TEXT,
                    status          TEXT NOT NULL,
                    outcome_tape    TEXT,
                    error           TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_matches_session ON ",
                MATCHES,
                " (session_id);"
            )
        }
    }
}
