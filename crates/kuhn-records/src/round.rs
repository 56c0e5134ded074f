use kuhn_core::{Chips, ID};
use kuhn_game::Action;

/// One played round within a match. Composite key: (match_id, seq).
#[derive(Debug, Clone)]
pub struct RoundRecord {
    match_id: ID<super::MatchRecord>,
    seq: u16,
    first_to_act: String,
    second_to_act: String,
    full_inf_set: String,
    evaluation: Chips,
}

impl RoundRecord {
    pub fn new(
        match_id: ID<super::MatchRecord>,
        seq: u16,
        first_to_act: String,
        second_to_act: String,
        full_inf_set: String,
        evaluation: Chips,
    ) -> Self {
        Self {
            match_id,
            seq,
            first_to_act,
            second_to_act,
            full_inf_set,
            evaluation,
        }
    }
    pub fn match_id(&self) -> ID<super::MatchRecord> {
        self.match_id
    }
    pub fn seq(&self) -> u16 {
        self.seq
    }
    pub fn first_to_act(&self) -> &str {
        &self.first_to_act
    }
    pub fn second_to_act(&self) -> &str {
        &self.second_to_act
    }
    pub fn full_inf_set(&self) -> &str {
        &self.full_inf_set
    }
    pub fn evaluation(&self) -> Chips {
        self.evaluation
    }
    pub fn actions(&self) -> Vec<Action> {
        self.full_inf_set
            .split('.')
            .skip(2)
            .filter_map(|tok| Action::try_from(tok).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuhn_core::ID;

    #[test]
    fn actions_reparses_the_inf_set_tail() {
        let record = RoundRecord::new(
            ID::default(),
            0,
            "alice".to_string(),
            "bob".to_string(),
            "three.JQ.BET.CALL".to_string(),
            2,
        );
        assert_eq!(record.actions(), vec![Action::Bet, Action::Call]);
    }

    #[test]
    fn actions_is_empty_before_any_decision() {
        let record = RoundRecord::new(ID::default(), 0, "alice".to_string(), "bob".to_string(), "three.??".to_string(), 0);
        assert!(record.actions().is_empty());
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::schema::{Schema, ROUNDS};

    impl Schema for RoundRecord {
        fn name() -> &'static str {
            ROUNDS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ROUNDS,
                " (
                    match_id        UUID NOT NULL REFERENCES ",
                crate::schema::MATCHES,
                "(id) ON DELETE CASCADE,
                    seq             SMALLINT NOT NULL,
                    first_to_act    TEXT NOT NULL,
                    second_to_act   TEXT NOT NULL,
                    full_inf_set    TEXT NOT NULL,
                    evaluation      INTEGER NOT NULL,
                    PRIMARY KEY (match_id, seq)
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}
