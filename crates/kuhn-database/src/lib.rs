//! PostgreSQL persistence for the match-coordination subsystem.
//!
//! Unlike a training pipeline's bulk binary-COPY loads, session/match/round
//! volumes here are small, so this crate sticks to plain parameterised
//! `INSERT`/`UPDATE` statements behind a thin [`Db`] wrapper.
use kuhn_records::Schema;
use std::sync::Arc;
use tokio_postgres::Client;

pub type PgErr = tokio_postgres::Error;

/// Connects to PostgreSQL at `db_url` and creates every table this crate
/// owns if it doesn't already exist.
///
/// # Panics
///
/// Panics if the connection fails.
pub async fn connect(db_url: &str) -> Arc<Db> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(db_url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    let db = Db::new(Arc::new(client));
    db.migrate().await.expect("run migrations");
    Arc::new(db)
}

/// Thin wrapper around a shared Postgres client exposing one
/// create/update method per record-writing operation in the coordination
/// subsystem.
#[derive(Clone)]
pub struct Db {
    client: Arc<Client>,
}

impl Db {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Create every table this crate owns, idempotently.
    pub async fn migrate(&self) -> Result<(), PgErr> {
        use kuhn_records::{MatchRecord, PlayerRecord, RoundRecord, SessionRecord, TournamentRecord};
        for (creates, indices) in [
            (PlayerRecord::creates(), PlayerRecord::indices()),
            (SessionRecord::creates(), SessionRecord::indices()),
            (MatchRecord::creates(), MatchRecord::indices()),
            (RoundRecord::creates(), RoundRecord::indices()),
            (TournamentRecord::creates(), TournamentRecord::indices()),
        ] {
            self.client.batch_execute(creates).await?;
            if !indices.is_empty() {
                self.client.batch_execute(indices).await?;
            }
        }
        Ok(())
    }

    pub async fn create_player(&self, player: &kuhn_records::PlayerRecord) -> Result<(), PgErr> {
        let flags = player.flags();
        self.client
            .execute(
                "INSERT INTO players (id, private_token, public_token, display_name, disabled, is_test, is_bot)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &player.id().inner(),
                    &player.private_token(),
                    &player.public_token(),
                    &player.display_name(),
                    &flags.disabled,
                    &flags.test,
                    &flags.bot,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn create_session(&self, session: &kuhn_records::SessionRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "INSERT INTO sessions (id, kind, variant, is_public, status, error)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &session.id().inner(),
                    &format!("{:?}", session.kind()),
                    &session.variant().to_string(),
                    &session.is_public(),
                    &format!("{:?}", session.status()),
                    &session.error(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn update_session_status(&self, session: &kuhn_records::SessionRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "UPDATE sessions SET status = $2, error = $3 WHERE id = $1",
                &[&session.id().inner(), &format!("{:?}", session.status()), &session.error()],
            )
            .await?;
        Ok(())
    }

    pub async fn create_match(&self, m: &kuhn_records::MatchRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "INSERT INTO matches (id, session_id, player_one, player_two, winner, status)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &m.id().inner(),
                    &m.session_id().inner(),
                    &m.participants().0,
                    &m.participants().1,
                    &m.winner(),
                    &format!("{:?}", m.status()),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn finish_match(&self, m: &kuhn_records::MatchRecord, outcome_tape: &str) -> Result<(), PgErr> {
        self.client
            .execute(
                "UPDATE matches SET winner = $2, status = $3, outcome_tape = $4 WHERE id = $1",
                &[&m.id().inner(), &m.winner(), &format!("{:?}", m.status()), &outcome_tape],
            )
            .await?;
        Ok(())
    }

    pub async fn create_round(&self, r: &kuhn_records::RoundRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "INSERT INTO rounds (match_id, seq, first_to_act, second_to_act, full_inf_set, evaluation)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &r.match_id().inner(),
                    &(r.seq() as i16),
                    &r.first_to_act(),
                    &r.second_to_act(),
                    &r.full_inf_set(),
                    &r.evaluation(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn create_tournament(&self, t: &kuhn_records::TournamentRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "INSERT INTO tournaments (id, session_id, capacity, allow_bots, started)
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &t.id().inner(),
                    &t.session_id().inner(),
                    &(t.capacity() as i16),
                    &t.allow_bots(),
                    &t.started(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn finish_tournament(&self, t: &kuhn_records::TournamentRecord) -> Result<(), PgErr> {
        self.client
            .execute(
                "UPDATE tournaments SET place1 = $2 WHERE id = $1",
                &[&t.id().inner(), &t.place1()],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuhn_cards::Variant;
    use kuhn_core::ID;
    use kuhn_records::{MatchRecord, PlayerFlags, PlayerRecord, RoundRecord, SessionKind, SessionRecord, TournamentRecord};

    /// Every `INSERT`'s `$n` placeholders must match its column list 1:1 —
    /// this crate has no query builder to catch a drift at compile time.
    fn assert_placeholders_match_columns(sql: &str) {
        let columns = sql
            .split('(')
            .nth(1)
            .unwrap()
            .split(')')
            .next()
            .unwrap()
            .split(',')
            .count();
        let placeholders = sql.matches('$').count();
        assert_eq!(columns, placeholders, "column/placeholder mismatch in: {sql}");
    }

    #[test]
    fn create_round_binds_every_not_null_column() {
        let round = RoundRecord::new(ID::default(), 0, "alice".to_string(), "bob".to_string(), "three.JQ.BET.CALL".to_string(), 2);
        let sql = "INSERT INTO rounds (match_id, seq, first_to_act, second_to_act, full_inf_set, evaluation)
                 VALUES ($1, $2, $3, $4, $5, $6)";
        assert_placeholders_match_columns(sql);
        assert_eq!(round.first_to_act(), "alice");
        assert_eq!(round.second_to_act(), "bob");
    }

    #[test]
    fn create_player_column_list_is_well_formed() {
        let player = PlayerRecord::new(
            "priv".to_string(),
            "pub".to_string(),
            "Alice".to_string(),
            PlayerFlags { disabled: false, test: false, bot: false },
        );
        let sql = "INSERT INTO players (id, private_token, public_token, display_name, disabled, is_test, is_bot)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)";
        assert_placeholders_match_columns(sql);
        assert_eq!(player.display_name(), "Alice");
    }

    #[test]
    fn create_session_and_match_column_lists_are_well_formed() {
        assert_placeholders_match_columns(
            "INSERT INTO sessions (id, kind, variant, is_public, status, error)
                 VALUES ($1, $2, $3, $4, $5, $6)",
        );
        assert_placeholders_match_columns(
            "INSERT INTO matches (id, session_id, player_one, player_two, winner, status)
                 VALUES ($1, $2, $3, $4, $5, $6)",
        );
        let session = SessionRecord::new(SessionKind::Duel, Variant::Three, false);
        let record = MatchRecord::new(session.id(), ("alice".to_string(), "bob".to_string()));
        assert_eq!(record.participants().0, "alice");
    }

    #[test]
    fn create_tournament_column_list_is_well_formed() {
        let session = SessionRecord::new(SessionKind::Tournament, Variant::Four, true);
        let tournament = TournamentRecord::new(session.id(), 4, true);
        assert_placeholders_match_columns(
            "INSERT INTO tournaments (id, session_id, capacity, allow_bots, started)
                 VALUES ($1, $2, $3, $4, $5)",
        );
        assert!(!tournament.started());
    }
}
