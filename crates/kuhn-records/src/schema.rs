/// Schema metadata for PostgreSQL tables, reduced from the training
/// pipeline's bulk-COPY trait suite to the three operations a per-match
/// persistence layer actually needs: naming, table creation, and indexing.
/// Bulk loading (`copy`/`truncates`/`freeze`) has no counterpart here —
/// match volumes are small enough for plain `INSERT`.
#[cfg(feature = "database")]
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Table name for the player table.
#[rustfmt::skip]
pub const PLAYERS:     &str = "players";
/// Table name for the session (coordinator) table.
#[rustfmt::skip]
pub const SESSIONS:    &str = "sessions";
/// Table name for the match table.
#[rustfmt::skip]
pub const MATCHES:     &str = "matches";
/// Table name for the round table.
#[rustfmt::skip]
pub const ROUNDS:      &str = "rounds";
/// Table name for the tournament table.
#[rustfmt::skip]
pub const TOURNAMENTS: &str = "tournaments";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchRecord, PlayerRecord, RoundRecord, SessionRecord, TournamentRecord};

    fn assert_well_formed<T: Schema>() {
        assert!(T::creates().contains(T::name()));
        assert!(T::creates().trim_end().ends_with(';'));
        for stmt in T::indices().split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                assert!(stmt.contains(T::name()), "index statement missing table name: {stmt}");
            }
        }
    }

    #[test]
    fn every_record_type_creates_well_formed_ddl() {
        assert_well_formed::<PlayerRecord>();
        assert_well_formed::<SessionRecord>();
        assert_well_formed::<MatchRecord>();
        assert_well_formed::<RoundRecord>();
        assert_well_formed::<TournamentRecord>();
    }

    #[test]
    fn table_names_are_distinct() {
        let names = [PLAYERS, SESSIONS, MATCHES, ROUNDS, TOURNAMENTS];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
