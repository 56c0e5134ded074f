use kuhn_core::ID;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PlayerFlags {
    pub disabled: bool,
    pub test: bool,
    pub bot: bool,
}

/// Immutable player identity: created out of band (signup / bot
/// provisioning), only ever read by the core.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    id: ID<Self>,
    private_token: String,
    public_token: String,
    display_name: String,
    flags: PlayerFlags,
}

impl PlayerRecord {
    pub fn new(private_token: String, public_token: String, display_name: String, flags: PlayerFlags) -> Self {
        Self {
            id: ID::default(),
            private_token,
            public_token,
            display_name,
            flags,
        }
    }
    pub fn id(&self) -> ID<Self> {
        self.id
    }
    pub fn private_token(&self) -> &str {
        &self.private_token
    }
    pub fn public_token(&self) -> &str {
        &self.public_token
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn flags(&self) -> PlayerFlags {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip_constructor_arguments() {
        let flags = PlayerFlags { disabled: false, test: true, bot: false };
        let player = PlayerRecord::new("priv".to_string(), "pub".to_string(), "Alice".to_string(), flags);
        assert_eq!(player.private_token(), "priv");
        assert_eq!(player.public_token(), "pub");
        assert_eq!(player.display_name(), "Alice");
        assert_eq!(player.flags(), flags);
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::schema::{Schema, PLAYERS};

    impl Schema for PlayerRecord {
        fn name() -> &'static str {
            PLAYERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                PLAYERS,
                " (
                    id              UUID PRIMARY KEY,
                    private_token   TEXT NOT NULL UNIQUE,
                    public_token    TEXT NOT NULL UNIQUE,
                    display_name    TEXT NOT NULL,
                    disabled        BOOLEAN NOT NULL DEFAULT FALSE,
                    is_test         BOOLEAN NOT NULL DEFAULT FALSE,
                    is_bot          BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_players_public_token ON ",
                PLAYERS,
                " (public_token);"
            )
        }
    }
}
