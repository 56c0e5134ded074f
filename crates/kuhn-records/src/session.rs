use kuhn_cards::Variant;
use kuhn_core::ID;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionKind {
    DuelWithBot,
    Duel,
    Tournament,
    TournamentWithBots,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionStatus {
    Registered,
    Started,
    Finished,
    Failed,
}

/// A Coordinator's persisted session record.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    id: ID<Self>,
    kind: SessionKind,
    variant: Variant,
    public: bool,
    status: SessionStatus,
    error: Option<String>,
}

impl SessionRecord {
    pub fn new(kind: SessionKind, variant: Variant, public: bool) -> Self {
        Self {
            id: ID::default(),
            kind,
            variant,
            public,
            status: SessionStatus::Registered,
            error: None,
        }
    }
    pub fn id(&self) -> ID<Self> {
        self.id
    }
    pub fn kind(&self) -> SessionKind {
        self.kind
    }
    pub fn variant(&self) -> Variant {
        self.variant
    }
    pub fn is_public(&self) -> bool {
        self.public
    }
    pub fn status(&self) -> SessionStatus {
        self.status
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }
    pub fn set_error(&mut self, error: String) {
        self.status = SessionStatus::Failed;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_registered() {
        let session = SessionRecord::new(SessionKind::Duel, Variant::Three, false);
        assert_eq!(session.status(), SessionStatus::Registered);
        assert!(session.error().is_none());
    }

    #[test]
    fn set_error_marks_the_session_failed() {
        let mut session = SessionRecord::new(SessionKind::Tournament, Variant::Four, true);
        session.set_error("registration deadline exceeded".to_string());
        assert_eq!(session.status(), SessionStatus::Failed);
        assert_eq!(session.error(), Some("registration deadline exceeded"));
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use crate::schema::{Schema, SESSIONS};

    impl Schema for SessionRecord {
        fn name() -> &'static str {
            SESSIONS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SESSIONS,
                " (
                    id          UUID PRIMARY KEY,
                    kind        TEXT NOT NULL,
                    variant     TEXT NOT NULL,
                    is_public   BOOLEAN NOT NULL,
                    status      TEXT NOT NULL,
                    error       TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sessions_status ON ",
                SESSIONS,
                " (status);"
            )
        }
    }
}
