use kuhn_cards::Variant;
use kuhn_core::{Config, ID};
use kuhn_database::Db;
use kuhn_players::BotLauncher;
use kuhn_records::{MatchRecord, SessionKind, SessionRecord, SessionStatus};
use kuhn_room::{Intake, PlayerChannel, RoomError, WaitingRoom};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Notify};

use crate::match_engine::MatchEngine;
use crate::tournament::run_bracket;

/// The Coordinator's own bootstrap/termination state, distinct from (but
/// closing through to) the Waiting Room's. Guarded by a lock so
/// `mark_as_registered`/`close` are idempotent under concurrent callers,
/// not merely logically idempotent.
struct Bootstrap {
    registered: bool,
    closed: bool,
    error: Option<String>,
}

/// Owns one session's Waiting Room and drives it to completion: a duel
/// directly, or a tournament bracket. Mirrors the reference coordinator's
/// `run`/`add_bots` cooperative-task split (§4.5).
pub struct Coordinator {
    session: Mutex<SessionRecord>,
    room: Arc<WaitingRoom>,
    db: Option<Arc<Db>>,
    config: Config,
    intake_tx: mpsc::UnboundedSender<(String, Intake)>,
    intake_rx: Mutex<Option<mpsc::UnboundedReceiver<(String, Intake)>>>,
    bootstrap: Mutex<Bootstrap>,
    registered_notify: Notify,
}

impl Coordinator {
    pub fn new(kind: SessionKind, variant: Variant, capacity: usize, public: bool, config: Config, db: Option<Arc<Db>>) -> Arc<Self> {
        let session = SessionRecord::new(kind, variant, public);
        let (intake_tx, intake_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            session: Mutex::new(session),
            room: Arc::new(WaitingRoom::new(capacity)),
            db,
            config,
            intake_tx,
            intake_rx: Mutex::new(Some(intake_rx)),
            bootstrap: Mutex::new(Bootstrap {
                registered: false,
                closed: false,
                error: None,
            }),
            registered_notify: Notify::new(),
        })
    }

    pub async fn session_id(&self) -> ID<SessionRecord> {
        self.session.lock().await.id()
    }

    pub async fn variant(&self) -> Variant {
        self.session.lock().await.variant()
    }

    pub fn room(&self) -> &Arc<WaitingRoom> {
        &self.room
    }

    /// Admit `token`. The caller (the streaming RPC handler) holds onto the
    /// returned channel and drains it into the socket.
    pub async fn register(&self, token: &str) -> Result<PlayerChannel, RoomError> {
        self.room.register(token).await
    }

    /// Forward one decoded intake message from `token`'s socket into the
    /// shared queue the Match engine (or bracket) drains.
    pub fn submit(&self, token: String, message: Intake) {
        let _ = self.intake_tx.send((token, message));
    }

    /// Marks the session registered, per §4.6's RPC handler step. Idempotent.
    pub async fn mark_as_registered(&self) {
        let mut bootstrap = self.bootstrap.lock().await;
        if !bootstrap.registered {
            bootstrap.registered = true;
            drop(bootstrap);
            self.registered_notify.notify_waiters();
        }
    }

    pub async fn is_registered(&self) -> bool {
        self.bootstrap.lock().await.registered
    }

    async fn wait_registered(&self, timeout: Duration) -> bool {
        if self.is_registered().await {
            return true;
        }
        let notified = self.registered_notify.notified();
        tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep(timeout) => {}
        }
        self.is_registered().await
    }

    /// Idempotent terminal transition (§4.5). Also closes the Waiting Room
    /// so every `wait_ready` caller unblocks. The first error recorded wins.
    pub async fn close(&self, error: Option<String>) {
        let mut bootstrap = self.bootstrap.lock().await;
        if bootstrap.closed {
            return;
        }
        bootstrap.closed = true;
        if bootstrap.error.is_none() {
            bootstrap.error = error.clone();
        }
        drop(bootstrap);
        self.room.close(error).await;
    }

    pub async fn is_closed(&self) -> bool {
        self.bootstrap.lock().await.closed
    }

    /// Drives the session end-to-end: waits for a player's socket to mark
    /// the coordinator registered, then for the room to reach quorum,
    /// each under its own independently-configured deadline, then plays a
    /// duel or a tournament bracket, persisting session/match state as it
    /// goes.
    pub async fn run(self: Arc<Self>) {
        {
            let mut session = self.session.lock().await;
            if let Some(db) = &self.db {
                if let Err(e) = db.create_session(&session).await {
                    log::warn!("failed to persist session: {e}");
                }
            }
            session.set_status(kuhn_records::SessionStatus::Registered);
        }

        if !self.wait_registered(self.config.registered_timeout).await {
            self.close(Some("registration deadline exceeded".to_string())).await;
            self.fail_session("registration deadline exceeded".to_string()).await;
            return;
        }

        if !self.room.wait_ready(self.config.ready_timeout).await {
            self.close(Some("ready deadline exceeded".to_string())).await;
            self.fail_session("ready deadline exceeded".to_string()).await;
            return;
        }

        {
            let mut session = self.session.lock().await;
            session.set_status(SessionStatus::Started);
            if let Some(db) = &self.db {
                if let Err(e) = db.update_session_status(&session).await {
                    log::warn!("failed to persist session start: {e}");
                }
            }
        }

        let order = self.room.order().await;
        let intake_rx = self.intake_rx.lock().await.take().expect("run called once");

        if order.len() == 2 {
            self.run_duel(order, intake_rx).await;
        } else {
            run_bracket(self.clone(), order, intake_rx).await;
        }

        self.close(None).await;
    }

    async fn run_duel(self: &Arc<Self>, order: Vec<String>, intake_rx: mpsc::UnboundedReceiver<(String, Intake)>) {
        let session_id = self.session_id().await;
        let mut record = MatchRecord::new(session_id, (order[0].clone(), order[1].clone()));
        if let Some(db) = &self.db {
            if let Err(e) = db.create_match(&record).await {
                log::warn!("failed to persist match: {e}");
            }
        }

        let engine = MatchEngine::new(
            record.id(),
            self.variant().await,
            self.config.initial_bank,
            self.config.message_timeout,
            (order[0].clone(), order[1].clone()),
            self.room.clone(),
            intake_rx,
        );
        let outcome = engine.run().await;

        let tape = record.finish(outcome.winner.clone(), &outcome.rounds);
        if let Some(err) = &outcome.error {
            record.fail(err.clone());
        }
        if let Some(db) = &self.db {
            if let Err(e) = db.finish_match(&record, &tape).await {
                log::warn!("failed to persist match result: {e}");
            }
            for round in &outcome.rounds {
                if let Err(e) = db.create_round(round).await {
                    log::warn!("failed to persist round: {e}");
                }
            }
        }

        let mut session = self.session.lock().await;
        session.set_status(SessionStatus::Finished);
        if let Some(db) = &self.db {
            let _ = db.update_session_status(&session).await;
        }
    }

    async fn fail_session(&self, error: String) {
        let mut session = self.session.lock().await;
        session.set_error(error);
        if let Some(db) = &self.db {
            let _ = db.update_session_status(&session).await;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> Option<&Arc<Db>> {
        self.db.as_ref()
    }

    /// Provisions bot subprocesses for a `*WithBot(s)` session, following
    /// one of two algorithms depending on session kind (§4.5). Runs
    /// concurrently with [`Coordinator::run`].
    pub async fn add_bots(self: Arc<Self>, bots: Vec<BotLauncher>) {
        if bots.is_empty() {
            return;
        }
        if !self.wait_registered(self.config.registered_timeout).await {
            return;
        }

        let kind = self.session.lock().await.kind();
        let variant = self.variant().await;
        let session_id = self.session_id().await.inner().to_string();
        let mut rng = SmallRng::from_entropy();

        match kind {
            SessionKind::DuelWithBot => {
                let Some(launcher) = bots.choose(&mut rng) else {
                    return;
                };
                match kuhn_players::spawn(launcher, &session_id, variant).await {
                    Ok(()) => log::info!("bot {} provisioned for session {session_id}", launcher.name),
                    Err(e) => {
                        log::warn!("bot {} failed to start: {e}", launcher.name);
                        self.close(Some(format!("bot subprocess failed: {e}"))).await;
                    }
                }
            }
            SessionKind::TournamentWithBots => {
                self.room.wait_ready(self.config.connection_timeout).await;
                let missing = self.room.capacity().saturating_sub(self.room.registered().await);
                if missing == 0 {
                    return;
                }
                self.room.mark_unready().await;
                let mut pool = bots;
                pool.shuffle(&mut rng);
                for launcher in pool.into_iter().take(missing) {
                    match kuhn_players::spawn(&launcher, &session_id, variant).await {
                        Ok(()) => log::info!("bot {} provisioned for session {session_id}", launcher.name),
                        Err(e) => log::warn!("bot {} failed to start: {e}", launcher.name),
                    }
                }
                self.room.wait_ready(self.config.connection_timeout).await;
            }
            SessionKind::Duel | SessionKind::Tournament => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            initial_bank: 5,
            message_timeout: Duration::from_millis(50),
            connection_timeout: Duration::from_millis(50),
            registered_timeout: Duration::from_millis(50),
            ready_timeout: Duration::from_millis(50),
            reveal_cards: false,
            image_size: 64,
            image_noise: 0.0,
            image_rotate: 0.0,
            allow_bots: false,
            bot_folder: "./bots".to_string(),
            generate_test_players: 0,
            generate_bot_players: 0,
            db_url: String::new(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    /// a duel coordinator with no bots configured exits `add_bots` immediately
    #[tokio::test]
    async fn add_bots_noop_without_launchers() {
        let coordinator = Coordinator::new(SessionKind::Duel, Variant::Three, 2, false, test_config(), None);
        coordinator.add_bots(vec![]).await;
    }

    /// `mark_as_registered` is idempotent and wakes a pending `run`
    #[tokio::test]
    async fn mark_as_registered_unblocks_run() {
        let coordinator = Coordinator::new(SessionKind::Duel, Variant::Three, 2, false, test_config(), None);
        assert!(!coordinator.is_registered().await);
        coordinator.mark_as_registered().await;
        coordinator.mark_as_registered().await;
        assert!(coordinator.is_registered().await);
        assert!(coordinator.wait_registered(Duration::from_millis(10)).await);
    }

    /// closing twice keeps the first recorded error
    #[tokio::test]
    async fn close_is_idempotent() {
        let coordinator = Coordinator::new(SessionKind::Duel, Variant::Three, 2, false, test_config(), None);
        coordinator.close(Some("first".to_string())).await;
        coordinator.close(Some("second".to_string())).await;
        assert!(coordinator.is_closed().await);
        assert_eq!(coordinator.bootstrap.lock().await.error.as_deref(), Some("first"));
    }
}
