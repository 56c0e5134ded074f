use kuhn_records::{BracketItem, BracketRound, MatchRecord, TournamentRecord};
use kuhn_room::Intake;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::coordinator::Coordinator;
use crate::match_engine::MatchEngine;

/// Routes one shared intake queue to whichever in-flight match a token
/// belongs to. A single Waiting Room serves the whole tournament, so all
/// rounds share one token->channel namespace.
type Routes = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<(String, Intake)>>>>;

/// Single-elimination bracket (§4.5a): pairs the Waiting Room's admission
/// order, plays every pair in a round concurrently, advances winners, and
/// repeats until one participant remains.
pub async fn run_bracket(coordinator: Arc<Coordinator>, participants: Vec<String>, mut intake_rx: mpsc::UnboundedReceiver<(String, Intake)>) {
    let session_id = coordinator.session_id().await;
    let mut tournament = TournamentRecord::new(session_id, participants.len(), coordinator.config().allow_bots);
    tournament.start();
    if let Some(db) = coordinator.db() {
        if let Err(e) = db.create_tournament(&tournament).await {
            log::warn!("failed to persist tournament: {e}");
        }
    }

    let routes: Routes = Arc::new(Mutex::new(HashMap::new()));
    let router_routes = routes.clone();
    tokio::spawn(async move {
        while let Some((token, message)) = intake_rx.recv().await {
            let routes = router_routes.lock().await;
            if let Some(tx) = routes.get(&token) {
                let _ = tx.send((token, message));
            }
        }
    });

    let mut remaining = participants;
    let mut rng = SmallRng::from_entropy();
    while remaining.len() > 1 {
        remaining.shuffle(&mut rng);

        let mut bracket_round = BracketRound::default();
        let mut advancing = Vec::new();
        let mut matches = Vec::new();

        for pair in remaining.chunks(2) {
            if pair.len() < 2 {
                advancing.push(pair[0].clone());
                continue;
            }
            let (a, b) = (pair[0].clone(), pair[1].clone());
            let record = MatchRecord::new(session_id, (a.clone(), b.clone()));
            if let Some(db) = coordinator.db() {
                let _ = db.create_match(&record).await;
            }
            bracket_round.items.push(BracketItem {
                participants: (a.clone(), b.clone()),
                match_id: Some(record.id()),
            });

            let (tx, rx) = mpsc::unbounded_channel();
            {
                let mut routes = routes.lock().await;
                routes.insert(a.clone(), tx.clone());
                routes.insert(b.clone(), tx);
            }

            let coordinator = coordinator.clone();
            let pair = (a.clone(), b.clone());
            let handle = tokio::spawn(async move {
                let engine = MatchEngine::new(
                    record.id(),
                    coordinator.variant().await,
                    coordinator.config().initial_bank,
                    coordinator.config().message_timeout,
                    (a, b),
                    coordinator.room().clone(),
                    rx,
                );
                let outcome = engine.run().await;
                let mut record = record;
                let tape = record.finish(outcome.winner.clone(), &outcome.rounds);
                if let Some(err) = &outcome.error {
                    record.fail(err.clone());
                }
                if let Some(db) = coordinator.db() {
                    let _ = db.finish_match(&record, &tape).await;
                    for round in &outcome.rounds {
                        let _ = db.create_round(round).await;
                    }
                }
                outcome.winner
            });
            matches.push((pair, handle));
        }

        for ((a, b), handle) in matches {
            match handle.await {
                Ok(Some(winner)) => advancing.push(winner),
                Ok(None) | Err(_) => {
                    let survivor = if rand::random() { a } else { b };
                    log::warn!("bracket match produced no winner, randomly advancing {survivor}");
                    advancing.push(survivor);
                }
            }
        }

        tournament.push_round(bracket_round);
        remaining = advancing;
    }

    if let Some(winner) = remaining.into_iter().next() {
        tournament.set_place1(winner);
    }
    if let Some(db) = coordinator.db() {
        if let Err(e) = db.finish_tournament(&tournament).await {
            log::warn!("failed to persist tournament result: {e}");
        }
    }
    coordinator.close(None).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// pairing an odd-length round gives the unpaired participant a bye
    #[test]
    fn odd_round_has_a_bye() {
        let remaining = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut advancing = Vec::new();
        for pair in remaining.chunks(2) {
            if pair.len() < 2 {
                advancing.push(pair[0].clone());
            }
        }
        assert_eq!(advancing, vec!["c".to_string()]);
    }
}
