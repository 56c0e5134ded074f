use crate::event::Event;
use tokio::sync::mpsc;
use tokio::time::Duration;

/// Single-consumer mailbox carrying typed events from a Coordinator/Match
/// to the RPC stream handler owning one player's connection.
///
/// Exactly one task writes (the Match, via [`PlayerChannel::sender`]) and
/// exactly one task reads (the streaming RPC handler, via `recv`/`recv_timeout`).
pub struct PlayerChannel {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl PlayerChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A cloneable handle writers use to push events; the receiver stays
    /// owned by this struct so only its owner can drain it.
    pub fn sender(&self) -> PlayerSender {
        PlayerSender {
            tx: self.tx.clone(),
        }
    }

    /// Block (with timeout) for the next event. Returns `None` on timeout
    /// or if every sender has dropped.
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<Event> {
        tokio::time::timeout(timeout, self.rx.recv()).await.ok().flatten()
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for PlayerChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable write handle into a [`PlayerChannel`].
#[derive(Clone)]
pub struct PlayerSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl PlayerSender {
    /// Push an event. Silently drops if the reader has gone away — a
    /// disconnected player's mailbox has no one left to notice.
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuhn_game::Action;

    /// an event sent before the reader ever polls is still delivered
    #[tokio::test]
    async fn buffers_until_read() {
        let mut channel = PlayerChannel::new();
        let sender = channel.sender();
        sender.send(Event::GameStart);
        let event = channel.recv_timeout(Duration::from_millis(50)).await;
        assert!(matches!(event, Some(Event::GameStart)));
        let _ = Action::Bet;
    }

    /// recv_timeout returns None when nothing arrives before the deadline
    #[tokio::test]
    async fn times_out_when_empty() {
        let mut channel = PlayerChannel::new();
        let event = channel.recv_timeout(Duration::from_millis(10)).await;
        assert!(event.is_none());
    }
}
