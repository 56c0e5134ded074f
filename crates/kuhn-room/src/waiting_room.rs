use crate::channel::{PlayerChannel, PlayerSender};
use crate::event::Event;
use std::collections::HashMap;
use std::collections::HashSet;
use tokio::sync::Notify;
use tokio::sync::RwLock;
use tokio::time::Duration;

/// Errors surfaced by [`WaitingRoom::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    Full,
    Closed,
    DoubleRegistration,
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "room is full"),
            Self::Closed => write!(f, "room is closed"),
            Self::DoubleRegistration => write!(f, "player already registered"),
        }
    }
}
impl std::error::Error for RoomError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Ready,
    Closed,
}

struct Inner {
    status: Status,
    error: Option<String>,
    order: Vec<String>,
    channels: HashMap<String, PlayerSender>,
    disconnected: HashSet<String>,
}

/// Admits up to `capacity` distinct player tokens under a deadline, then
/// announces readiness. One [`WaitingRoom`] per session; all mutation is
/// serialised by its internal lock.
pub struct WaitingRoom {
    capacity: usize,
    inner: RwLock<Inner>,
    ready: Notify,
    became_ready: std::sync::atomic::AtomicBool,
}

impl WaitingRoom {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(Inner {
                status: Status::Open,
                error: None,
                order: Vec::new(),
                channels: HashMap::new(),
                disconnected: HashSet::new(),
            }),
            ready: Notify::new(),
            became_ready: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register `token`, creating its [`PlayerChannel`]. Returns the
    /// channel's read half for the caller (the RPC handler) to drain.
    pub async fn register(&self, token: &str) -> Result<PlayerChannel, RoomError> {
        let mut inner = self.inner.write().await;
        match inner.status {
            Status::Closed => return Err(RoomError::Closed),
            Status::Ready => return Err(RoomError::Full),
            Status::Open => {}
        }
        if inner.channels.contains_key(token) {
            return Err(RoomError::DoubleRegistration);
        }
        if inner.order.len() >= self.capacity {
            return Err(RoomError::Full);
        }
        let channel = PlayerChannel::new();
        inner.channels.insert(token.to_string(), channel.sender());
        inner.order.push(token.to_string());
        if inner.order.len() == self.capacity {
            inner.status = Status::Ready;
            drop(inner);
            self.became_ready.store(true, std::sync::atomic::Ordering::SeqCst);
            self.ready.notify_waiters();
        }
        Ok(channel)
    }

    pub async fn registered(&self) -> usize {
        self.inner.read().await.order.len()
    }

    /// Insertion order of registered tokens — used by the tournament
    /// bracket builder as the deterministic pairing order.
    pub async fn order(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }

    pub async fn is_ready(&self) -> bool {
        matches!(self.inner.read().await.status, Status::Ready)
    }

    /// Wait (bounded) for the room to reach capacity. Returns `true` if
    /// readiness was reached before `timeout`, `false` otherwise.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        if self.is_ready().await {
            return true;
        }
        let notified = self.ready.notified();
        tokio::select! {
            _ = notified => self.is_ready().await,
            _ = tokio::time::sleep(timeout) => self.is_ready().await,
        }
    }

    /// Reopen registration after an early-ready room still has free slots
    /// (tournament-with-bots fill, §4.5).
    pub async fn mark_unready(&self) {
        let mut inner = self.inner.write().await;
        if inner.status == Status::Ready {
            inner.status = Status::Open;
        }
    }

    /// Idempotent terminal transition. Unblocks any `wait_ready` callers
    /// even when closing with an error.
    pub async fn close(&self, error: Option<String>) {
        let mut inner = self.inner.write().await;
        if inner.status == Status::Closed {
            return;
        }
        inner.status = Status::Closed;
        if inner.error.is_none() {
            inner.error = error;
        }
        drop(inner);
        self.ready.notify_waiters();
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    pub async fn notify_all(&self, event: Event) {
        let inner = self.inner.read().await;
        for (token, sender) in inner.channels.iter() {
            if !inner.disconnected.contains(token) {
                sender.send(event.clone());
            }
        }
    }

    pub async fn notify_one(&self, token: &str, event: Event) {
        let inner = self.inner.read().await;
        if let Some(sender) = inner.channels.get(token) {
            sender.send(event);
        }
    }

    pub async fn mark_disconnected(&self, token: &str) {
        self.inner.write().await.disconnected.insert(token.to_string());
    }

    pub async fn is_disconnected(&self, token: &str) -> bool {
        self.inner.read().await.disconnected.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// registering up to capacity transitions the room to ready exactly once
    #[tokio::test]
    async fn fills_to_ready() {
        let room = WaitingRoom::new(2);
        assert!(!room.is_ready().await);
        room.register("a").await.unwrap();
        assert!(!room.is_ready().await);
        room.register("b").await.unwrap();
        assert!(room.is_ready().await);
    }

    /// a duplicate token on a non-full room is rejected, not silently accepted
    #[tokio::test]
    async fn rejects_double_registration() {
        let room = WaitingRoom::new(2);
        room.register("a").await.unwrap();
        assert_eq!(room.register("a").await.unwrap_err(), RoomError::DoubleRegistration);
    }

    /// a third registration on a capacity-2 room is rejected as full
    #[tokio::test]
    async fn rejects_when_full() {
        let room = WaitingRoom::new(2);
        room.register("a").await.unwrap();
        room.register("b").await.unwrap();
        assert_eq!(room.register("c").await.unwrap_err(), RoomError::Full);
    }

    /// close is idempotent: the first error sticks, later calls are no-ops
    #[tokio::test]
    async fn close_is_idempotent() {
        let room = WaitingRoom::new(2);
        room.close(Some("first".into())).await;
        room.close(Some("second".into())).await;
        assert_eq!(room.error().await, Some("first".to_string()));
    }

    /// wait_ready returns promptly once capacity is reached from another task
    #[tokio::test]
    async fn wait_ready_unblocks_on_fill() {
        let room = std::sync::Arc::new(WaitingRoom::new(2));
        let r2 = room.clone();
        let handle = tokio::spawn(async move { r2.wait_ready(Duration::from_secs(5)).await });
        room.register("a").await.unwrap();
        room.register("b").await.unwrap();
        assert!(handle.await.unwrap());
    }
}
