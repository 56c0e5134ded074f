//! Core type aliases, traits, and runtime configuration for the kuhn-poker
//! coordination server.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip counts: ante size, bank balances, round evaluations.
pub type Chips = i32;
/// Seat index within a match (0 = first actor of the match's opening round).
pub type Position = usize;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and chance nodes.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self {
            inner: uuid::Uuid::parse_str(s)?,
            marker: PhantomData,
        })
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self {
            inner: uuid::Uuid::deserialize(deserializer)?,
            marker: PhantomData,
        })
    }
}

// ============================================================================
// MATCH PARAMETERS (defaults; overridden by Config::from_env)
// ============================================================================
/// Number of players in a duel.
pub const N: usize = 2;
/// Default starting bank per player per match.
pub const INITIAL_BANK: Chips = 5;

// ============================================================================
// RUNTIME CONFIGURATION
// ============================================================================
use std::time::Duration;

/// Server-wide configuration, populated from environment variables at
/// startup. Library crates read fields off this struct; none of them touch
/// `std::env` directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub initial_bank: Chips,
    pub message_timeout: Duration,
    pub connection_timeout: Duration,
    pub registered_timeout: Duration,
    pub ready_timeout: Duration,
    pub reveal_cards: bool,
    pub image_size: u32,
    pub image_noise: f32,
    pub image_rotate: f32,
    pub allow_bots: bool,
    pub bot_folder: String,
    pub generate_test_players: usize,
    pub generate_bot_players: usize,
    pub db_url: String,
    pub bind_addr: String,
}

impl Config {
    /// Load configuration from the environment, falling back to documented
    /// defaults for every option except `DB_URL`, which must be set.
    pub fn from_env() -> Self {
        Self {
            initial_bank: env_parse("KUHN_INITIAL_BANK", INITIAL_BANK),
            message_timeout: Duration::from_millis(env_parse("KUHN_MESSAGE_TIMEOUT_MS", 5000)),
            connection_timeout: Duration::from_millis(env_parse(
                "KUHN_CONNECTION_TIMEOUT_MS",
                30000,
            )),
            registered_timeout: Duration::from_millis(env_parse(
                "KUHN_REGISTERED_TIMEOUT_MS",
                10000,
            )),
            ready_timeout: Duration::from_millis(env_parse("KUHN_READY_TIMEOUT_MS", 30000)),
            reveal_cards: env_parse("KUHN_REVEAL_CARDS", false),
            image_size: env_parse("KUHN_IMAGE_SIZE", 64),
            image_noise: env_parse("KUHN_IMAGE_NOISE", 0.05),
            image_rotate: env_parse("KUHN_IMAGE_ROTATE", 15.0),
            allow_bots: env_parse("KUHN_ALLOW_BOTS", false),
            bot_folder: std::env::var("KUHN_BOT_FOLDER").unwrap_or_else(|_| "./bots".into()),
            generate_test_players: env_parse("KUHN_GENERATE_TEST_PLAYERS", 0),
            generate_bot_players: env_parse("KUHN_GENERATE_BOT_PLAYERS", 0),
            db_url: std::env::var("DB_URL").expect("DB_URL must be set"),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with a timestamped log file.
/// Creates `logs/` and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a freshly-defaulted ID is distinct from another freshly-defaulted ID
    #[test]
    fn ids_are_unique() {
        let a: ID<()> = ID::default();
        let b: ID<()> = ID::default();
        assert_ne!(a, b);
    }

    /// casting an ID to a different marker type preserves the underlying uuid
    #[test]
    fn cast_preserves_uuid() {
        let a: ID<()> = ID::default();
        let u: uuid::Uuid = a.inner();
        let b: ID<u8> = a.cast();
        assert_eq!(b.inner(), u);
    }
}
