mod match_record;
mod player;
mod round;
#[cfg(feature = "database")]
mod schema;
mod session;
mod tournament;

pub use match_record::{MatchRecord, MatchStatus};
pub use player::{PlayerFlags, PlayerRecord};
pub use round::RoundRecord;
#[cfg(feature = "database")]
pub use schema::Schema;
pub use session::{SessionKind, SessionRecord, SessionStatus};
pub use tournament::{BracketItem, BracketRound, TournamentRecord};
