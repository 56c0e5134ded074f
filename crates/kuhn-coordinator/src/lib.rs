mod coordinator;
mod match_engine;
mod registry;
mod tournament;

pub use coordinator::Coordinator;
pub use match_engine::{MatchEngine, MatchOutcome};
pub use registry::Registry;
