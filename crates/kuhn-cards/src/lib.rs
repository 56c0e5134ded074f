mod rank;
mod variant;

pub use rank::Rank;
pub use variant::Variant;
