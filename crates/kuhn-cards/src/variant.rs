use crate::rank::Rank;
use kuhn_core::Arbitrary;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// The two supported Kuhn-poker deal sizes. A game type is fixed for the
/// lifetime of a match and tags every information-set string it produces.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Variant {
    /// {J, Q, K}
    Three,
    /// {J, Q, K, A}
    Four,
}

impl Variant {
    pub fn deck(&self) -> &'static [Rank] {
        match self {
            Variant::Three => &[Rank::J, Rank::Q, Rank::K],
            Variant::Four => &[Rank::J, Rank::Q, Rank::K, Rank::A],
        }
    }

    /// Tag used as the leading token of an information-set string.
    pub fn tag(&self) -> &'static str {
        match self {
            Variant::Three => "V3",
            Variant::Four => "V4",
        }
    }

    /// Deck size as the string a bot subprocess expects on `--cards`.
    pub fn card_count(&self) -> &'static str {
        match self {
            Variant::Three => "3",
            Variant::Four => "4",
        }
    }

    /// Deal an ordered pair of distinct ranks: (first-actor's card, second-actor's card).
    pub fn deal(&self) -> (Rank, Rank) {
        let mut rng = rand::rngs::SmallRng::from_entropy();
        let mut deck: Vec<Rank> = self.deck().to_vec();
        deck.shuffle(&mut rng);
        (deck[0], deck[1])
    }
}

impl TryFrom<u8> for Variant {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            3 => Ok(Variant::Three),
            4 => Ok(Variant::Four),
            _ => Err(format!("invalid game type: {n}")),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl Arbitrary for Variant {
    fn random() -> Self {
        if rand::random() {
            Variant::Three
        } else {
            Variant::Four
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a deal always yields two distinct cards from the variant's deck
    #[test]
    fn deal_is_distinct() {
        for _ in 0..64 {
            let (a, b) = Variant::Four.deal();
            assert_ne!(a, b);
        }
    }

    /// the three-card variant never deals an ace
    #[test]
    fn three_card_excludes_ace() {
        for _ in 0..64 {
            let (a, b) = Variant::Three.deal();
            assert!(a != Rank::A && b != Rank::A);
        }
    }
}
