/// A Kuhn-poker card rank. Only relative order matters for showdown; suits
/// do not exist in this game.
///
/// The ordering (J < Q < K < A) is the showdown strength order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Rank {
    J = 0,
    Q = 1,
    K = 2,
    A = 3,
}

impl Rank {
    /// Single-character label used in information-set strings.
    pub fn label(&self) -> char {
        match self {
            Rank::J => 'J',
            Rank::Q => 'Q',
            Rank::K => 'K',
            Rank::A => 'A',
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// char isomorphism
impl TryFrom<char> for Rank {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'J' => Ok(Rank::J),
            'Q' => Ok(Rank::Q),
            'K' => Ok(Rank::K),
            'A' => Ok(Rank::A),
            _ => Err(format!("invalid rank char: {c}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// showdown ordering places ace strictly above king
    #[test]
    fn ace_beats_king() {
        assert!(Rank::A > Rank::K);
    }

    /// round-tripping a rank through its label character is the identity
    #[test]
    fn label_round_trips() {
        for r in [Rank::J, Rank::Q, Rank::K, Rank::A] {
            assert_eq!(Rank::try_from(r.label()).unwrap(), r);
        }
    }
}
