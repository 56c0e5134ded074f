/// Whose turn it is to act at a Kuhn-poker node.
///
/// Kuhn poker is heads-up: a choice node names one of the two seats.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Turn {
    Terminal,
    Choice(usize),
}

impl Turn {
    /// Extracts the seat index. Panics if not a Choice.
    pub fn position(&self) -> usize {
        match self {
            Self::Choice(c) => *c,
            Self::Terminal => panic!("don't ask"),
        }
    }
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice(_))
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
    /// 1-indexed seat number for display.
    pub fn display(&self) -> usize {
        self.position() + 1
    }
    pub fn label(&self) -> String {
        format!("P{}", self.display())
    }
    /// The other seat at the table.
    pub fn other(&self) -> Self {
        Self::Choice(1 - self.position())
    }
}

impl kuhn_core::Arbitrary for Turn {
    fn random() -> Self {
        Self::Choice(if rand::random() { 0 } else { 1 })
    }
}

impl From<usize> for Turn {
    fn from(seat: usize) -> Self {
        Self::Choice(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the seat opposite seat 0 is seat 1 and vice versa
    #[test]
    fn other_is_involution() {
        let t = Turn::Choice(0);
        assert_eq!(t.other().other(), t);
    }
}
