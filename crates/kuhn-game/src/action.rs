const MASK: u8 = 0xF;

/// A player decision at a Kuhn-poker choice node. Kuhn poker has no bet
/// sizing: every wager is exactly one chip, so actions carry no payload.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Bet,
    Check,
    Call,
    Fold,
}

impl Action {
    /// True if this action adds a chip to the pot (Bet or Call).
    pub fn is_aggro(&self) -> bool {
        matches!(self, Action::Bet | Action::Call)
    }
    /// True if this action ends the round without a showdown.
    pub fn is_fold(&self) -> bool {
        matches!(self, Action::Fold)
    }
    /// True if this action is a passive, betting-round-opening move.
    pub fn is_passive(&self) -> bool {
        matches!(self, Action::Check)
    }
    pub fn label(&self) -> &'static str {
        match self {
            Action::Bet => "Bet",
            Action::Check => "Check",
            Action::Call => "Call",
            Action::Fold => "Fold",
        }
    }
    pub fn abbrev(&self) -> &'static str {
        match self {
            Action::Bet => "+",
            Action::Check => "•",
            Action::Call => "=",
            Action::Fold => "-",
        }
    }
}

impl From<u8> for Action {
    fn from(value: u8) -> Self {
        match value & MASK {
            0 => Action::Bet,
            1 => Action::Check,
            2 => Action::Call,
            3 => Action::Fold,
            _ => panic!("invalid action byte"),
        }
    }
}
impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        match action {
            Action::Bet => 0,
            Action::Check => 1,
            Action::Call => 2,
            Action::Fold => 3,
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "BET" => Ok(Action::Bet),
            "CHECK" => Ok(Action::Check),
            "CALL" => Ok(Action::Call),
            "FOLD" => Ok(Action::Fold),
            _ => Err("invalid action type"),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Bet => write!(f, "BET"),
            Action::Check => write!(f, "CHECK"),
            Action::Call => write!(f, "CALL"),
            Action::Fold => write!(f, "FOLD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        for action in [Action::Bet, Action::Check, Action::Call, Action::Fold] {
            assert!(action == Action::from(u8::from(action)));
        }
    }

    #[test]
    fn bijective_str() {
        for action in [Action::Bet, Action::Check, Action::Call, Action::Fold] {
            assert_eq!(Action::try_from(action.to_string().as_str()).unwrap(), action);
        }
    }
}
