use crate::action::Action;
use crate::turn::Turn;
use kuhn_cards::{Rank, Variant};
use kuhn_core::Chips;

/// A Kuhn-poker decision tree node: the variant, the dealt cards, and the
/// action history played so far from the root.
///
/// `cards.0` is the first-to-act player's card, `cards.1` the second-to-act
/// player's card. `evaluation()` is always signed from the first-actor's
/// perspective; callers flip the sign for the other seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    variant: Variant,
    cards: (Rank, Rank),
    history: Vec<Action>,
}

impl Tree {
    /// Start a new round: deal cards, empty history.
    pub fn deal(variant: Variant) -> Self {
        let cards = variant.deal();
        Self {
            variant,
            cards,
            history: Vec::new(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }
    pub fn cards(&self) -> (Rank, Rank) {
        self.cards
    }
    pub fn card(&self, turn: Turn) -> Rank {
        match turn.position() {
            0 => self.cards.0,
            1 => self.cards.1,
            _ => unreachable!("heads-up"),
        }
    }

    /// Whose decision it is, or `Turn::Terminal` if the round is over.
    pub fn turn(&self) -> Turn {
        match self.history.as_slice() {
            [] => Turn::Choice(0),
            [Action::Check] => Turn::Choice(1),
            [Action::Check, Action::Bet] => Turn::Choice(0),
            [Action::Bet] => Turn::Choice(1),
            _ => Turn::Terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.turn().is_terminal()
    }

    /// Legal actions at the current node; empty once terminal.
    pub fn actions(&self) -> Vec<Action> {
        match self.history.as_slice() {
            [] => vec![Action::Bet, Action::Check],
            [Action::Check] => vec![Action::Bet, Action::Check],
            [Action::Check, Action::Bet] => vec![Action::Call, Action::Fold],
            [Action::Bet] => vec![Action::Call, Action::Fold],
            _ => vec![],
        }
    }

    /// Play `action`, returning the successor node. Panics if `action` is
    /// not legal at the current node (callers must check `actions()` first).
    pub fn play(&self, action: Action) -> Self {
        assert!(
            self.actions().contains(&action),
            "illegal action {action} at {:?}",
            self.history
        );
        let mut history = self.history.clone();
        history.push(action);
        Self {
            variant: self.variant,
            cards: self.cards,
            history,
        }
    }

    /// True if either seat's card is shown at this terminal: showdowns
    /// (CALL or CHECK CHECK) reveal both cards; folds keep them masked.
    pub fn reveals_cards(&self) -> bool {
        matches!(
            self.history.as_slice(),
            [Action::Check, Action::Check] | [Action::Bet, Action::Call] | [Action::Check, Action::Bet, Action::Call]
        )
    }

    /// Signed payoff from the first-actor's perspective. Panics if not terminal.
    pub fn evaluation(&self) -> Chips {
        let higher = self.cards.0 > self.cards.1;
        match self.history.as_slice() {
            [Action::Check, Action::Check] => {
                if higher {
                    1
                } else {
                    -1
                }
            }
            [Action::Bet, Action::Fold] => 1,
            [Action::Bet, Action::Call] => {
                if higher {
                    2
                } else {
                    -2
                }
            }
            [Action::Check, Action::Bet, Action::Fold] => -1,
            [Action::Check, Action::Bet, Action::Call] => {
                if higher {
                    2
                } else {
                    -2
                }
            }
            other => panic!("evaluation() on non-terminal history {other:?}"),
        }
    }

    /// Public information-set string: `<variant>.<??|cards>.<action>...`
    /// with cards masked unless this node reveals them.
    pub fn public_inf_set(&self) -> String {
        self.inf_set(self.is_terminal() && self.reveals_cards())
    }

    /// Full information-set string, cards always revealed. Used only for
    /// persisted outcomes, never sent to a player mid-round.
    pub fn full_inf_set(&self) -> String {
        self.inf_set(true)
    }

    fn inf_set(&self, reveal: bool) -> String {
        let cards = if reveal {
            format!("{}{}", self.cards.0.label(), self.cards.1.label())
        } else {
            "??".to_string()
        };
        let mut tokens = vec![self.variant.tag().to_string(), cards];
        tokens.extend(self.history.iter().map(|a| a.to_string()));
        tokens.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(variant: Variant, cards: (Rank, Rank), actions: &[Action]) -> Tree {
        let mut t = Tree {
            variant,
            cards,
            history: Vec::new(),
        };
        for a in actions {
            t = t.play(*a);
        }
        t
    }

    /// check-check showdown pays the higher card +1 from their own perspective
    #[test]
    fn check_check_showdown() {
        let t = tree_with(Variant::Three, (Rank::K, Rank::Q), &[Action::Check, Action::Check]);
        assert!(t.is_terminal());
        assert_eq!(t.evaluation(), 1);
        assert!(t.reveals_cards());
    }

    /// a bet followed by a fold awards the bettor +1 and keeps cards masked
    #[test]
    fn bet_fold_keeps_cards_masked() {
        let t = tree_with(Variant::Three, (Rank::J, Rank::K), &[Action::Bet, Action::Fold]);
        assert_eq!(t.evaluation(), 1);
        assert!(!t.reveals_cards());
        assert!(t.public_inf_set().contains("??"));
    }

    /// check-bet-call showdown pays 2 chips to the higher card
    #[test]
    fn check_bet_call_showdown_pays_two() {
        let t = tree_with(Variant::Three, (Rank::Q, Rank::K), &[Action::Check, Action::Bet, Action::Call]);
        assert_eq!(t.evaluation(), -2);
    }

    /// the root offers exactly {BET, CHECK} and nothing else
    #[test]
    fn root_actions() {
        let t = Tree::deal(Variant::Three);
        let mut actions = t.actions();
        actions.sort();
        assert_eq!(actions, vec![Action::Bet, Action::Check]);
    }

    /// playing an illegal action panics rather than silently succeeding
    #[test]
    #[should_panic]
    fn illegal_action_panics() {
        let t = Tree::deal(Variant::Three);
        t.play(Action::Fold);
    }
}
