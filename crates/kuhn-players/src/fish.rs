use kuhn_game::Action;
use rand::seq::SliceRandom;

/// Chooses uniformly at random among the legal actions. Used by the
/// in-process reference bot and by tests that need a deterministic-ish
/// opponent without spawning a subprocess.
pub fn choose_randomly(legal: &[Action]) -> Action {
    let mut rng = rand::thread_rng();
    *legal
        .choose(&mut rng)
        .expect("non-empty legal actions conditional on being asked to move")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the chosen action is always a member of the legal set it was given
    #[test]
    fn choice_is_legal() {
        let legal = vec![Action::Bet, Action::Check];
        for _ in 0..32 {
            assert!(legal.contains(&choose_randomly(&legal)));
        }
    }
}
