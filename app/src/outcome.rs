//! Strategies deciding the simulated results of mock calls.
//!
//! Everything random in the simulator goes through an [`OutcomeProvider`],
//! so tests can swap [`RandomOutcomes`] for [`FixedOutcomes`].

use rand::Rng;

pub trait OutcomeProvider: Send + Sync {
    /// Whether an attempt with the given success rate (`0.0..=1.0`) succeeds.
    fn succeeds(&self, success_rate: f64) -> bool;

    /// Index into a non-empty list of `len` choices.
    fn pick(&self, len: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcomes;

impl OutcomeProvider for RandomOutcomes {
    fn succeeds(&self, success_rate: f64) -> bool {
        rand::thread_rng().gen_bool(success_rate.clamp(0.0, 1.0))
    }

    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always succeeds (or always fails) and always picks the same choice.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcomes {
    pub success: bool,
    pub choice: usize,
}

impl FixedOutcomes {
    pub const fn succeeding() -> Self {
        Self {
            success: true,
            choice: 0,
        }
    }

    pub const fn failing() -> Self {
        Self {
            success: false,
            choice: 0,
        }
    }

    pub const fn with_choice(mut self, choice: usize) -> Self {
        self.choice = choice;
        self
    }
}

impl OutcomeProvider for FixedOutcomes {
    fn succeeds(&self, _success_rate: f64) -> bool {
        self.success
    }

    fn pick(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.choice % len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_outcomes_respect_extreme_rates() {
        let outcomes = RandomOutcomes;
        for _ in 0..100 {
            assert!(outcomes.succeeds(1.0));
            assert!(!outcomes.succeeds(0.0));
        }
    }

    #[test]
    fn test_random_pick_in_range() {
        let outcomes = RandomOutcomes;
        for _ in 0..100 {
            assert!(outcomes.pick(5) < 5);
        }
        assert_eq!(outcomes.pick(0), 0);
    }

    #[test]
    fn test_fixed_outcomes_wrap_choice() {
        let outcomes = FixedOutcomes::failing().with_choice(7);
        assert!(!outcomes.succeeds(1.0));
        assert_eq!(outcomes.pick(5), 2);
    }
}
