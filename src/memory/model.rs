use std::collections::HashMap;

use rand::{seq::SliceRandom, Rng};

use crate::env::State;

use super::{Exp, StateAction};

/// An observed `(next_state, reward)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub next_state: State,
    pub reward: f64,
}

/// Histogram of the outcomes observed for one state-action pair
///
/// Outcomes are kept in the order they were first observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcomes {
    counts: Vec<(Outcome, u32)>,
}

impl Outcomes {
    fn record(&mut self, outcome: Outcome) {
        match self.counts.iter_mut().find(|(o, _)| *o == outcome) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((outcome, 1)),
        }
    }

    /// The most frequently observed outcome, ties going to the one seen first
    pub fn mode(&self) -> Option<Outcome> {
        self.counts
            .iter()
            .fold(None, |best: Option<&(Outcome, u32)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(o, _)| *o)
    }

    /// Number of times the pair was experienced
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, u32)> + '_ {
        self.counts.iter().copied()
    }
}

/// Learned model of the environment for Dyna-Q style planning
///
/// Maps each experienced state-action pair to the empirical distribution of its outcomes.
/// Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct Model {
    table: HashMap<StateAction, Outcomes>,
    keys: Vec<StateAction>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a real transition
    pub fn record(&mut self, exp: &Exp) {
        let key = exp.key();
        let outcomes = self.table.entry(key).or_insert_with(|| {
            self.keys.push(key);
            Outcomes::default()
        });
        outcomes.record(Outcome {
            next_state: exp.next_state,
            reward: exp.reward,
        });
    }

    /// Number of distinct state-action pairs experienced
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: &StateAction) -> Option<&Outcomes> {
        self.table.get(key)
    }

    /// Simulate a transition: a uniformly random experienced pair with its most frequent outcome
    ///
    /// **Returns** `None` if nothing has been recorded yet
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Exp> {
        let key = *self.keys.choose(rng)?;
        let outcome = self.table.get(&key)?.mode()?;
        Some(Exp {
            state: key.state,
            action: key.action,
            reward: outcome.reward,
            next_state: outcome.next_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn exp(state: (usize, usize), action: usize, next: (usize, usize), reward: f64) -> Exp {
        Exp {
            state: state.into(),
            action,
            reward,
            next_state: next.into(),
        }
    }

    #[test]
    fn model_grows_per_distinct_pair() {
        let steps = [
            exp((0, 0), 2, (0, 1), 1.0),
            exp((0, 0), 2, (0, 0), -0.04),
            exp((0, 0), 2, (0, 1), 1.0),
            exp((0, 1), 0, (0, 1), 1.0),
            exp((0, 0), 3, (0, 0), -0.04),
            exp((0, 1), 0, (0, 1), 1.0),
        ];

        let mut model = Model::new();
        for step in &steps {
            model.record(step);
        }

        assert_eq!(model.len(), 3, "One entry per distinct pair");
        let counts = [
            (StateAction::new(State::new(0, 0), 2), 3),
            (StateAction::new(State::new(0, 1), 0), 2),
            (StateAction::new(State::new(0, 0), 3), 1),
        ];
        for (key, n) in counts {
            assert_eq!(model.get(&key).unwrap().total(), n, "Counts for {key:?}");
        }
        assert_eq!(
            model.get(&counts[0].0).unwrap().iter().count(),
            2,
            "Two distinct outcomes"
        );
    }

    #[test]
    fn model_never_shrinks() {
        let mut model = Model::new();
        let mut rng = StdRng::seed_from_u64(0);
        model.record(&exp((1, 1), 0, (0, 1), 0.0));
        for _ in 0..10 {
            model.sample(&mut rng);
        }
        model.record(&exp((1, 1), 0, (1, 1), 0.0));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get(&StateAction::new(State::new(1, 1), 0)).unwrap().total(), 2);
    }

    #[test]
    fn outcomes_mode() {
        let mut outcomes = Outcomes::default();
        let a = Outcome {
            next_state: State::new(0, 0),
            reward: 0.0,
        };
        let b = Outcome {
            next_state: State::new(0, 1),
            reward: 1.0,
        };
        assert_eq!(outcomes.mode(), None);

        outcomes.record(a);
        outcomes.record(b);
        assert_eq!(outcomes.mode(), Some(a), "Ties go to the first observed");

        outcomes.record(b);
        assert_eq!(outcomes.mode(), Some(b));
    }

    #[test]
    fn sample_replays_the_mode() {
        let mut model = Model::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(model.sample(&mut rng).is_none());

        model.record(&exp((0, 0), 1, (1, 0), -0.04));
        model.record(&exp((0, 0), 1, (0, 0), -0.04));
        model.record(&exp((0, 0), 1, (1, 0), -0.04));

        for _ in 0..20 {
            let sim = model.sample(&mut rng).unwrap();
            assert_eq!(sim, exp((0, 0), 1, (1, 0), -0.04));
        }
    }
}
