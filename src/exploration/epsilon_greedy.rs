use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::{assert_interval, util::argmax};

use super::Choice;

/// Epsilon greedy exploration policy with a fixed exploration rate
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedy {
    epsilon: f64,
    coin: Bernoulli,
}

impl EpsilonGreedy {
    /// **Panics** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Self {
        assert_interval!(epsilon, 0.0, 1.0);
        Self {
            epsilon,
            coin: Bernoulli::new(epsilon).expect("`epsilon` is a valid probability"),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Flip the exploration coin
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if self.coin.sample(rng) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Pick an action index given the Q-values of the current state
    ///
    /// Explores uniformly at random, exploits the first maximal entry.
    pub fn act<R: Rng + ?Sized>(&self, q_values: &[f64], rng: &mut R) -> usize {
        match self.choose(rng) {
            Choice::Explore => rng.gen_range(0..q_values.len()),
            Choice::Exploit => argmax(q_values),
        }
    }

    /// The probability of choosing each action under this policy
    ///
    /// Every action gets `epsilon / |A|`, the greedy action additionally gets `1 - epsilon`.
    pub fn probabilities(&self, q_values: &[f64]) -> Vec<f64> {
        let n = q_values.len() as f64;
        let mut probs = vec![self.epsilon / n; q_values.len()];
        probs[argmax(q_values)] += 1.0 - self.epsilon;
        probs
    }
}
