use std::collections::HashMap;

use log::{info, trace};
use rand::Rng;

use crate::{
    algo::Learner,
    assert_interval,
    env::Environment,
    error::Result,
    exploration::EpsilonGreedy,
    memory::{Exp, StateAction},
};

use super::QTable;

/// Configuration for the [`MonteCarlo`] learner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    /// Discount factor, must be in `[0, 1]`
    ///
    /// **Default**: `0.99`
    pub gamma: f64,
    /// Exploration rate, must be in `[0, 1]`
    ///
    /// **Default**: `0.1`
    pub epsilon: f64,
    /// **Default**: `100_000`
    pub num_episodes: usize,
    /// Fixed episode horizon
    ///
    /// **Default**: `1000`
    pub num_steps: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            epsilon: 0.1,
            num_episodes: 100_000,
            num_steps: 1000,
        }
    }
}

/// On-policy first-visit Monte Carlo control
///
/// Each Q-value is the running average of the returns that followed the first visit of its
/// state-action pair in every episode so far:
///
/// Q<sub>n+1</sub> = (n Q<sub>n</sub> + G) / (n + 1)
pub struct MonteCarlo<'a, E: Environment> {
    env: &'a E,
    q_table: QTable,
    counts: HashMap<StateAction, u32>,
    exploration: EpsilonGreedy,
    config: MonteCarloConfig,
}

impl<'a, E: Environment> MonteCarlo<'a, E> {
    /// **Panics** if `gamma` or `epsilon` is not in the interval `[0,1]`
    pub fn new(env: &'a E, config: MonteCarloConfig) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            env,
            q_table: QTable::for_env(env),
            counts: HashMap::new(),
            exploration: EpsilonGreedy::new(config.epsilon),
            config,
        }
    }

    /// Number of first visits averaged into Q(s,a)
    pub fn count(&self, key: &StateAction) -> u32 {
        self.counts.get(key).copied().unwrap_or_default()
    }

    /// Roll out one episode with the epsilon greedy behaviour policy
    fn generate_episode<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Exp>> {
        let env = self.env;
        let actions = env.actions();
        let mut trajectory = Vec::with_capacity(self.config.num_steps);
        let mut state = env.random_open_state(rng)?;
        for _ in 0..self.config.num_steps {
            let action = self.exploration.act(self.q_table.row(state), rng);
            let (next_state, reward) = env.step(state, actions[action], rng)?;
            trajectory.push(Exp {
                state,
                action,
                reward,
                next_state,
            });
            state = next_state;
        }

        Ok(trajectory)
    }

    /// Update the table from a complete trajectory
    ///
    /// Walks the trajectory backwards accumulating the discounted return, and only the first occurrence of each
    /// state-action pair contributes.
    pub fn learn_episode(&mut self, trajectory: &[Exp]) {
        let mut first_visit = HashMap::with_capacity(trajectory.len());
        for (i, exp) in trajectory.iter().enumerate() {
            first_visit.entry(exp.key()).or_insert(i);
        }

        let mut g = 0.0;
        for (i, exp) in trajectory.iter().enumerate().rev() {
            g = self.config.gamma * g + exp.reward;

            let key = exp.key();
            if first_visit[&key] != i {
                continue;
            }

            let count = self.counts.entry(key).or_default();
            let q = self.q_table.get(exp.state, exp.action);
            let n = *count as f64;
            self.q_table
                .set(exp.state, exp.action, (q * n + g) / (n + 1.0));
            *count += 1;
        }
    }
}

impl<'a, E: Environment> Learner for MonteCarlo<'a, E> {
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable> {
        for episode in 0..self.config.num_episodes {
            let trajectory = self.generate_episode(rng)?;
            self.learn_episode(&trajectory);
            trace!("Monte Carlo episode {episode} done");
        }

        info!(
            "Monte Carlo finished {} episodes of {} steps, {} state-action pairs visited",
            self.config.num_episodes,
            self.config.num_steps,
            self.counts.len()
        );
        Ok(&self.q_table)
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn into_q_table(self) -> QTable {
        self.q_table
    }
}
