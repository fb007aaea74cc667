use log::{info, trace};
use rand::Rng;

use crate::{
    algo::Learner,
    assert_interval,
    env::{Environment, State},
    error::Result,
    exploration::EpsilonGreedy,
    memory::Exp,
};

use super::{td_update, QTable, TdConfig};

/// Expected SARSA
///
/// Like [`Sarsa`](super::Sarsa), but bootstraps from the expected Q-value of the next state under the
/// epsilon greedy policy instead of a sampled next action.
pub struct ExpectedSarsa<'a, E: Environment> {
    env: &'a E,
    q_table: QTable,
    exploration: EpsilonGreedy,
    config: TdConfig,
}

impl<'a, E: Environment> ExpectedSarsa<'a, E> {
    /// **Panics** if `alpha`, `gamma` or `epsilon` is not in the interval `[0,1]`
    pub fn new(env: &'a E, config: TdConfig) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            env,
            q_table: QTable::for_env(env),
            exploration: EpsilonGreedy::new(config.epsilon),
            config,
        }
    }

    /// Σ<sub>a</sub> π(a|s) Q(s,a) for the epsilon greedy π
    fn expected_value(&self, state: State) -> f64 {
        let q_values = self.q_table.row(state);
        self.exploration
            .probabilities(q_values)
            .iter()
            .zip(q_values)
            .map(|(p, q)| p * q)
            .sum()
    }

    fn learn(&mut self, exp: &Exp) {
        let v = self.expected_value(exp.next_state);
        td_update(&mut self.q_table, exp, v, self.config.alpha, self.config.gamma);
    }

    fn episode<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let env = self.env;
        let actions = env.actions();
        let mut state = env.random_open_state(rng)?;
        for _ in 0..self.config.num_steps {
            let action = self.exploration.act(self.q_table.row(state), rng);
            let (next_state, reward) = env.step(state, actions[action], rng)?;
            self.learn(&Exp {
                state,
                action,
                reward,
                next_state,
            });
            state = next_state;
        }

        Ok(())
    }
}

impl<'a, E: Environment> Learner for ExpectedSarsa<'a, E> {
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable> {
        for episode in 0..self.config.num_episodes {
            self.episode(rng)?;
            trace!("Expected SARSA episode {episode} done");
        }

        info!(
            "Expected SARSA finished {} episodes of {} steps",
            self.config.num_episodes, self.config.num_steps
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

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::algo::tabular::tests::{corridor, EAST, START};

    use super::*;

    #[test]
    fn learns_the_corridor() {
        let env = corridor();
        let config = TdConfig {
            gamma: 0.9,
            alpha: 0.1,
            epsilon: 0.2,
            num_episodes: 300,
            num_steps: 20,
        };
        let mut agent = ExpectedSarsa::new(&env, config);
        let q = agent.solve(&mut StdRng::seed_from_u64(5)).unwrap();

        assert_eq!(q.best_action(START), EAST);
    }

    #[test]
    fn expectation_under_epsilon_greedy() {
        let env = corridor();
        let mut agent = ExpectedSarsa::new(
            &env,
            TdConfig {
                epsilon: 0.4,
                ..Default::default()
            },
        );
        let goal = State::new(0, 1);
        agent.q_table.row_mut(goal).copy_from_slice(&[4.0, 0.0, 2.0, -2.0]);

        // 0.1 * (4 + 0 + 2 - 2) + 0.6 * 4
        assert_float_eq!(agent.expected_value(goal), 2.8, abs <= 1e-12);
    }
}
