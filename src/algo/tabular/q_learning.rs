use log::{info, trace};
use rand::Rng;

use crate::{
    algo::Learner,
    assert_interval,
    env::Environment,
    error::Result,
    exploration::EpsilonGreedy,
    memory::Exp,
};

use super::{td_update, QTable, TdConfig};

/// Off-policy temporal difference control
///
/// Behaves epsilon greedily but bootstraps from max<sub>a'</sub> Q(s', a'):
///
/// Q(s,a) ← Q(s,a) + α(r + γ max<sub>a'</sub> Q(s',a') - Q(s,a))
pub struct QLearning<'a, E: Environment> {
    env: &'a E,
    q_table: QTable,
    exploration: EpsilonGreedy,
    config: TdConfig,
}

impl<'a, E: Environment> QLearning<'a, E> {
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

    /// Learn from one real or simulated transition
    pub fn learn(&mut self, exp: &Exp) {
        q_learning_update(&mut self.q_table, exp, self.config.alpha, self.config.gamma);
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

impl<'a, E: Environment> Learner for QLearning<'a, E> {
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable> {
        for episode in 0..self.config.num_episodes {
            self.episode(rng)?;
            trace!("Q-learning episode {episode} done");
        }

        info!(
            "Q-learning finished {} episodes of {} steps",
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

/// The Q-learning update, shared with [`DynaQ`](super::DynaQ)
pub(crate) fn q_learning_update(q_table: &mut QTable, exp: &Exp, alpha: f64, gamma: f64) {
    let max_next_q = q_table.max_value(exp.next_state);
    td_update(q_table, exp, max_next_q, alpha, gamma);
}
