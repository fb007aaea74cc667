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

/// On-policy temporal difference control
///
/// The next action is drawn from the epsilon greedy behaviour policy before the update and is the one taken next:
///
/// Q(s,a) ← Q(s,a) + α(r + γ Q(s',a') - Q(s,a))
pub struct Sarsa<'a, E: Environment> {
    env: &'a E,
    q_table: QTable,
    exploration: EpsilonGreedy,
    config: TdConfig,
}

impl<'a, E: Environment> Sarsa<'a, E> {
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

    fn learn(&mut self, exp: &Exp, next_action: usize) {
        let next_q = self.q_table.get(exp.next_state, next_action);
        td_update(&mut self.q_table, exp, next_q, self.config.alpha, self.config.gamma);
    }

    fn episode<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let env = self.env;
        let actions = env.actions();
        let mut state = env.random_open_state(rng)?;
        let mut action = self.exploration.act(self.q_table.row(state), rng);

        for _ in 0..self.config.num_steps {
            let (next_state, reward) = env.step(state, actions[action], rng)?;
            let next_action = self.exploration.act(self.q_table.row(next_state), rng);

            self.learn(
                &Exp {
                    state,
                    action,
                    reward,
                    next_state,
                },
                next_action,
            );

            (state, action) = (next_state, next_action);
        }

        Ok(())
    }
}

impl<'a, E: Environment> Learner for Sarsa<'a, E> {
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable> {
        for episode in 0..self.config.num_episodes {
            self.episode(rng)?;
            trace!("SARSA episode {episode} done");
        }

        info!(
            "SARSA finished {} episodes of {} steps",
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
