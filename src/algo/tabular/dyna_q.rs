use log::{debug, info, trace};
use rand::Rng;

use crate::{
    algo::Learner,
    assert_interval,
    env::Environment,
    error::Result,
    exploration::EpsilonGreedy,
    memory::{Exp, Model},
};

use super::{q_learning::q_learning_update, QTable, TdConfig};

/// Configuration for the [`DynaQ`] learner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynaQConfig {
    /// Parameters of the direct Q-learning updates
    pub td: TdConfig,
    /// Simulated updates after each episode
    ///
    /// **Default**: `100`
    pub planning_steps: usize,
}

impl Default for DynaQConfig {
    fn default() -> Self {
        Self {
            td: TdConfig::default(),
            planning_steps: 100,
        }
    }
}

/// Q-learning combined with planning on a learned model
///
/// Every real transition updates the Q-table directly and is recorded in a [`Model`]. After each episode the
/// agent replays `planning_steps` simulated transitions, each one a uniformly drawn experienced state-action pair
/// with its most frequently observed outcome.
pub struct DynaQ<'a, E: Environment> {
    env: &'a E,
    q_table: QTable,
    exploration: EpsilonGreedy,
    config: DynaQConfig,
}

impl<'a, E: Environment> DynaQ<'a, E> {
    /// **Panics** if `alpha`, `gamma` or `epsilon` is not in the interval `[0,1]`
    pub fn new(env: &'a E, config: DynaQConfig) -> Self {
        assert_interval!(config.td.alpha, 0.0, 1.0);
        assert_interval!(config.td.gamma, 0.0, 1.0);
        Self {
            env,
            q_table: QTable::for_env(env),
            exploration: EpsilonGreedy::new(config.td.epsilon),
            config,
        }
    }

    fn learn(&mut self, exp: &Exp) {
        q_learning_update(&mut self.q_table, exp, self.config.td.alpha, self.config.td.gamma);
    }

    /// One episode of real experience, feeding the model
    fn episode<R: Rng + ?Sized>(&mut self, model: &mut Model, rng: &mut R) -> Result<()> {
        let env = self.env;
        let actions = env.actions();
        let mut state = env.random_open_state(rng)?;
        for _ in 0..self.config.td.num_steps {
            let action = self.exploration.act(self.q_table.row(state), rng);
            let (next_state, reward) = env.step(state, actions[action], rng)?;
            let exp = Exp {
                state,
                action,
                reward,
                next_state,
            };
            self.learn(&exp);
            model.record(&exp);
            state = next_state;
        }

        Ok(())
    }

    /// Replay simulated transitions drawn from the model
    fn plan<R: Rng + ?Sized>(&mut self, model: &Model, rng: &mut R) {
        for _ in 0..self.config.planning_steps {
            let Some(exp) = model.sample(rng) else {
                return;
            };
            self.learn(&exp);
        }
    }

    /// Run the learning loop with a caller provided model
    ///
    /// The model keeps growing across calls, which lets callers inspect what was experienced.
    pub fn solve_with_model<R: Rng + ?Sized>(&mut self, model: &mut Model, rng: &mut R) -> Result<&QTable> {
        for episode in 0..self.config.td.num_episodes {
            self.episode(model, rng)?;
            self.plan(model, rng);
            trace!("Dyna-Q episode {episode} done, model holds {} pairs", model.len());
        }

        debug!("Dyna-Q model holds {} state-action pairs", model.len());
        info!(
            "Dyna-Q finished {} episodes of {} steps with {} planning steps each",
            self.config.td.num_episodes, self.config.td.num_steps, self.config.planning_steps
        );
        Ok(&self.q_table)
    }
}

impl<'a, E: Environment> Learner for DynaQ<'a, E> {
    /// Learn with a fresh model that is dropped once learning is done
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable> {
        let mut model = Model::new();
        self.solve_with_model(&mut model, rng)
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn into_q_table(self) -> QTable {
        self.q_table
    }
}
