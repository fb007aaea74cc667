use std::mem;

use log::{debug, info};

use crate::{
    algo::Planner,
    assert_interval,
    ds::Grid,
    env::{Action, Environment},
    error::{Error, Result},
    util::argmax,
};

use super::{action_values, lookahead, DpSolution, History};

/// Margin by which another action has to beat the current one, keeps round-off from flipping ties
const IMPROVEMENT_TOLERANCE: f64 = 1e-12;

/// Configuration for [`PolicyIteration`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyIterationConfig {
    /// Discount factor, must be in `[0, 1]`
    ///
    /// **Default**: `0.99`
    pub gamma: f64,
    /// Evaluation sweeps per round
    ///
    /// **Default**: `20`
    pub k: usize,
    /// Give up after this many evaluation/improvement rounds
    ///
    /// **Default**: `None`
    pub max_iterations: Option<usize>,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            k: 20,
            max_iterations: None,
        }
    }
}

/// Modified policy iteration
///
/// Alternates `k` sweeps of iterative policy evaluation
///
/// U(s) = R(s) + γ Σ<sub>s'</sub> P(s'|s,π(s)) U(s')
///
/// with greedy improvement until the policy is stable. Every open state starts with [`Action::South`], or the first
/// configured action if South is not among them, and a state only switches action when another one is strictly
/// better than the current one.
pub struct PolicyIteration<'a, E: Environment> {
    env: &'a E,
    config: PolicyIterationConfig,
}

impl<'a, E: Environment> PolicyIteration<'a, E> {
    /// **Panics** if `gamma` is not in the interval `[0,1]`
    pub fn new(env: &'a E, config: PolicyIterationConfig) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        Self { env, config }
    }

    fn starting_policy(&self) -> Grid<Option<Action>> {
        let (rows, cols) = self.env.shape();
        let actions = self.env.actions();
        let start = if actions.contains(&Action::South) {
            Action::South
        } else {
            actions[0]
        };
        Grid::from_fn(rows, cols, |s| (!self.env.is_wall(s)).then_some(start))
    }

    /// `k` synchronous sweeps under a fixed policy, warm started from `utilities`
    fn evaluate(
        &self,
        policy: &Grid<Option<Action>>,
        utilities: &mut Grid<f64>,
        scratch: &mut Grid<f64>,
        history: &mut History,
    ) -> Result<()> {
        for _ in 0..self.config.k {
            for state in self.env.states() {
                let Some(action) = policy[state] else {
                    scratch[state] = 0.0;
                    history.record(state, 0.0);
                    continue;
                };

                let utility =
                    self.env.reward(state)? + self.config.gamma * lookahead(self.env, utilities, state, action);
                scratch[state] = utility;
                history.record(state, utility);
            }
            mem::swap(utilities, scratch);
        }

        Ok(())
    }

    /// Greedy improvement in place
    ///
    /// **Returns** the number of states whose action changed
    fn improve(&self, policy: &mut Grid<Option<Action>>, utilities: &Grid<f64>) -> usize {
        let actions = self.env.actions();
        let mut changed = 0;
        for state in self.env.open_states() {
            let values = action_values(self.env, utilities, state);
            let best = argmax(&values);
            let current = policy[state]
                .and_then(|a| actions.iter().position(|&b| b == a))
                .unwrap_or(best);

            if values[best] > values[current] + IMPROVEMENT_TOLERANCE {
                policy[state] = Some(actions[best]);
                changed += 1;
            }
        }

        changed
    }
}

impl<'a, E: Environment> Planner for PolicyIteration<'a, E> {
    fn solve(self) -> Result<DpSolution> {
        let (rows, cols) = self.env.shape();
        let mut utilities = Grid::filled(rows, cols, 0.0);
        let mut scratch = utilities.clone();
        let mut policy = self.starting_policy();
        let mut history = History::new(self.env.states());
        let mut rounds = 0;

        loop {
            if self.config.max_iterations.is_some_and(|max| rounds >= max) {
                return Err(Error::NotConverged {
                    iterations: rounds * self.config.k,
                });
            }

            self.evaluate(&policy, &mut utilities, &mut scratch, &mut history)?;
            rounds += 1;

            let changed = self.improve(&mut policy, &utilities);
            debug!("Policy iteration round {rounds}: {changed} states changed action");
            if changed == 0 {
                break;
            }
        }

        let iterations = rounds * self.config.k;
        info!("Policy iteration stable after {rounds} rounds, {iterations} evaluation sweeps");
        Ok(DpSolution {
            utilities,
            policy,
            iterations,
            history,
        })
    }
}
