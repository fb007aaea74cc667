use std::mem;

use log::{debug, info};

use crate::{
    algo::Planner,
    assert_interval,
    ds::Grid,
    env::Environment,
    error::{Error, Result},
    util::max,
};

use super::{action_values, greedify, DpSolution, History};

/// Configuration for [`ValueIteration`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueIterationConfig {
    /// Discount factor, must be in `[0, 1]`
    ///
    /// **Default**: `0.99`
    pub gamma: f64,
    /// Maximum error allowed in the utility of any state
    ///
    /// Sweeping stops once no utility moves by `epsilon * (1 - gamma) / gamma` or more.
    ///
    /// **Default**: `0.001`
    pub epsilon: f64,
    /// Give up after this many sweeps
    ///
    /// **Default**: `None`
    pub max_iterations: Option<usize>,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            epsilon: 0.001,
            max_iterations: None,
        }
    }
}

impl ValueIterationConfig {
    /// The largest per-sweep change that counts as converged
    ///
    /// Falls back to `epsilon` itself when `gamma` is zero.
    pub fn threshold(&self) -> f64 {
        if self.gamma == 0.0 {
            self.epsilon
        } else {
            self.epsilon * (1.0 - self.gamma) / self.gamma
        }
    }
}

/// Value iteration over the full transition model
///
/// Repeats synchronous Bellman optimality backups
///
/// U'(s) = R(s) + γ max<sub>a</sub> Σ<sub>s'</sub> P(s'|s,a) U(s')
///
/// until the largest change of a sweep drops below [`ValueIterationConfig::threshold`].
pub struct ValueIteration<'a, E: Environment> {
    env: &'a E,
    config: ValueIterationConfig,
}

impl<'a, E: Environment> ValueIteration<'a, E> {
    /// **Panics** if `gamma` is not in the interval `[0,1]` or `epsilon` is negative
    pub fn new(env: &'a E, config: ValueIterationConfig) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        assert!(config.epsilon >= 0.0, "`epsilon` must be non-negative");
        Self { env, config }
    }

    /// Back up every open state of `current` into `next`
    ///
    /// **Returns** the largest absolute change
    fn sweep(&self, current: &Grid<f64>, next: &mut Grid<f64>, history: &mut History) -> Result<f64> {
        let mut delta: f64 = 0.0;
        for state in self.env.states() {
            if self.env.is_wall(state) {
                next[state] = 0.0;
                history.record(state, 0.0);
                continue;
            }

            let best = max(&action_values(self.env, current, state));
            let utility = self.env.reward(state)? + self.config.gamma * best;
            delta = delta.max((utility - current[state]).abs());
            next[state] = utility;
            history.record(state, utility);
        }

        Ok(delta)
    }
}

impl<'a, E: Environment> Planner for ValueIteration<'a, E> {
    fn solve(self) -> Result<DpSolution> {
        let (rows, cols) = self.env.shape();
        let threshold = self.config.threshold();
        let mut utilities = Grid::filled(rows, cols, 0.0);
        let mut next = utilities.clone();
        let mut history = History::new(self.env.states());
        let mut iterations = 0;

        loop {
            if self.config.max_iterations.is_some_and(|max| iterations >= max) {
                return Err(Error::NotConverged { iterations });
            }

            let delta = self.sweep(&utilities, &mut next, &mut history)?;
            mem::swap(&mut utilities, &mut next);
            iterations += 1;
            debug!("Value iteration sweep {iterations}: delta {delta:.6}");

            if delta < threshold {
                break;
            }
        }

        info!("Value iteration converged after {iterations} sweeps");
        let policy = greedify(self.env, &utilities);
        Ok(DpSolution {
            utilities,
            policy,
            iterations,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use crate::{
        algo::dp::tests::two_by_two,
        env::{Action, Cell, GridConfig, GridWorld, RewardMap, State},
    };

    use super::*;

    #[test]
    fn zero_rewards_converge_to_zero() {
        let rewards = RewardMap {
            good: 0.0,
            bad: 0.0,
            neutral: 0.0,
            wall: 0.0,
        };
        let env = GridWorld::from_config(&GridConfig::default().with_rewards(rewards)).unwrap();
        let solution = ValueIteration::new(&env, ValueIterationConfig::default())
            .solve()
            .unwrap();

        assert_eq!(solution.iterations, 1);
        for (_, u) in solution.utilities.iter() {
            assert_float_eq!(*u, 0.0, abs <= 1e-12);
        }
    }

    #[test]
    fn two_by_two_scenario() {
        let env = two_by_two();
        let config = ValueIterationConfig {
            gamma: 0.9,
            epsilon: 1e-3,
            ..Default::default()
        };
        let solution = ValueIteration::new(&env, config).solve().unwrap();

        assert!(solution.iterations < 100, "Took {} sweeps", solution.iterations);
        assert_eq!(solution.policy[State::new(0, 0)], Some(Action::East));
        assert!(solution.utilities[State::new(0, 1)] > solution.utilities[State::new(0, 0)]);
        assert_eq!(
            solution.history.len(),
            solution.iterations + 1,
            "One entry per sweep plus the initial zero"
        );
    }

    #[test]
    fn walls_stay_at_zero() {
        let env = GridWorld::from_config(&GridConfig::default()).unwrap();
        let config = ValueIterationConfig {
            gamma: 0.9,
            ..Default::default()
        };
        let solution = ValueIteration::new(&env, config).solve().unwrap();

        for (state, cell) in env.cells().iter() {
            if *cell == Cell::Wall {
                assert_eq!(solution.utilities[state], 0.0);
                assert_eq!(solution.policy[state], None);
                assert!(solution.history.get(state).unwrap().iter().all(|&u| u == 0.0));
            } else {
                assert!(solution.policy[state].is_some());
            }
        }
    }

    #[test]
    fn gamma_zero_yields_the_rewards() {
        let env = two_by_two();
        let config = ValueIterationConfig {
            gamma: 0.0,
            ..Default::default()
        };
        let solution = ValueIteration::new(&env, config).solve().unwrap();

        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.utilities, *env.rewards());
    }

    #[test]
    fn iteration_cap() {
        let env = two_by_two();
        let config = ValueIterationConfig {
            gamma: 0.99,
            epsilon: 1e-9,
            max_iterations: Some(5),
        };
        let result = ValueIteration::new(&env, config).solve();

        assert!(matches!(result, Err(Error::NotConverged { iterations: 5 })));
    }
}
