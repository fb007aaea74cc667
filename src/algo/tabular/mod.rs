pub mod dyna_q;
pub mod expected_sarsa;
pub mod monte_carlo;
pub mod q_learning;
pub mod q_table;
pub mod sarsa;

pub use dyna_q::{DynaQ, DynaQConfig};
pub use expected_sarsa::ExpectedSarsa;
pub use monte_carlo::{MonteCarlo, MonteCarloConfig};
pub use q_learning::QLearning;
pub use q_table::QTable;
pub use sarsa::Sarsa;

use crate::memory::Exp;

/// Configuration shared by the temporal difference learners
/// ([`Sarsa`], [`ExpectedSarsa`], [`QLearning`] and the direct part of [`DynaQ`])
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TdConfig {
    /// Discount factor, must be in `[0, 1]`
    ///
    /// **Default**: `0.99`
    pub gamma: f64,
    /// Step size, must be in `[0, 1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Exploration rate of the epsilon greedy behaviour policy, must be in `[0, 1]`
    ///
    /// **Default**: `0.1`
    pub epsilon: f64,
    /// **Default**: `50_000`
    pub num_episodes: usize,
    /// Steps per episode
    ///
    /// **Default**: `100`
    pub num_steps: usize,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            alpha: 0.1,
            epsilon: 0.1,
            num_episodes: 50_000,
            num_steps: 100,
        }
    }
}

/// Q(s,a) += α(r + γ·`next_value` - Q(s,a))
pub(crate) fn td_update(q_table: &mut QTable, exp: &Exp, next_value: f64, alpha: f64, gamma: f64) {
    let q = q_table.get(exp.state, exp.action);
    let update = q + alpha * (exp.reward + gamma * next_value - q);
    q_table.set(exp.state, exp.action, update);
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        ds::Grid,
        env::{Action, Cell, GridWorld, State},
    };

    use super::*;

    /// A 1x2 corridor whose right cell pays +1
    pub(crate) fn corridor() -> GridWorld {
        let cells = Grid::from_rows(vec![vec![Cell::Neutral, Cell::Good]]).unwrap();
        let rewards = Grid::from_rows(vec![vec![-0.04, 1.0]]).unwrap();
        GridWorld::new(cells, rewards, vec![Action::North, Action::South, Action::East, Action::West])
            .unwrap()
    }

    pub(crate) const START: State = State::new(0, 0);
    pub(crate) const EAST: usize = 2;

    #[test]
    fn td_update_moves_towards_target() {
        let mut q = QTable::new(1, 2, 4);
        let exp = Exp {
            state: START,
            action: EAST,
            reward: 1.0,
            next_state: State::new(0, 1),
        };
        q.set(State::new(0, 1), 0, 2.0);

        td_update(&mut q, &exp, 2.0, 0.5, 0.5);
        // 0 + 0.5 * (1 + 0.5 * 2 - 0)
        assert_eq!(q.get(START, EAST), 1.0);
    }
}
