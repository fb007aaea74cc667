use crate::{
    algo::{
        dp::{PolicyIterationConfig, ValueIterationConfig},
        tabular::{DynaQConfig, MonteCarloConfig, TdConfig},
    },
    env::GridConfig,
};

/// Everything needed to build an environment and run any of the solvers on it
///
/// Each solver only reads its own section.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub grid: GridConfig,
    pub value_iteration: ValueIterationConfig,
    pub policy_iteration: PolicyIterationConfig,
    /// Shared by SARSA, Expected SARSA and Q-learning
    pub td: TdConfig,
    pub monte_carlo: MonteCarloConfig,
    pub dyna_q: DynaQConfig,
}
