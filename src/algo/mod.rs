pub mod dp;
pub mod tabular;

use std::str::FromStr;

use rand::Rng;
use strum::{Display, EnumString, VariantArray, VariantNames};

use crate::{
    config::Config,
    ds::Grid,
    env::{Action, Environment},
    error::{Error, Result},
};

use self::{
    dp::{DpSolution, PolicyIteration, ValueIteration},
    tabular::{DynaQ, ExpectedSarsa, MonteCarlo, QLearning, QTable, Sarsa},
};

/// A solver that learns a [`QTable`] from sampled transitions
pub trait Learner {
    /// Run the full learning loop, drawing every random choice from `rng`
    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QTable>;

    /// The table learned so far
    fn q_table(&self) -> &QTable;

    fn into_q_table(self) -> QTable
    where
        Self: Sized;
}

/// A solver that computes utilities and a policy from the full transition model
pub trait Planner {
    fn solve(self) -> Result<DpSolution>
    where
        Self: Sized;
}

/// The implemented solvers, parsed from and displayed as their snake_case names
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantNames, VariantArray,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    ValueIteration,
    PolicyIteration,
    Sarsa,
    ExpectedSarsa,
    QLearning,
    MonteCarlo,
    DynaQ,
}

impl Algorithm {
    /// Parse an algorithm name
    ///
    /// Fails with [`Error::InvalidAlgorithm`], whose message lists every valid name
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidAlgorithm {
            name: name.to_owned(),
        })
    }

    /// Whether the algorithm sweeps the transition model rather than sampling it
    pub fn is_dynamic_programming(self) -> bool {
        matches!(self, Self::ValueIteration | Self::PolicyIteration)
    }
}

/// Output of [`run`]
#[derive(Debug, Clone)]
pub enum Solution {
    Planning(DpSolution),
    Learning(QTable),
}

impl Solution {
    /// State utilities, V(s) = max<sub>a</sub> Q(s,a) for a Q-table
    pub fn utilities(&self) -> Grid<f64> {
        match self {
            Self::Planning(solution) => solution.utilities.clone(),
            Self::Learning(q_table) => q_table.state_values(),
        }
    }

    /// Greedy action per open state, `None` on walls
    pub fn policy<E: Environment>(&self, env: &E) -> Grid<Option<Action>> {
        match self {
            Self::Planning(solution) => solution.policy.clone(),
            Self::Learning(q_table) => q_table.greedy_policy(env),
        }
    }

    pub fn as_planning(&self) -> Option<&DpSolution> {
        match self {
            Self::Planning(solution) => Some(solution),
            Self::Learning(_) => None,
        }
    }

    pub fn as_learning(&self) -> Option<&QTable> {
        match self {
            Self::Planning(_) => None,
            Self::Learning(q_table) => Some(q_table),
        }
    }
}

/// Solve `env` with `algorithm`, taking hyperparameters from `config`
///
/// `rng` is only drawn from by the sample-based algorithms.
pub fn run<E, R>(algorithm: Algorithm, env: &E, config: &Config, rng: &mut R) -> Result<Solution>
where
    E: Environment,
    R: Rng + ?Sized,
{
    fn learn<L: Learner, R: Rng + ?Sized>(mut learner: L, rng: &mut R) -> Result<Solution> {
        learner.solve(rng)?;
        Ok(Solution::Learning(learner.into_q_table()))
    }

    match algorithm {
        Algorithm::ValueIteration => ValueIteration::new(env, config.value_iteration)
            .solve()
            .map(Solution::Planning),
        Algorithm::PolicyIteration => PolicyIteration::new(env, config.policy_iteration)
            .solve()
            .map(Solution::Planning),
        Algorithm::Sarsa => learn(Sarsa::new(env, config.td), rng),
        Algorithm::ExpectedSarsa => learn(ExpectedSarsa::new(env, config.td), rng),
        Algorithm::QLearning => learn(QLearning::new(env, config.td), rng),
        Algorithm::MonteCarlo => learn(MonteCarlo::new(env, config.monte_carlo), rng),
        Algorithm::DynaQ => learn(DynaQ::new(env, config.dyna_q), rng),
    }
}
