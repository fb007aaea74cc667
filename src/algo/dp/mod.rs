pub mod policy_iteration;
pub mod value_iteration;

use std::collections::{btree_map, BTreeMap};

pub use policy_iteration::{PolicyIteration, PolicyIterationConfig};
pub use value_iteration::{ValueIteration, ValueIterationConfig};

use crate::{
    ds::Grid,
    env::{Action, Environment, State},
    util::argmax,
};

/// Per-state record of the utility after every sweep
///
/// Every state starts with a single `0.0` entry. Walls log `0.0` on every sweep, so all
/// series have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    series: BTreeMap<State, Vec<f64>>,
}

impl History {
    /// An initial zero entry for each of `states`
    pub fn new(states: impl IntoIterator<Item = State>) -> Self {
        Self {
            series: states.into_iter().map(|s| (s, vec![0.0])).collect(),
        }
    }

    pub fn record(&mut self, state: State, value: f64) {
        self.series.entry(state).or_insert_with(|| vec![0.0]).push(value);
    }

    pub fn get(&self, state: State) -> Option<&[f64]> {
        self.series.get(&state).map(Vec::as_slice)
    }

    /// Number of recorded values per state, including the initial zero
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// States in row-major order with their series
    pub fn iter(&self) -> btree_map::Iter<'_, State, Vec<f64>> {
        self.series.iter()
    }

    /// Series keyed by the stringified state, e.g. `"(0, 1)"`
    pub fn to_named(&self) -> BTreeMap<String, Vec<f64>> {
        self.series
            .iter()
            .map(|(s, values)| (s.to_string(), values.clone()))
            .collect()
    }
}

/// Output of the dynamic programming solvers
#[derive(Debug, Clone)]
pub struct DpSolution {
    pub utilities: Grid<f64>,
    /// Greedy action per open state, `None` on walls
    pub policy: Grid<Option<Action>>,
    /// Number of sweeps performed
    pub iterations: usize,
    pub history: History,
}

/// One-step lookahead Σ<sub>s'</sub> P(s'|s,a) U(s')
pub(crate) fn lookahead<E: Environment>(env: &E, utilities: &Grid<f64>, state: State, action: Action) -> f64 {
    env.transition_model(state, action)
        .expectation(|next| utilities[next])
}

/// Lookahead of every configured action in `state`, in action order
pub(crate) fn action_values<E: Environment>(env: &E, utilities: &Grid<f64>, state: State) -> Vec<f64> {
    env.actions()
        .iter()
        .map(|&a| lookahead(env, utilities, state, a))
        .collect()
}

/// The greedy policy with respect to `utilities`
///
/// Ties go to the action that comes first in the environment's action order.
pub(crate) fn greedify<E: Environment>(env: &E, utilities: &Grid<f64>) -> Grid<Option<Action>> {
    let (rows, cols) = env.shape();
    let actions = env.actions();
    Grid::from_fn(rows, cols, |s| {
        (!env.is_wall(s)).then(|| actions[argmax(&action_values(env, utilities, s))])
    })
}
