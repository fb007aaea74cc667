use crate::{
    ds::Grid,
    env::{Action, Environment, State},
    util::{argmax, max},
};

/// Dense action-value table indexed by `(row, col, action)`
///
/// Action indices refer to the environment's ordered action set.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    rows: usize,
    cols: usize,
    n_actions: usize,
    values: Vec<f64>,
}

impl QTable {
    /// A table of zeros
    pub fn new(rows: usize, cols: usize, n_actions: usize) -> Self {
        Self {
            rows,
            cols,
            n_actions,
            values: vec![0.0; rows * cols * n_actions],
        }
    }

    /// A table of zeros shaped for `env`
    pub fn for_env<E: Environment>(env: &E) -> Self {
        let (rows, cols) = env.shape();
        Self::new(rows, cols, env.actions().len())
    }

    /// **Returns** `(rows, cols, n_actions)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.n_actions)
    }

    fn offset(&self, state: State) -> usize {
        assert!(
            state.row < self.rows && state.col < self.cols,
            "State {state} is outside of the {}x{} table",
            self.rows,
            self.cols
        );
        (state.row * self.cols + state.col) * self.n_actions
    }

    /// The Q-values of every action in `state`
    pub fn row(&self, state: State) -> &[f64] {
        let i = self.offset(state);
        &self.values[i..i + self.n_actions]
    }

    pub fn row_mut(&mut self, state: State) -> &mut [f64] {
        let i = self.offset(state);
        &mut self.values[i..i + self.n_actions]
    }

    pub fn get(&self, state: State, action: usize) -> f64 {
        self.row(state)[action]
    }

    pub fn set(&mut self, state: State, action: usize, value: f64) {
        self.row_mut(state)[action] = value;
    }

    /// Index of the best action in `state`, ties going to the first
    pub fn best_action(&self, state: State) -> usize {
        argmax(self.row(state))
    }

    /// max<sub>a</sub> Q(s, a)
    pub fn max_value(&self, state: State) -> f64 {
        max(self.row(state))
    }

    /// The state value V(s) = max<sub>a</sub> Q(s, a) of every cell
    pub fn state_values(&self) -> Grid<f64> {
        Grid::from_fn(self.rows, self.cols, |s| self.max_value(s))
    }

    /// The greedy policy with respect to this table, `None` on walls
    pub fn greedy_policy<E: Environment>(&self, env: &E) -> Grid<Option<Action>> {
        let actions = env.actions();
        Grid::from_fn(self.rows, self.cols, |s| {
            (!env.is_wall(s)).then(|| actions[self.best_action(s)])
        })
    }
}
