use std::fmt;

use rand::{seq::SliceRandom, Rng};
use rand_distr::{Distribution, WeightedIndex};

use crate::error::{Error, Result};

mod grid_world;

pub use grid_world::{Action, Cell, GridConfig, GridWorld, RewardMap};

/// A cell of the grid, addressed by `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    pub row: usize,
    pub col: usize,
}

impl State {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a `(d_row, d_col)` displacement
    ///
    /// **Returns** `None` if the result would have a negative coordinate
    pub fn offset(self, (d_row, d_col): (isize, isize)) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for State {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// The probability mass function P(s'|s,a) over next states
///
/// Next states are unique and kept in the order in which they were first reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionModel {
    outcomes: Vec<(State, f64)>,
}

impl TransitionModel {
    /// Add probability mass to `next_state`, accumulating onto an existing entry
    pub fn add(&mut self, next_state: State, prob: f64) {
        match self.outcomes.iter_mut().find(|(s, _)| *s == next_state) {
            Some((_, p)) => *p += prob,
            None => self.outcomes.push((next_state, prob)),
        }
    }

    /// Probability of landing in `next_state`
    pub fn probability(&self, next_state: State) -> f64 {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == next_state)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Total probability mass, 1 for a well-formed model
    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|(_, p)| p).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, f64)> + '_ {
        self.outcomes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Expected value of `f` over the next states
    pub fn expectation(&self, mut f: impl FnMut(State) -> f64) -> f64 {
        self.outcomes.iter().map(|&(s, p)| p * f(s)).sum()
    }

    /// Draw a next state according to the model
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> State {
        let dist = WeightedIndex::new(self.outcomes.iter().map(|(_, p)| *p))
            .expect("Transition model has positive total mass");
        self.outcomes[dist.sample(rng)].0
    }
}

/// Represents a finite, fully observable Markov decision process laid out on a grid
///
/// Solvers hold a reference to an environment and never mutate it.
pub trait Environment {
    /// **Returns** `(rows, cols)`
    fn shape(&self) -> (usize, usize);

    /// The ordered action set shared by every state
    ///
    /// Tabular solvers address actions by their index in this slice.
    fn actions(&self) -> &[Action];

    /// Reward for occupying `state`
    ///
    /// Fails with [`Error::OutOfBounds`] if the state is not in the grid
    fn reward(&self, state: State) -> Result<f64>;

    /// **Panics** if `state` is not in the grid
    fn is_wall(&self, state: State) -> bool;

    /// P(s'|s,a) for taking `action` in `state`
    fn transition_model(&self, state: State, action: Action) -> TransitionModel;

    /// Sample one transition
    ///
    /// **Returns** `(next_state, reward)`
    fn step<R: Rng + ?Sized>(&self, state: State, action: Action, rng: &mut R) -> Result<(State, f64)> {
        let next_state = self.transition_model(state, action).sample(rng);
        Ok((next_state, self.reward(next_state)?))
    }

    /// Every cell in row-major order
    fn states(&self) -> Vec<State> {
        let (rows, cols) = self.shape();
        (0..rows * cols)
            .map(|i| State::new(i / cols, i % cols))
            .collect()
    }

    /// Every non-wall cell in row-major order
    fn open_states(&self) -> Vec<State> {
        self.states()
            .into_iter()
            .filter(|&s| !self.is_wall(s))
            .collect()
    }

    /// Uniformly random non-wall state
    fn random_open_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State> {
        self.open_states()
            .choose(rng)
            .copied()
            .ok_or(Error::NoOpenStates)
    }
}
