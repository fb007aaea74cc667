use crate::env::State;

/// A state paired with the index of an action taken in it
///
/// Used as the key of per-pair bookkeeping such as visit counts and the Dyna-Q model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateAction {
    pub state: State,
    pub action: usize,
}

impl StateAction {
    pub const fn new(state: State, action: usize) -> Self {
        Self { state, action }
    }
}

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp {
    /// The state of the environment before taking the action
    pub state: State,
    /// Index of the action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state of the environment after the action is taken
    pub next_state: State,
}

impl Exp {
    pub fn key(&self) -> StateAction {
        StateAction::new(self.state, self.action)
    }
}
