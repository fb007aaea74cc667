use rand::Rng;
use strum::VariantArray;

use crate::{
    ds::Grid,
    error::{Error, Result},
};

use super::{Environment, State, TransitionModel};

/// Probability of moving in the intended direction
pub const INTENDED_PROB: f64 = 0.8;

/// Probability of slipping to each side of the intended direction
pub const SLIP_PROB: f64 = 0.1;

/// Tag of a grid cell, determining walkability and reward
#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    Wall,
    Good,
    Bad,
    Neutral,
}

impl Cell {
    /// Parse a single layout character
    ///
    /// - `W` or `#` - wall
    /// - `G` - good
    /// - `R` or `B` - bad
    /// - `.` or `_` - neutral
    pub fn from_token(token: char) -> Result<Self> {
        match token.to_ascii_uppercase() {
            'W' | '#' => Ok(Cell::Wall),
            'G' => Ok(Cell::Good),
            'R' | 'B' => Ok(Cell::Bad),
            '.' | '_' => Ok(Cell::Neutral),
            _ => Err(Error::InvalidLayoutToken(token)),
        }
    }

    pub fn token(self) -> char {
        match self {
            Cell::Wall => 'W',
            Cell::Good => 'G',
            Cell::Bad => 'R',
            Cell::Neutral => '.',
        }
    }
}

/// One of the four compass moves
#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    North,
    South,
    East,
    West,
}

impl Action {
    /// `(d_row, d_col)` displacement
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::North => (-1, 0),
            Action::South => (1, 0),
            Action::East => (0, 1),
            Action::West => (0, -1),
        }
    }

    /// Inverse of [`Action::delta`]
    pub fn from_delta(delta: (isize, isize)) -> Option<Self> {
        match delta {
            (-1, 0) => Some(Action::North),
            (1, 0) => Some(Action::South),
            (0, 1) => Some(Action::East),
            (0, -1) => Some(Action::West),
            _ => None,
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Action; 2] {
        match self {
            Action::North => [Action::West, Action::East],
            Action::South => [Action::East, Action::West],
            Action::East => [Action::South, Action::North],
            Action::West => [Action::North, Action::South],
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Action::North => '↑',
            Action::South => '↓',
            Action::East => '→',
            Action::West => '←',
        }
    }
}

/// Reward received for occupying a cell of each tag
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardMap {
    pub good: f64,
    pub bad: f64,
    pub neutral: f64,
    pub wall: f64,
}

impl Default for RewardMap {
    fn default() -> Self {
        Self {
            good: 1.0,
            bad: -1.0,
            neutral: -0.04,
            wall: 0.0,
        }
    }
}

impl RewardMap {
    pub fn reward(&self, cell: Cell) -> f64 {
        match cell {
            Cell::Wall => self.wall,
            Cell::Good => self.good,
            Cell::Bad => self.bad,
            Cell::Neutral => self.neutral,
        }
    }
}

const DEFAULT_LAYOUT: &str = "
    G W G . . G
    . R . G W R
    . . R . G .
    . . . R . G
    . W W W R .
    . . . . . .
";

/// Static description of a grid world
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Cell tags, one inner vector per row
    pub cells: Vec<Vec<Cell>>,
    /// Reward per cell tag
    ///
    /// **Default**: good `+1`, bad `-1`, neutral `-0.04`, wall `0`
    pub rewards: RewardMap,
    /// Ordered action set
    ///
    /// **Default**: North, South, East, West
    pub actions: Vec<Action>,
}

impl Default for GridConfig {
    /// The 6x6 layout with scattered good and bad cells and an L of walls
    fn default() -> Self {
        Self::from_layout(DEFAULT_LAYOUT).expect("default layout is valid")
    }
}

impl GridConfig {
    /// Parse a text layout with one line per row, see [`Cell::from_token`]
    ///
    /// Whitespace within a line and blank lines are ignored. Rewards and actions take their defaults.
    pub fn from_layout(layout: &str) -> Result<Self> {
        let cells = layout
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Cell::from_token)
                    .collect::<Result<Vec<_>>>()
            })
            .filter(|row| !matches!(row, Ok(r) if r.is_empty()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            cells,
            rewards: RewardMap::default(),
            actions: Action::VARIANTS.to_vec(),
        })
    }

    /// Generate a random layout of `rows x cols` cells
    ///
    /// Each cell is independently good with probability 0.166, bad with 0.164, a wall with 0.17 and neutral otherwise.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let cells = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| match rng.gen::<f64>() {
                        p if p <= 0.166 => Cell::Good,
                        p if p <= 0.33 => Cell::Bad,
                        p if p <= 0.5 => Cell::Wall,
                        _ => Cell::Neutral,
                    })
                    .collect()
            })
            .collect();

        Self {
            cells,
            rewards: RewardMap::default(),
            actions: Action::VARIANTS.to_vec(),
        }
    }

    pub fn with_rewards(mut self, rewards: RewardMap) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }
}

/// A grid world with slippery moves
///
/// Each move goes in the intended direction with probability 0.8 and to either side with probability 0.1.
/// Moves that would leave the grid or enter a wall leave the agent where it is.
#[derive(Debug, Clone)]
pub struct GridWorld {
    cells: Grid<Cell>,
    rewards: Grid<f64>,
    actions: Vec<Action>,
}

impl GridWorld {
    /// Construct a grid world from explicit cell and reward grids
    ///
    /// Fails if the grids differ in shape or no actions are given
    pub fn new(cells: Grid<Cell>, rewards: Grid<f64>, actions: Vec<Action>) -> Result<Self> {
        if cells.shape() != rewards.shape() {
            return Err(Error::ShapeMismatch {
                expected: cells.shape(),
                found: rewards.shape(),
            });
        }
        if actions.is_empty() {
            return Err(Error::NoActions);
        }

        Ok(Self {
            cells,
            rewards,
            actions,
        })
    }

    /// Construct a grid world from a [`GridConfig`], deriving rewards from the cell tags
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let cells = Grid::from_rows(config.cells.clone())?;
        let rewards = cells.map(|&cell| config.rewards.reward(cell));
        Self::new(cells, rewards, config.actions.clone())
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn rewards(&self) -> &Grid<f64> {
        &self.rewards
    }

    /// Where a deterministic move from `state` towards `direction` ends up
    fn destination(&self, state: State, direction: Action) -> State {
        state
            .offset(direction.delta())
            .filter(|&next| self.cells.contains(next) && self.cells[next] != Cell::Wall)
            .unwrap_or(state)
    }
}

impl Environment for GridWorld {
    fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn reward(&self, state: State) -> Result<f64> {
        self.rewards.get(state).copied()
    }

    fn is_wall(&self, state: State) -> bool {
        self.cells[state] == Cell::Wall
    }

    fn transition_model(&self, state: State, action: Action) -> TransitionModel {
        let [left, right] = action.perpendicular();
        let mut model = TransitionModel::default();
        for (direction, prob) in [(action, INTENDED_PROB), (left, SLIP_PROB), (right, SLIP_PROB)] {
            model.add(self.destination(state, direction), prob);
        }

        model
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    use super::*;

    fn walled() -> GridWorld {
        let config = GridConfig::from_layout(
            "
            . . .
            . W .
            . . G
            ",
        )
        .unwrap();
        GridWorld::from_config(&config).unwrap()
    }

    #[test]
    fn default_config_layout() {
        let config = GridConfig::default();
        assert_eq!(config.cells.len(), 6);
        assert!(config.cells.iter().all(|row| row.len() == 6));
        assert_eq!(config.cells[0][1], Cell::Wall);
        assert_eq!(config.cells[1][1], Cell::Bad);
        assert_eq!(config.actions, Action::VARIANTS);
    }

    #[test]
    fn layout_rejects_unknown_tokens() {
        assert!(matches!(
            GridConfig::from_layout(". X"),
            Err(Error::InvalidLayoutToken('X'))
        ));
    }

    #[test]
    fn ragged_layout_is_a_shape_mismatch() {
        let config = GridConfig::from_layout(". .\n.").unwrap();
        assert!(matches!(
            GridWorld::from_config(&config),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn mismatched_reward_grid() {
        let cells = Grid::filled(2, 2, Cell::Neutral);
        let rewards = Grid::filled(2, 3, 0.0);
        assert!(matches!(
            GridWorld::new(cells, rewards, Action::VARIANTS.to_vec()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rewards_follow_tags() {
        let env = walled();
        assert_eq!(env.reward(State::new(2, 2)).unwrap(), 1.0);
        assert_eq!(env.reward(State::new(0, 0)).unwrap(), -0.04);
        assert_eq!(env.reward(State::new(1, 1)).unwrap(), 0.0);
    }

    #[test]
    fn reward_out_of_bounds() {
        let env = walled();
        assert!(matches!(
            env.reward(State::new(3, 0)),
            Err(Error::OutOfBounds { rows: 3, cols: 3, .. })
        ));
    }

    #[test]
    fn transition_model_normalized() {
        let env = GridWorld::from_config(&GridConfig::default()).unwrap();
        for state in env.open_states() {
            for &action in env.actions() {
                let model = env.transition_model(state, action);
                assert_float_eq!(model.total(), 1.0, abs <= 1e-12);
                for (next, _) in model.iter() {
                    assert!(!env.is_wall(next), "Never lands on a wall");
                }
            }
        }
    }

    #[test]
    fn open_interior_move() {
        let config = GridConfig::from_layout(". . .\n. . .\n. . .").unwrap();
        let env = GridWorld::from_config(&config).unwrap();
        let model = env.transition_model(State::new(1, 1), Action::North);
        assert_eq!(model.len(), 3);
        assert_float_eq!(model.probability(State::new(0, 1)), 0.8, abs <= 1e-12);
        assert_float_eq!(model.probability(State::new(1, 0)), 0.1, abs <= 1e-12);
        assert_float_eq!(model.probability(State::new(1, 2)), 0.1, abs <= 1e-12);
        assert_eq!(model.probability(State::new(1, 1)), 0.0, "No self transition");
    }

    #[rstest]
    #[case::wall_ahead(State::new(0, 1), Action::South, 0.8)]
    #[case::wall_and_boundary_to_the_sides(State::new(1, 0), Action::North, 0.2)]
    #[case::boundary_ahead(State::new(0, 1), Action::North, 0.8)]
    fn wall_absorption(#[case] state: State, #[case] action: Action, #[case] self_prob: f64) {
        let env = walled();
        let model = env.transition_model(state, action);
        assert_float_eq!(model.probability(state), self_prob, abs <= 1e-12);
        assert_float_eq!(model.total(), 1.0, abs <= 1e-12);
    }

    #[test]
    fn fully_blocked_corner() {
        let config = GridConfig::from_layout(". W\nW .").unwrap();
        let env = GridWorld::from_config(&config).unwrap();
        for &action in env.actions() {
            let model = env.transition_model(State::new(0, 0), action);
            assert_eq!(model.len(), 1);
            assert_float_eq!(model.probability(State::new(0, 0)), 1.0, abs <= 1e-12);
        }
    }

    #[test]
    fn step_samples_the_model() {
        let env = walled();
        let mut rng = StdRng::seed_from_u64(0);
        let state = State::new(2, 1);
        for _ in 0..100 {
            let (next, reward) = env.step(state, Action::East, &mut rng).unwrap();
            assert!(env.transition_model(state, Action::East).probability(next) > 0.0);
            assert_eq!(reward, env.reward(next).unwrap());
        }
    }

    #[test]
    fn random_layout_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GridConfig::random(20, 20, &mut rng);
        let env = GridWorld::from_config(&config).unwrap();
        assert_eq!(env.shape(), (20, 20));
        assert!(!env.open_states().is_empty());
    }

    #[test]
    fn perpendicular_matches_deltas() {
        for action in Action::VARIANTS {
            let (dr, dc) = action.delta();
            let [a, b] = action.perpendicular();
            assert_eq!(Action::from_delta((dc, dr)), Some(a));
            assert_eq!(Action::from_delta((-dc, -dr)), Some(b));
        }
    }
}
