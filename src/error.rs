use strum::VariantNames;
use thiserror::Error;

use crate::{algo::Algorithm, env::State};

/// Crate-wide result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State {state} is outside of the {rows}x{cols} grid")]
    OutOfBounds {
        state: State,
        rows: usize,
        cols: usize,
    },

    #[error("Shape mismatch: expected {expected:?} (rows, cols), found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Grid has no cells")]
    EmptyGrid,

    #[error("Environment has no actions")]
    NoActions,

    #[error("Every cell of the grid is a wall")]
    NoOpenStates,

    #[error("Invalid layout token `{0}`")]
    InvalidLayoutToken(char),

    #[error("Invalid algorithm `{name}`. The options for algorithm are:\n{}", Algorithm::VARIANTS.join("\n"))]
    InvalidAlgorithm { name: String },

    #[error("Did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_display() {
        let e = Error::OutOfBounds {
            state: State::new(3, 1),
            rows: 2,
            cols: 2,
        };
        assert_eq!(e.to_string(), "State (3, 1) is outside of the 2x2 grid");
    }

    #[test]
    fn invalid_algorithm_lists_options() {
        let e = Error::InvalidAlgorithm {
            name: String::from("td_lambda"),
        };
        let s = e.to_string();
        assert!(s.starts_with("Invalid algorithm `td_lambda`"));
        for name in Algorithm::VARIANTS {
            assert!(s.contains(name), "usage mentions {name}");
        }
    }
}
