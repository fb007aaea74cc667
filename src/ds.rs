use std::ops::{Index, IndexMut};

use crate::{
    env::State,
    error::{Error, Result},
};

/// A fixed-shape, row-major 2-D table indexed by [`State`]
///
/// Indexing with a state outside of the grid panics, use [`Grid::get`] for a checked lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Construct a grid with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Construct a grid from nested rows
    ///
    /// Fails with [`Error::EmptyGrid`] if there are no cells, or [`Error::ShapeMismatch`] if the rows are ragged
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_rows == 0 || n_cols == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::ShapeMismatch {
                    expected: (n_rows, n_cols),
                    found: (n_rows, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Construct a grid by evaluating `f` at every state
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(State) -> T) -> Self {
        let data = (0..rows * cols)
            .map(|i| f(State::new(i / cols, i % cols)))
            .collect();
        Self { rows, cols, data }
    }

    /// **Returns** `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn contains(&self, state: State) -> bool {
        state.row < self.rows && state.col < self.cols
    }

    /// Checked lookup
    pub fn get(&self, state: State) -> Result<&T> {
        if self.contains(state) {
            Ok(&self.data[state.row * self.cols + state.col])
        } else {
            Err(Error::OutOfBounds {
                state,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Iterate over `(state, value)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (State, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (State::new(i / cols, i % cols), v))
    }

    /// Iterate over the rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.cols)
    }

    /// Apply `f` to every cell, keeping the shape
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    fn offset(&self, state: State) -> usize {
        assert!(
            self.contains(state),
            "State {state} is outside of the {}x{} grid",
            self.rows,
            self.cols
        );
        state.row * self.cols + state.col
    }
}

impl<T> Index<State> for Grid<T> {
    type Output = T;

    fn index(&self, index: State) -> &Self::Output {
        &self.data[self.offset(index)]
    }
}

impl<T> IndexMut<State> for Grid<T> {
    fn index_mut(&mut self, index: State) -> &mut Self::Output {
        let i = self.offset(index);
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_from_rows() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid[State::new(1, 0)], 4, "Row-major indexing");
        assert_eq!(
            grid.rows().map(<[i32]>::to_vec).collect::<Vec<_>>(),
            vec![vec![1, 2, 3], vec![4, 5, 6]]
        );
    }

    #[test]
    fn grid_rejects_bad_shapes() {
        assert!(matches!(
            Grid::<i32>::from_rows(vec![]),
            Err(Error::EmptyGrid)
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![1, 2], vec![3]]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn grid_checked_access() {
        let grid = Grid::filled(2, 2, 0.0);
        assert!(grid.get(State::new(1, 1)).is_ok());
        assert!(matches!(
            grid.get(State::new(2, 0)),
            Err(Error::OutOfBounds { rows: 2, cols: 2, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside of the 2x2 grid")]
    fn grid_index_panics_out_of_bounds() {
        let grid = Grid::filled(2, 2, 0.0);
        let _ = grid[State::new(0, 2)];
    }
}
