/// Solvers: dynamic programming planners and tabular learners
pub mod algo;

/// Aggregate configuration
pub mod config;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Crate-wide error type
pub mod error;

/// CSV export of sweep histories
pub mod export;

/// Exploration policies
pub mod exploration;

/// Experience records and the learned model
pub mod memory;

/// Text rendering of policies and utilities
pub mod render;

/// Terminal grid viewer
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
