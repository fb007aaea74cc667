mod exp;
mod model;

pub use exp::*;
pub use model::{Model, Outcome, Outcomes};
