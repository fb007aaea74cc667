use std::time::Duration;

use crossterm::event;

use crate::{
    ds::Grid,
    env::Cell,
    error::{Error, Result},
};

pub use self::grid_view::{cell_color, GridView};

mod grid_view;
mod tui;
mod util;

/// Show `labels` over the colored `cells` in the terminal until `q` or `Esc` is pressed
///
/// Restores the terminal on exit. Fails with [`Error::ShapeMismatch`] if the grids disagree in shape.
pub fn show(title: &str, labels: &Grid<String>, cells: &Grid<Cell>) -> Result<()> {
    if labels.shape() != cells.shape() {
        return Err(Error::ShapeMismatch {
            expected: cells.shape(),
            found: labels.shape(),
        });
    }

    let view = GridView {
        title,
        labels,
        cells,
    };
    let mut terminal = tui::init()?;

    let outcome = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| frame.render_widget(&view, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                if util::pressed_key(&event::read()?).is_some_and(util::is_quit) {
                    return Ok(());
                }
            }
        }
    })();

    tui::restore()?;
    outcome
}
