use std::{fs, io::Write, path::Path};

use crate::{algo::dp::History, error::Result};

/// Write the per-sweep history as CSV
///
/// The header holds the stringified states, e.g. `(0, 1)`, in row-major order, and each following record holds
/// one sweep, starting with the initial zeros.
pub fn write_history<W: Write>(history: &History, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(history.iter().map(|(state, _)| state.to_string()))?;

    for sweep in 0..history.len() {
        let record = history.iter().map(|(_, values)| {
            values
                .get(sweep)
                .map(f64::to_string)
                .unwrap_or_default()
        });
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// [`write_history`] to a file, creating its parent directories first
pub fn write_history_to_path(history: &History, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    write_history(history, fs::File::create(path)?)
}

#[cfg(test)]
mod tests {
    use crate::env::State;

    use super::*;

    #[test]
    fn history_csv() {
        let mut history = History::new([State::new(0, 0), State::new(0, 1)]);
        history.record(State::new(0, 0), -0.04);
        history.record(State::new(0, 1), 1.0);
        history.record(State::new(0, 0), 0.5);
        history.record(State::new(0, 1), 1.9);

        let mut buf = Vec::new();
        write_history(&history, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "\"(0, 0)\",\"(0, 1)\"\n0,0\n-0.04,1\n0.5,1.9\n");
    }
}
