use crate::{ds::Grid, env::Action};

/// Direction glyph per cell, blank on walls
pub fn policy_glyphs(policy: &Grid<Option<Action>>) -> Grid<String> {
    policy.map(|action| action.map(|a| a.glyph().to_string()).unwrap_or_default())
}

/// Utilities formatted with three decimals
pub fn utility_labels(utilities: &Grid<f64>) -> Grid<String> {
    utilities.map(|u| format!("{u:.3}"))
}

/// Plain text rendering with columns padded to the widest label
pub fn to_text(labels: &Grid<String>) -> String {
    let width = labels
        .iter()
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or_default();

    labels
        .rows()
        .map(|row| {
            row.iter()
                .map(|label| format!("{label:>width$}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::env::State;

    use super::*;

    #[test]
    fn glyphs() {
        let policy = Grid::from_rows(vec![
            vec![Some(Action::North), None],
            vec![Some(Action::East), Some(Action::West)],
        ])
        .unwrap();
        let glyphs = policy_glyphs(&policy);

        assert_eq!(glyphs[State::new(0, 0)], "↑");
        assert_eq!(glyphs[State::new(0, 1)], "");
        assert_eq!(glyphs[State::new(1, 0)], "→");
        assert_eq!(glyphs[State::new(1, 1)], "←");
    }

    #[test]
    fn labels() {
        let utilities = Grid::from_rows(vec![vec![0.0, -0.04], vec![1.23456, 10.0]]).unwrap();
        let labels = utility_labels(&utilities);

        assert_eq!(labels[State::new(0, 1)], "-0.040");
        assert_eq!(labels[State::new(1, 0)], "1.235");
        assert_eq!(to_text(&labels), " 0.000 -0.040\n 1.235 10.000");
    }
}
