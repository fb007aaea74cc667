use ratatui::{prelude::*, widgets::*};

use crate::{
    ds::Grid,
    env::{Cell, State},
};

/// Background color of a cell tag
pub fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Wall => Color::DarkGray,
        Cell::Good => Color::Green,
        Cell::Bad => Color::Red,
        Cell::Neutral => Color::White,
    }
}

/// Draws one label per grid cell on a background colored by the cell's tag
pub struct GridView<'a> {
    pub title: &'a str,
    pub labels: &'a Grid<String>,
    pub cells: &'a Grid<Cell>,
}

impl Widget for &GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outer = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.title)
            .title_bottom(Line::from(" q / Esc : exit ").alignment(Alignment::Right));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let (rows, cols) = self.labels.shape();
        let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(inner);

        for ((row, row_area), labels) in row_areas.iter().enumerate().zip(self.labels.rows()) {
            let col_areas = Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(*row_area);
            for (col, (cell_area, label)) in col_areas.iter().zip(labels).enumerate() {
                let bg = cell_color(self.cells[State::new(row, col)]);
                let [_, text_area, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(*cell_area);

                Block::default().bg(bg).render(*cell_area, buf);
                Paragraph::new(label.as_str())
                    .style(Style::default().fg(Color::Black).bg(bg).bold())
                    .alignment(Alignment::Center)
                    .render(text_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_labels_over_tag_colors() {
        let labels = Grid::from_rows(vec![
            vec![String::from("↑"), String::new()],
            vec![String::from("1.000"), String::from("-1.000")],
        ])
        .unwrap();
        let cells = Grid::from_rows(vec![
            vec![Cell::Neutral, Cell::Wall],
            vec![Cell::Good, Cell::Bad],
        ])
        .unwrap();
        let view = GridView {
            title: "Utilities",
            labels: &labels,
            cells: &cells,
        };

        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        (&view).render(area, &mut buf);

        let text = buf.content.iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("Utilities"));
        assert!(text.contains("1.000"));
        assert!(text.contains("-1.000"));
        assert!(text.contains('↑'));

        // Top left pixel inside the border belongs to the neutral cell
        assert_eq!(buf.get(1, 1).bg, cell_color(cells[State::new(0, 0)]));
        assert_eq!(buf.get(38, 10).bg, Color::Red);
    }
}
