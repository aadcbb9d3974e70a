// Result popup widget
// Announces the winning item over the wheel

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::app::items::Item;
use crate::ui::widgets::item_color;

pub const TITLE: &str = "🎉 Result";
pub const DISMISS_HINT: &str = "Enter / Esc to close";

pub struct ResultPopup<'a> {
    item: &'a Item,
}

impl<'a> ResultPopup<'a> {
    pub fn new(item: &'a Item) -> Self {
        Self { item }
    }

    /// Area the popup occupies when centered in `area`
    pub fn area(&self, area: Rect) -> Rect {
        let label_width = u16::try_from(Span::raw(self.item.label.as_str()).width())
            .unwrap_or(u16::MAX);
        let width = label_width
            .saturating_add(8)
            .max(DISMISS_HINT.len() as u16 + 4)
            .min(area.width);
        let height = 7.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl<'a> Widget for ResultPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = self.area(area);
        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.item.label.as_str(),
                Style::default()
                    .fg(item_color(self.item))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                DISMISS_HINT,
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .render(popup_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::items::ItemStore;

    #[test]
    fn test_popup_is_centered_and_shows_label() {
        let store = ItemStore::with_labels(["Sushi"]);
        let item = &store.items()[0];
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::filled(area, ratatui::buffer::Cell::default().set_symbol("x"));

        let popup = ResultPopup::new(item);
        let popup_area = popup.area(area);
        assert_eq!(popup_area.x * 2 + popup_area.width, area.width);
        popup.render(area, &mut buf);

        let rows: Vec<String> = (popup_area.top()..popup_area.bottom())
            .map(|y| {
                (popup_area.left()..popup_area.right())
                    .map(|x| buf.get(x, y).symbol.clone())
                    .collect()
            })
            .collect();
        assert!(rows.iter().any(|row| row.contains("Sushi")));
        assert!(rows.iter().any(|row| row.contains(DISMISS_HINT)));
        // Outside the popup is untouched
        assert_eq!(buf.get(0, 0).symbol, "x");
    }

    #[test]
    fn test_popup_fits_small_areas() {
        let store = ItemStore::with_labels(["A very long item label that will not fit"]);
        let popup = ResultPopup::new(&store.items()[0]);
        let area = Rect::new(0, 0, 10, 4);
        let popup_area = popup.area(area);
        assert!(popup_area.width <= area.width);
        assert!(popup_area.height <= area.height);
    }
}
