// Item list widget
// Shows the wheel's items with their slice colors

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::app::items::Item;
use crate::ui::widgets::item_color;

pub const EMPTY_MESSAGE: &str = "No items yet. Press 'a' to add one.";

pub struct ItemList<'a> {
    block: Option<Block<'a>>,
    items: &'a [Item],
    selected: Option<usize>,
    highlight_style: Style,
}

impl<'a> ItemList<'a> {
    pub fn new(items: &'a [Item]) -> Self {
        Self {
            block: None,
            items,
            selected: None,
            highlight_style: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }
}

impl<'a> Widget for ItemList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block.unwrap_or_default();
        let inner_area = block.inner(area);
        block.render(area, buf);

        if inner_area.height < 1 {
            return;
        }

        if self.items.is_empty() {
            buf.set_stringn(
                inner_area.x,
                inner_area.y,
                EMPTY_MESSAGE,
                usize::from(inner_area.width),
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(item_color(item))),
                    Span::raw(format!("{}. {}", i + 1, item.label)),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        state.select(self.selected);
        StatefulWidget::render(
            List::new(rows).highlight_style(self.highlight_style),
            inner_area,
            buf,
            &mut state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::items::ItemStore;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf.get(x, y).symbol.clone()).collect()
    }

    #[test]
    fn test_items_are_numbered_with_bullets() {
        let store = ItemStore::with_labels(["Ramen", "Pizza"]);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ItemList::new(store.items()).render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with("● 1. Ramen"));
        assert!(row_text(&buf, 1).starts_with("● 2. Pizza"));
        assert_eq!(buf.get(0, 0).fg, item_color(&store.items()[0]));
    }

    #[test]
    fn test_selected_row_is_highlighted() {
        let store = ItemStore::with_labels(["Ramen", "Pizza"]);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ItemList::new(store.items())
            .selected(Some(1))
            .render(area, &mut buf);

        assert_eq!(buf.get(4, 1).bg, Color::DarkGray);
        assert_ne!(buf.get(4, 0).bg, Color::DarkGray);
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);
        ItemList::new(&[]).render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with(EMPTY_MESSAGE));
    }
}
