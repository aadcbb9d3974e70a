// Custom widgets for the wheel interface

pub mod item_list;
pub mod result_popup;
pub mod wheel;

use ratatui::style::Color;

use crate::app::items::Item;

pub use item_list::ItemList;
pub use result_popup::ResultPopup;
pub use wheel::WheelWidget;

/// Terminal color for an item's `#rrggbb` color, gray when unparsable
pub fn item_color(item: &Item) -> Color {
    parse_hex(&item.color).unwrap_or(Color::Gray)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::items::PALETTE;

    fn item_with_color(color: &str) -> Item {
        Item {
            id: "id".to_string(),
            label: "label".to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_palette_colors_parse() {
        for hex in PALETTE {
            assert!(matches!(item_color(&item_with_color(hex)), Color::Rgb(..)));
        }
        assert_eq!(
            item_color(&item_with_color("#ef4444")),
            Color::Rgb(0xef, 0x44, 0x44)
        );
    }

    #[test]
    fn test_bad_colors_fall_back_to_gray() {
        for bad in ["", "FF6B6B", "#FF6B", "#GG0000", "#ÿÿÿ"] {
            assert_eq!(item_color(&item_with_color(bad)), Color::Gray, "{bad}");
        }
    }
}
