// Wheel widget
// Rasterizes the wheel into terminal cells with the pointer fixed at the top

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Widget},
};

use crate::app::items::Item;
use crate::ui::widgets::item_color;
use crate::wheel::geometry;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;
/// Distance of labels from the center, as a fraction of the radius
const LABEL_RADIUS: f64 = 0.62;
/// Radius of the center pin, as a fraction of the radius
const HUB_RADIUS: f64 = 0.12;

pub const POINTER_SYMBOL: &str = "▼";

pub struct WheelWidget<'a> {
    block: Option<Block<'a>>,
    items: &'a [Item],
    rotation: f64,
    highlight: Option<usize>,
}

impl<'a> WheelWidget<'a> {
    pub fn new(items: &'a [Item], rotation: f64) -> Self {
        Self {
            block: None,
            items,
            rotation,
            highlight: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Emphasizes the label of slice `index`
    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlight = index;
        self
    }
}

/// Placement of the wheel disc inside a drawing area
#[derive(Debug, Clone, Copy, PartialEq)]
struct Disc {
    center_x: f64,
    center_y: f64,
    radius_x: f64,
    radius_y: f64,
}

impl Disc {
    /// Fits the disc below the pointer row of `area`
    fn fit(area: Rect) -> Option<Self> {
        if area.width < 4 || area.height < 3 {
            return None;
        }

        let rows = f64::from(area.height - 1);
        let mut radius_y = rows / 2.0;
        let mut radius_x = radius_y * CELL_ASPECT;
        let half_width = f64::from(area.width) / 2.0;
        if radius_x > half_width {
            radius_x = half_width;
            radius_y = radius_x / CELL_ASPECT;
        }

        Some(Self {
            center_x: f64::from(area.x) + f64::from(area.width) / 2.0,
            center_y: f64::from(area.y) + 1.0 + rows / 2.0,
            radius_x,
            radius_y,
        })
    }

    /// Position of the cell center relative to the disc, in radii
    fn relative(&self, x: u16, y: u16) -> (f64, f64) {
        let dx = (f64::from(x) + 0.5 - self.center_x) / self.radius_x;
        let dy = (f64::from(y) + 0.5 - self.center_y) / self.radius_y;
        (dx, dy)
    }

    fn point_at(&self, angle: f64, fraction: f64) -> (f64, f64) {
        (
            self.center_x + angle.cos() * self.radius_x * fraction,
            self.center_y + angle.sin() * self.radius_y * fraction,
        )
    }
}

impl<'a> Widget for WheelWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let Some(disc) = Disc::fit(inner_area) else {
            return;
        };

        let count = self.items.len();
        let hub_sq = HUB_RADIUS * HUB_RADIUS;

        // Screen y grows downward, so atan2 yields clockwise angles with 0
        // along +x, matching the wheel geometry.
        for y in inner_area.top() + 1..inner_area.bottom() {
            for x in inner_area.left()..inner_area.right() {
                let (dx, dy) = disc.relative(x, y);
                let distance_sq = dx * dx + dy * dy;
                if distance_sq > 1.0 {
                    continue;
                }

                let color = if distance_sq <= hub_sq {
                    Color::White
                } else if count == 0 {
                    Color::DarkGray
                } else {
                    let angle = geometry::normalize(dy.atan2(dx));
                    let index = geometry::slice_at(self.rotation, count, angle);
                    item_color(&self.items[index])
                };
                buf.get_mut(x, y).set_symbol(" ").set_bg(color);
            }
        }

        if count > 0 {
            let slice = geometry::slice_angle(count);
            let max_width = (disc.radius_x * 0.7).max(1.0) as usize;

            for (i, item) in self.items.iter().enumerate() {
                let mid = self.rotation + (i as f64 + 0.5) * slice;
                let (label_x, label_y) = disc.point_at(mid, LABEL_RADIUS);

                let label: String = item.label.chars().take(max_width).collect();
                let width = Span::raw(label.as_str()).width() as f64;
                let x = (label_x - width / 2.0).round().max(f64::from(inner_area.left())) as u16;
                let y = label_y.floor() as u16;
                if y <= inner_area.top() || y >= inner_area.bottom() || x >= inner_area.right() {
                    continue;
                }

                let style = if self.highlight == Some(i) {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                };
                let room = usize::from(inner_area.right() - x);
                buf.set_stringn(x, y, &label, room, style);
            }
        }

        let pointer_x = disc.center_x.floor() as u16;
        if pointer_x < inner_area.right() {
            buf.get_mut(pointer_x, inner_area.top())
                .set_symbol(POINTER_SYMBOL)
                .set_style(Style::default().fg(Color::Yellow));
        }
    }
}
