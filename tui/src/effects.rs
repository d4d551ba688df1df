//! Animation effects applied to already-rendered areas.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::theme::blend;

/// Strongest backdrop dimming, reached when the menu is fully open.
const BACKDROP_MAX_DIM: f32 = 0.6;

/// Position of the menu panel sliding in from the left edge.
///
/// `visible` is the fraction of the panel on screen; the returned rect is the
/// uncovered part, anchored at the panel's left edge.
#[must_use]
pub fn slide_from_left(panel: Rect, visible: f32) -> Rect {
    let t = ease_out_cubic(visible);
    let shown = (f32::from(panel.width) * t).round() as u16;
    let hidden = panel.width.saturating_sub(shown);
    Rect {
        x: panel.x,
        width: panel.width.saturating_sub(hidden),
        ..panel
    }
}

/// Dim every cell in `area` toward `backdrop` in proportion to `opacity`.
pub fn dim_backdrop(buf: &mut Buffer, area: Rect, backdrop: Color, opacity: f32) {
    let amount = opacity.clamp(0.0, 1.0) * BACKDROP_MAX_DIM;
    if amount <= 0.0 {
        return;
    }
    tint(buf, area, |cell_fg, cell_bg| {
        (blend(cell_fg, backdrop, amount), blend(cell_bg, backdrop, amount))
    });
}

/// Fade content in from `bg`; `opacity` 0 hides the text entirely.
pub fn fade_in(buf: &mut Buffer, area: Rect, bg: Color, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    tint(buf, area, |cell_fg, cell_bg| {
        (blend(bg, cell_fg, opacity), blend(bg, cell_bg, opacity))
    });
}

fn tint(buf: &mut Buffer, area: Rect, f: impl Fn(Color, Color) -> (Color, Color)) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                let (fg, bg) = f(cell.fg, cell.bg);
                cell.fg = fg;
                cell.bg = bg;
            }
        }
    }
}

pub(crate) fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[cfg(test)]
mod tests {
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use super::{dim_backdrop, fade_in, slide_from_left};

    #[test]
    fn slide_is_hidden_then_docked() {
        let panel = Rect::new(0, 0, 40, 10);
        assert_eq!(slide_from_left(panel, 0.0).width, 0);
        assert_eq!(slide_from_left(panel, 1.0), panel);
        assert!(slide_from_left(panel, 0.5).width > 20);
    }

    #[test]
    fn closed_backdrop_leaves_cells_alone() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        buf.set_style(
            area,
            ratatui::style::Style::default().bg(Color::Rgb(100, 100, 100)),
        );
        dim_backdrop(&mut buf, area, Color::Rgb(0, 0, 0), 0.0);
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(100, 100, 100));
        dim_backdrop(&mut buf, area, Color::Rgb(0, 0, 0), 1.0);
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(40, 40, 40));
    }

    #[test]
    fn transparent_content_matches_background() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        buf.set_style(
            area,
            ratatui::style::Style::default()
                .fg(Color::Rgb(200, 200, 200))
                .bg(Color::Rgb(20, 20, 20)),
        );
        fade_in(&mut buf, area, Color::Rgb(20, 20, 20), 0.0);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(20, 20, 20));
    }
}
