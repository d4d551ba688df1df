//! Line-based page layout with clickable spans.
//!
//! Pages are built as a column of unwrapped lines. Controls remember the
//! line and column span they occupy so the renderer can record hit regions
//! after scrolling the focused control into view.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use fitsyn_engine::hit::{ClickTarget, HitMap};
use fitsyn_types::sanitize_terminal_text;
use fitsyn_types::ui::Region;

/// Blank lines kept between the focused control and the viewport edge.
const SCROLL_CONTEXT: usize = 2;

#[derive(Debug, Clone, Copy)]
struct LineTarget {
    line: usize,
    x: u16,
    width: u16,
    target: ClickTarget,
}

/// One piece of a control row.
pub(crate) struct Piece {
    pub span: Span<'static>,
    pub target: Option<ClickTarget>,
    pub focused: bool,
}

impl Piece {
    pub fn text(span: Span<'static>) -> Self {
        Self {
            span,
            target: None,
            focused: false,
        }
    }

    pub fn control(span: Span<'static>, target: ClickTarget, focused: bool) -> Self {
        Self {
            span,
            target: Some(target),
            focused,
        }
    }
}

#[derive(Default)]
pub(crate) struct PageBuilder {
    lines: Vec<Line<'static>>,
    targets: Vec<LineTarget>,
    focus_line: Option<usize>,
    cursor: Option<(usize, u16)>,
}

impl PageBuilder {
    pub fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    pub fn line(&mut self, line: impl Into<Line<'static>>) {
        self.lines.push(line.into());
    }

    /// A row of spans, some of them clickable.
    pub fn row(&mut self, pieces: Vec<Piece>) {
        let line = self.lines.len();
        let mut x: u16 = 0;
        let mut spans = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let width = piece.span.content.width() as u16;
            if let Some(target) = piece.target {
                self.targets.push(LineTarget {
                    line,
                    x,
                    width,
                    target,
                });
            }
            if piece.focused {
                self.focus_line = Some(line);
            }
            x = x.saturating_add(width);
            spans.push(piece.span);
        }
        self.lines.push(Line::from(spans));
    }

    /// A whole line that acts as one control.
    pub fn control_line(&mut self, line: Line<'static>, target: ClickTarget, focused: bool) {
        let index = self.lines.len();
        self.targets.push(LineTarget {
            line: index,
            x: 0,
            width: line.width() as u16,
            target,
        });
        if focused {
            self.focus_line = Some(index);
        }
        self.lines.push(line);
    }

    /// Place the terminal cursor at column `x` of the most recent line.
    pub fn cursor_on_last(&mut self, x: u16) {
        if let Some(line) = self.lines.len().checked_sub(1) {
            self.cursor = Some((line, x));
        }
    }

    /// Scroll so the focused line is visible, render, and record regions
    /// for every visible control.
    pub fn render(self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let height = usize::from(area.height);
        let offset = scroll_offset(self.focus_line, self.lines.len(), height);

        let paragraph = Paragraph::new(self.lines).scroll((offset as u16, 0));
        frame.render_widget(paragraph, area);

        let visible = offset..offset + height;
        for t in &self.targets {
            if !visible.contains(&t.line) || t.x >= area.width {
                continue;
            }
            let width = t.width.min(area.width - t.x);
            let y = area.y + (t.line - offset) as u16;
            hits.record(Region::new(area.x + t.x, y, width, 1), t.target);
        }
        if let Some((line, x)) = self.cursor
            && visible.contains(&line)
            && x < area.width
        {
            frame.set_cursor_position((area.x + x, area.y + (line - offset) as u16));
        }
    }
}

fn scroll_offset(focus: Option<usize>, total: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    let max = total - height;
    match focus {
        Some(line) => (line + 1 + SCROLL_CONTEXT).saturating_sub(height).min(max),
        None => 0,
    }
}

/// A centred column no wider than `max_width`.
#[must_use]
pub(crate) fn centered_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Trim `raw` to `max` display columns, ending with an ellipsis when cut.
#[must_use]
pub(crate) fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    if raw.width() <= max {
        return raw.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in raw.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Like [`truncate_with_ellipsis`], for text from accounts, the identity
/// backend or a typed path. Control sequences are stripped first.
#[must_use]
pub(crate) fn untrusted_line(raw: &str, max: usize) -> String {
    truncate_with_ellipsis(&sanitize_terminal_text(raw), max)
}
