//! Virtual terminal backend for shell rendering tests.
//!
//! Frames drawn by `fitsyn_tui::draw` are encoded as ANSI, fed through a
//! `vt100::Parser`, and read back as screen text or cell positions.

use std::fmt::{self, Write as _};
use std::io;

use crossterm::Command as _;
use crossterm::{cursor, style, terminal};
use ratatui::backend::{Backend, ClearType, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};
use ratatui::style::{Color, Style};

pub struct VT100Backend {
    parser: vt100::Parser,
    width: u16,
    height: u16,
}

impl VT100Backend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: vt100::Parser::new(height, width, 0),
            width,
            height,
        }
    }

    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Text of one screen row with trailing blanks removed.
    pub fn row(&self, index: u16) -> String {
        self.parser
            .screen()
            .rows(0, self.width)
            .nth(usize::from(index))
            .map(|row| row.trim_end().to_string())
            .unwrap_or_default()
    }

    /// Screen cell `(column, row)` where `needle` first starts.
    ///
    /// Works on the cell grid, so wide glyphs earlier in the row do not
    /// shift the reported column.
    pub fn find(&self, needle: &str) -> Option<(u16, u16)> {
        let screen = self.parser.screen();
        (0..self.height).find_map(|y| {
            let mut line = String::new();
            let mut starts = Vec::new();
            for x in 0..self.width {
                let Some(cell) = screen.cell(y, x) else {
                    continue;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                starts.push((line.len(), x));
                let text = cell.contents();
                if text.is_empty() {
                    line.push(' ');
                } else {
                    line.push_str(&text);
                }
            }
            let byte = line.find(needle)?;
            starts
                .iter()
                .find(|(start, _)| *start == byte)
                .map(|&(_, x)| (x, y))
        })
    }

    fn feed(&mut self, command: impl crossterm::Command) {
        let mut ansi = String::new();
        let _ = command.write_ansi(&mut ansi);
        self.parser.process(ansi.as_bytes());
    }
}

impl fmt::Display for VT100Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.contents())
    }
}

/// Reset, then foreground and background, as one SGR run.
fn write_style(ansi: &mut String, cell_style: Style) {
    let _ = style::SetAttribute(style::Attribute::Reset).write_ansi(ansi);
    if let Some(fg) = cell_style.fg.and_then(ansi_color) {
        let _ = style::SetForegroundColor(fg).write_ansi(ansi);
    }
    if let Some(bg) = cell_style.bg.and_then(ansi_color) {
        let _ = style::SetBackgroundColor(bg).write_ansi(ansi);
    }
}

impl Backend for VT100Backend {
    type Error = io::Error;

    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        let mut ansi = String::new();
        let mut cursor_at = None;
        let mut current = None;

        for (x, y, cell) in content {
            if cursor_at != Some((x, y)) {
                let _ = cursor::MoveTo(x, y).write_ansi(&mut ansi);
            }
            let cell_style = cell.style();
            if current != Some(cell_style) {
                write_style(&mut ansi, cell_style);
                current = Some(cell_style);
            }
            let _ = ansi.write_str(cell.symbol());
            cursor_at = Some((x + 1, y));
        }

        self.parser.process(ansi.as_bytes());
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        let (row, column) = self.parser.screen().cursor_position();
        Ok(Position::new(column, row))
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        let Position { x, y } = position.into();
        self.feed(cursor::MoveTo(x, y));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.feed(terminal::Clear(terminal::ClearType::All));
        Ok(())
    }

    fn clear_region(&mut self, _clear_type: ClearType) -> io::Result<()> {
        self.clear()
    }

    fn size(&self) -> io::Result<Size> {
        Ok(Size::new(self.width, self.height))
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        Ok(WindowSize {
            columns_rows: Size::new(self.width, self.height),
            pixels: Size::new(self.width * 8, self.height * 16),
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn ansi_color(color: Color) -> Option<style::Color> {
    use style::Color as Ansi;

    let mapped = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => Ansi::Rgb { r, g, b },
        Color::Indexed(i) => Ansi::AnsiValue(i),
        Color::Black => Ansi::Black,
        Color::Red => Ansi::DarkRed,
        Color::Green => Ansi::DarkGreen,
        Color::Yellow => Ansi::DarkYellow,
        Color::Blue => Ansi::DarkBlue,
        Color::Magenta => Ansi::DarkMagenta,
        Color::Cyan => Ansi::DarkCyan,
        Color::Gray => Ansi::Grey,
        Color::DarkGray => Ansi::DarkGrey,
        Color::LightRed => Ansi::Red,
        Color::LightGreen => Ansi::Green,
        Color::LightYellow => Ansi::Yellow,
        Color::LightBlue => Ansi::Blue,
        Color::LightMagenta => Ansi::Magenta,
        Color::LightCyan => Ansi::Cyan,
        Color::White => Ansi::White,
    };
    Some(mapped)
}
