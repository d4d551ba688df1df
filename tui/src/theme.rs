//! Color palettes and glyphs for the FitSyn TUI.
//!
//! Dark mode uses the Kanagawa Wave palette, light mode Kanagawa Lotus. A
//! high-contrast override replaces both with named terminal colors. During a
//! theme transition the renderer blends from the previous palette.

use ratatui::style::{Color, Modifier, Style};

use fitsyn_types::Theme;
use fitsyn_types::ui::UiOptions;

/// Kanagawa Wave (dark).
mod wave {
    use super::Color;

    pub const BG: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const PRIMARY_DIM: Color = Color::Rgb(147, 138, 169); // springViolet1
    pub const ACCENT: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const SUCCESS: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const WARNING: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ERROR: Color = Color::Rgb(255, 93, 98); // peachRed
    pub const PEACH: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const BACKDROP: Color = Color::Rgb(0, 0, 0);
}

/// Kanagawa Lotus (light).
mod lotus {
    use super::Color;

    pub const BG: Color = Color::Rgb(242, 236, 188); // lotusWhite3
    pub const BG_PANEL: Color = Color::Rgb(231, 219, 160); // lotusWhite4
    pub const BG_HIGHLIGHT: Color = Color::Rgb(228, 215, 148); // lotusWhite5
    pub const BORDER: Color = Color::Rgb(160, 155, 132); // lotusGray3
    pub const TEXT_PRIMARY: Color = Color::Rgb(84, 84, 100); // lotusInk1
    pub const TEXT_SECONDARY: Color = Color::Rgb(67, 67, 108); // lotusInk2
    pub const TEXT_MUTED: Color = Color::Rgb(138, 137, 128); // lotusGray2
    pub const PRIMARY: Color = Color::Rgb(98, 76, 131); // lotusViolet4
    pub const PRIMARY_DIM: Color = Color::Rgb(118, 105, 145); // lotusViolet2
    pub const ACCENT: Color = Color::Rgb(77, 105, 155); // lotusBlue4
    pub const SUCCESS: Color = Color::Rgb(111, 137, 78); // lotusGreen
    pub const WARNING: Color = Color::Rgb(119, 113, 63); // lotusYellow
    pub const ERROR: Color = Color::Rgb(200, 64, 83); // lotusRed
    pub const PEACH: Color = Color::Rgb(204, 109, 0); // lotusOrange
    pub const BACKDROP: Color = Color::Rgb(60, 56, 40);
}

/// Resolved palette used by every draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub peach: Color,
    /// Color the menu backdrop dims the page toward.
    pub backdrop: Color,
}

impl Palette {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            bg: wave::BG,
            bg_panel: wave::BG_PANEL,
            bg_highlight: wave::BG_HIGHLIGHT,
            border: wave::BORDER,
            text_primary: wave::TEXT_PRIMARY,
            text_secondary: wave::TEXT_SECONDARY,
            text_muted: wave::TEXT_MUTED,
            primary: wave::PRIMARY,
            primary_dim: wave::PRIMARY_DIM,
            accent: wave::ACCENT,
            success: wave::SUCCESS,
            warning: wave::WARNING,
            error: wave::ERROR,
            peach: wave::PEACH,
            backdrop: wave::BACKDROP,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            bg: lotus::BG,
            bg_panel: lotus::BG_PANEL,
            bg_highlight: lotus::BG_HIGHLIGHT,
            border: lotus::BORDER,
            text_primary: lotus::TEXT_PRIMARY,
            text_secondary: lotus::TEXT_SECONDARY,
            text_muted: lotus::TEXT_MUTED,
            primary: lotus::PRIMARY,
            primary_dim: lotus::PRIMARY_DIM,
            accent: lotus::ACCENT,
            success: lotus::SUCCESS,
            warning: lotus::WARNING,
            error: lotus::ERROR,
            peach: lotus::PEACH,
            backdrop: lotus::BACKDROP,
        }
    }

    #[must_use]
    pub fn high_contrast(theme: Theme) -> Self {
        let (bg, fg, dim) = if theme.is_dark() {
            (Color::Black, Color::White, Color::Gray)
        } else {
            (Color::White, Color::Black, Color::DarkGray)
        };
        Self {
            bg,
            bg_panel: bg,
            bg_highlight: Color::DarkGray,
            border: dim,
            text_primary: fg,
            text_secondary: fg,
            text_muted: dim,
            primary: fg,
            primary_dim: dim,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            peach: Color::Yellow,
            backdrop: Color::Black,
        }
    }

    #[must_use]
    pub fn for_theme(theme: Theme, options: UiOptions) -> Self {
        if options.high_contrast {
            return Self::high_contrast(theme);
        }
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Field-wise blend toward `to`; `t = 0` is `self`, `t = 1` is `to`.
    #[must_use]
    pub fn blend(&self, to: &Self, t: f32) -> Self {
        Self {
            bg: blend(self.bg, to.bg, t),
            bg_panel: blend(self.bg_panel, to.bg_panel, t),
            bg_highlight: blend(self.bg_highlight, to.bg_highlight, t),
            border: blend(self.border, to.border, t),
            text_primary: blend(self.text_primary, to.text_primary, t),
            text_secondary: blend(self.text_secondary, to.text_secondary, t),
            text_muted: blend(self.text_muted, to.text_muted, t),
            primary: blend(self.primary, to.primary, t),
            primary_dim: blend(self.primary_dim, to.primary_dim, t),
            accent: blend(self.accent, to.accent, t),
            success: blend(self.success, to.success, t),
            warning: blend(self.warning, to.warning, t),
            error: blend(self.error, to.error, t),
            peach: blend(self.peach, to.peach, t),
            backdrop: blend(self.backdrop, to.backdrop, t),
        }
    }
}

/// The palette for `theme`, blended from `transition`'s starting theme while
/// a theme change is in progress.
#[must_use]
pub fn palette(theme: Theme, transition: Option<(Theme, f32)>, options: UiOptions) -> Palette {
    let target = Palette::for_theme(theme, options);
    match transition {
        Some((from, progress)) if !options.reduced_motion => {
            Palette::for_theme(from, options).blend(&target, progress)
        }
        _ => target,
    }
}

/// Linear RGB interpolation. Named colors cannot be mixed and switch at the
/// midpoint.
#[must_use]
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            Color::Rgb(mix(r1, r2, t), mix(g1, g2, t), mix(b1, b2, t))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

fn mix(a: u8, b: u8, t: f32) -> u8 {
    let a = f32::from(a);
    let b = f32::from(b);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// ASCII/Unicode glyphs for controls and status.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub hamburger: &'static str,
    pub close: &'static str,
    pub sound_on: &'static str,
    pub sound_off: &'static str,
    pub user: &'static str,
    pub caret: &'static str,
    pub selected: &'static str,
    pub bullet: &'static str,
    pub toggle_on: &'static str,
    pub toggle_off: &'static str,
    pub bar_full: &'static str,
    pub bar_empty: &'static str,
    pub mask: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            hamburger: "=",
            close: "x",
            sound_on: "<)",
            sound_off: "<x",
            user: "@",
            caret: "v",
            selected: ">",
            bullet: "*",
            toggle_on: "[on ]",
            toggle_off: "[off]",
            bar_full: "#",
            bar_empty: "-",
            mask: "*",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            hamburger: "☰",
            close: "✕",
            sound_on: "🔊",
            sound_off: "🔇",
            user: "◉",
            caret: "▾",
            selected: "▸",
            bullet: "•",
            toggle_on: "◉━━",
            toggle_off: "━━○",
            bar_full: "█",
            bar_empty: "░",
            mask: "•",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn brand(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    /// A focusable control; focused controls are inverted.
    #[must_use]
    pub fn button(palette: &Palette, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(palette.bg)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(palette.primary)
                .bg(palette.bg_highlight)
        }
    }

    #[must_use]
    pub fn link(palette: &Palette, focused: bool) -> Style {
        let style = Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::UNDERLINED);
        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        }
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use fitsyn_types::Theme;
    use fitsyn_types::ui::UiOptions;
    use ratatui::style::Color;

    use super::{Palette, blend, palette, spinner_frame};

    #[test]
    fn spinner_frame_cycles_without_reduced_motion() {
        let options = UiOptions::default();
        assert_ne!(spinner_frame(0, options), spinner_frame(1, options));
    }

    #[test]
    fn spinner_frame_static_with_reduced_motion() {
        let options = UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        };
        assert_eq!(spinner_frame(0, options), spinner_frame(1, options));
        assert_eq!(spinner_frame(0, options), spinner_frame(100, options));
    }

    #[test]
    fn blend_interpolates_rgb() {
        let mid = blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 50), 0.5);
        assert_eq!(mid, Color::Rgb(100, 50, 25));
        assert_eq!(
            blend(Color::Rgb(1, 2, 3), Color::Rgb(9, 9, 9), 0.0),
            Color::Rgb(1, 2, 3)
        );
    }

    #[test]
    fn named_colors_switch_at_midpoint() {
        assert_eq!(blend(Color::Black, Color::White, 0.4), Color::Black);
        assert_eq!(blend(Color::Black, Color::White, 0.6), Color::White);
    }

    #[test]
    fn transition_starts_at_previous_palette() {
        let options = UiOptions::default();
        let start = palette(Theme::Light, Some((Theme::Dark, 0.0)), options);
        assert_eq!(start, Palette::dark());
        let settled = palette(Theme::Light, None, options);
        assert_eq!(settled, Palette::light());
    }

    #[test]
    fn reduced_motion_skips_the_blend() {
        let options = UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        };
        let p = palette(Theme::Light, Some((Theme::Dark, 0.1)), options);
        assert_eq!(p, Palette::light());
    }

    #[test]
    fn high_contrast_follows_theme() {
        let options = UiOptions {
            high_contrast: true,
            ..UiOptions::default()
        };
        assert_eq!(palette(Theme::Dark, None, options).bg, Color::Black);
        assert_eq!(palette(Theme::Light, None, options).bg, Color::White);
    }
}
