//! TUI rendering for the FitSyn shell using ratatui.
//!
//! [`draw`] renders one frame from the app state and refreshes the app's hit
//! map so pointer clicks resolve against what is actually on screen. Regions
//! are recorded in paint order; overlays drawn later win.

mod chrome;
mod effects;
mod input;
mod module_view;
mod page;
mod pages;
mod theme;

pub use input::{InputPump, KeyContext, command_for, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use fitsyn_engine::App;
use fitsyn_engine::hit::HitMap;

use self::chrome::{
    HEADER_HEIGHT, draw_dropdown, draw_header, draw_key_hints, draw_menu, draw_toasts,
};
use self::effects::fade_in;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let preference = app.theme_preference();
    let palette = palette(preference.theme(), preference.transition(), options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg).fg(palette.text_primary));
    frame.render_widget(bg_block, frame.area());

    let mut hits = HitMap::default();
    if app.show_splash() {
        draw_splash(frame, app, &palette, &glyphs);
    } else {
        draw_shell(frame, app, &palette, &glyphs, &mut hits);
    }
    *app.hits_mut() = hits;
}

fn draw_shell(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs, hits: &mut HitMap) {
    let viewport = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(1),                // Page
            Constraint::Length(1),             // Key hints
        ])
        .split(viewport);

    draw_header(frame, app, chunks[0], palette, glyphs, hits);

    let body = chunks[1];
    if app.route().module().is_some() {
        module_view::draw_module(frame, app, body, palette, glyphs);
    } else {
        pages::draw_page(frame, app, body, palette, glyphs, hits);
    }
    draw_key_hints(frame, app, chunks[2], palette);

    if app.dropdown().is_open() {
        draw_dropdown(frame, app, viewport, palette, hits);
    }
    draw_menu(frame, app, viewport, palette, glyphs, hits);
    draw_toasts(frame, app, viewport, palette);
}

/// First-visit brand screen. Fades toward the background while exiting.
fn draw_splash(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let splash = app.splash();
    let logo = if app.ui_options().ascii_only {
        "o=====o"
    } else {
        "▐█▬▬▬█▌"
    };

    let bar_width = 24usize.min(usize::from(area.width).saturating_sub(4));
    let filled = (splash.display_progress() * bar_width as f32).round() as usize;
    let bar = format!(
        "{}{}",
        glyphs.bar_full.repeat(filled.min(bar_width)),
        glyphs.bar_empty.repeat(bar_width.saturating_sub(filled))
    );

    let lines = vec![
        Line::from(Span::styled(
            logo,
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "FitSyn",
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("AI-Powered Fitness", styles::muted(palette))),
        Line::from(""),
        Line::from(Span::styled(bar, Style::default().fg(palette.primary_dim))),
    ];
    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: top,
        height: area.bottom().saturating_sub(top),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);

    let opacity = 1.0 - splash.exit_progress();
    fade_in(frame.buffer_mut(), area, palette.bg, opacity);
}
