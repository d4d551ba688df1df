//! Shell chrome: header, account dropdown, navigation menu, toasts, key hints.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use fitsyn_engine::header::user_control_label;
use fitsyn_engine::hit::{ClickTarget, HitMap};
use fitsyn_engine::notifications::ToastVariant;
use fitsyn_engine::{App, MenuItem};
use fitsyn_types::sanitize_terminal_text;
use fitsyn_types::ui::Region;

use crate::effects::{dim_backdrop, slide_from_left};
use crate::page::{PageBuilder, truncate_with_ellipsis, untrusted_line};
use crate::theme::{Glyphs, Palette, styles};

pub(crate) const HEADER_HEIGHT: u16 = 2;
const MENU_WIDTH: u16 = 46;
const TOAST_WIDTH: u16 = 42;
const TOAST_HEIGHT: u16 = 4;

pub(crate) fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}

/// Span the given text occupies starting at `x` on row `y`.
fn text_rect(x: u16, y: u16, text: &str) -> Rect {
    Rect::new(x, y, text.width() as u16, 1)
}

// ========================================================================
// Header
// ========================================================================

pub(crate) fn draw_header(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }
    let y = inner.y;

    let hamburger = format!(" {} ", glyphs.hamburger);
    let hamburger_rect = text_rect(inner.x, y, &hamburger);

    let muted = app.is_muted();
    let mute = format!(
        " {} ",
        if muted {
            glyphs.sound_off
        } else {
            glyphs.sound_on
        }
    );
    let session = app.session();
    let user = if session.is_authenticated() {
        format!(
            " {} {} {} ",
            glyphs.user,
            sanitize_terminal_text(user_control_label(session)),
            glyphs.caret
        )
    } else {
        format!(" {} ", sanitize_terminal_text(user_control_label(session)))
    };
    let right_width = (mute.width() + 1 + user.width()) as u16;
    let right_x = inner.right().saturating_sub(right_width);
    let mute_rect = text_rect(right_x, y, &mute);
    let user_rect = text_rect(right_x + mute_rect.width + 1, y, &user);

    let title_max =
        usize::from(right_x.saturating_sub(hamburger_rect.right() + 1)).saturating_sub(10);
    let left = Line::from(vec![
        Span::styled(
            hamburger,
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_highlight),
        ),
        Span::raw(" "),
        Span::styled("FitSyn", styles::brand(palette)),
        Span::styled(" › ", styles::muted(palette)),
        Span::styled(
            truncate_with_ellipsis(app.route().title(), title_max),
            styles::body(palette),
        ),
    ]);
    frame.render_widget(Paragraph::new(left), Rect::new(inner.x, y, inner.width, 1));

    let right = Line::from(vec![
        Span::styled(
            mute,
            Style::default()
                .fg(if muted {
                    palette.text_muted
                } else {
                    palette.accent
                })
                .bg(palette.bg_highlight),
        ),
        Span::raw(" "),
        Span::styled(
            user,
            if app.dropdown().is_open() {
                styles::button(palette, true)
            } else {
                styles::button(palette, false)
            },
        ),
    ]);
    frame.render_widget(
        Paragraph::new(right),
        Rect::new(right_x, y, inner.right().saturating_sub(right_x), 1),
    );

    hits.record(region(hamburger_rect), ClickTarget::Hamburger);
    hits.record(region(mute_rect), ClickTarget::Mute);
    hits.record(region(user_rect), ClickTarget::UserControl);
}

// ========================================================================
// Account dropdown
// ========================================================================

pub(crate) fn draw_dropdown(
    frame: &mut Frame,
    app: &App,
    viewport: Rect,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let Some(session) = app.session().session() else {
        return;
    };
    let Some(trigger) = hits.region_of(ClickTarget::UserControl) else {
        return;
    };
    let name = sanitize_terminal_text(session.display_name());
    let email = sanitize_terminal_text(session.email());
    let content = name.width().max(email.width()).max(12) as u16;
    let width = (content + 4).min(viewport.width);
    let height = 6.min(viewport.height.saturating_sub(trigger.y + 1));
    let right = trigger.x.saturating_add(trigger.width);
    let area = Rect {
        x: right.saturating_sub(width).max(viewport.x),
        y: trigger.y + 1,
        width,
        height,
    };
    if area.height < 3 {
        return;
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let inner_width = usize::from(inner.width);
    let lines = vec![
        Line::from(Span::styled(
            truncate_with_ellipsis(&name, inner_width),
            styles::title(palette),
        )),
        Line::from(Span::styled(
            truncate_with_ellipsis(&email, inner_width),
            styles::muted(palette),
        )),
        Line::from(Span::styled(
            "─".repeat(inner_width),
            Style::default().fg(palette.border),
        )),
        Line::from(Span::styled(
            "Sign Out",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    hits.record(region(area), ClickTarget::Dropdown);
    if inner.height >= 4 {
        hits.record(
            region(Rect::new(inner.x, inner.y + 3, inner.width, 1)),
            ClickTarget::DropdownSignOut,
        );
    }
}

// ========================================================================
// Navigation menu
// ========================================================================

pub(crate) fn draw_menu(
    frame: &mut Frame,
    app: &App,
    viewport: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let menu = app.menu();
    if !menu.is_mounted() {
        return;
    }
    let fraction = menu.visible_fraction();
    dim_backdrop(frame.buffer_mut(), viewport, palette.backdrop, fraction);

    let docked = Rect {
        width: MENU_WIDTH.min(viewport.width),
        ..viewport
    };
    let panel = slide_from_left(docked, fraction);
    if panel.width < 3 {
        return;
    }
    frame.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(palette.primary_dim))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    // A closing menu is still drawn but no longer takes clicks.
    let mut scratch = HitMap::default();
    let menu_hits: &mut HitMap = if menu.is_open() {
        hits.record(region(viewport), ClickTarget::MenuBackdrop);
        hits.record(region(panel), ClickTarget::MenuPanel);
        hits
    } else {
        &mut scratch
    };

    // Title bar with the close control pinned right.
    let close = format!(" {} ", glyphs.close);
    let close_rect = text_rect(
        inner.right().saturating_sub(close.width() as u16 + 1),
        inner.y,
        &close,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled("FitSyn", styles::brand(palette)),
        ])),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
    if close_rect.x > inner.x && close_rect.right() <= inner.right() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                close,
                Style::default()
                    .fg(palette.text_primary)
                    .bg(palette.bg_highlight),
            )),
            close_rect,
        );
        menu_hits.record(region(close_rect), ClickTarget::MenuClose);
    }

    let view = app.menu_view();
    let footer_rows = 2;
    let body = Rect {
        y: inner.y + 2,
        height: inner.height.saturating_sub(2 + footer_rows),
        ..inner
    };
    let label_width = usize::from(MENU_WIDTH).saturating_sub(6);
    let selected = menu.selected();
    let mut page = PageBuilder::default();

    page.line(section_title("Modules", palette));
    let mut index = 0;
    for item in &view.primary {
        page.control_line(
            menu_line(item, index == selected, label_width, palette, glyphs),
            ClickTarget::MenuEntry(index),
            index == selected,
        );
        index += 1;
    }
    page.blank();
    page.line(section_title("Account", palette));
    if let Some(profile) = &view.profile {
        page.line(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                format!("{} ", glyphs.user),
                Style::default().fg(palette.primary),
            ),
            Span::styled(
                untrusted_line(&profile.display_name, label_width),
                styles::title(palette),
            ),
        ]));
        page.line(Line::from(vec![
            Span::raw("     "),
            Span::styled(
                untrusted_line(&profile.email, label_width),
                styles::muted(palette),
            ),
        ]));
    }
    for item in &view.secondary {
        page.control_line(
            menu_line(item, index == selected, label_width, palette, glyphs),
            ClickTarget::MenuEntry(index),
            index == selected,
        );
        index += 1;
    }
    page.render(frame, body, menu_hits);

    let footer = Rect {
        y: inner.bottom().saturating_sub(1),
        height: 1.min(inner.height),
        ..inner
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(
                " {}",
                untrusted_line(&view.footer, usize::from(inner.width).saturating_sub(1))
            ),
            styles::muted(palette),
        )),
        footer,
    );
}

fn section_title(text: &'static str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", text.to_uppercase()),
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::BOLD),
    ))
}

fn menu_line(
    item: &MenuItem,
    selected: bool,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let marker = if selected { glyphs.selected } else { " " };
    let label_style = if selected {
        styles::button(palette, true)
    } else {
        Style::default().fg(palette.text_primary)
    };
    let mut spans = vec![
        Span::styled(format!(" {marker} "), Style::default().fg(palette.primary)),
        Span::styled(item.label, label_style),
    ];
    if let Some(description) = item.description {
        let room = width.saturating_sub(item.label.width() + 2);
        if room > 4 {
            spans.push(Span::styled(
                format!("  {}", truncate_with_ellipsis(description, room)),
                styles::muted(palette),
            ));
        }
    }
    Line::from(spans)
}

// ========================================================================
// Toasts
// ========================================================================

pub(crate) fn draw_toasts(frame: &mut Frame, app: &App, viewport: Rect, palette: &Palette) {
    let width = TOAST_WIDTH.min(viewport.width.saturating_sub(2));
    if width < 8 {
        return;
    }
    let x = viewport.right().saturating_sub(width + 1);
    let mut bottom = viewport.bottom().saturating_sub(1);
    // Newest sits lowest; older ones stack upward.
    for toast in app.toasts().iter().collect::<Vec<_>>().into_iter().rev() {
        if bottom < viewport.y + TOAST_HEIGHT {
            break;
        }
        let area = Rect::new(x, bottom - TOAST_HEIGHT, width, TOAST_HEIGHT);
        bottom -= TOAST_HEIGHT;

        let accent = match toast.variant {
            ToastVariant::Default => palette.success,
            ToastVariant::Destructive => palette.error,
        };
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(palette.bg_panel));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let room = usize::from(inner.width);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    untrusted_line(&toast.title, room),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    untrusted_line(&toast.description, room),
                    styles::body(palette),
                )),
            ]),
            inner,
        );
    }
}

// ========================================================================
// Key hints
// ========================================================================

pub(crate) fn draw_key_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut hints: Vec<(&str, &str)> = vec![
        ("Ctrl+N", "menu"),
        ("Ctrl+S", "sound"),
        ("Ctrl+U", "account"),
        ("Tab", "focus"),
        ("Enter", "select"),
    ];
    if app.can_go_back() {
        hints.push(("Ctrl+B", "back"));
    }
    hints.push(("Ctrl+C", "quit"));

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg)),
        area,
    );
}
