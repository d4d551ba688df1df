//! Module page: the loading presentation and the revealed frame panel.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use fitsyn_engine::App;
use fitsyn_engine::frame::{FrameDocument, ModuleFrame};
use fitsyn_types::ui::UiOptions;

use crate::effects::fade_in;
use crate::theme::{Glyphs, Palette, spinner_frame, styles};

pub(crate) fn draw_module(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let Some(module_frame) = app.frame() else {
        return;
    };
    match (app.loading_message(), module_frame.document()) {
        (Some(message), _) => {
            draw_loading(frame, &message, area, palette, app.ui_options());
        }
        (None, Some(document)) => {
            draw_frame_panel(frame, module_frame, document, area, palette, glyphs);
            fade_in(
                frame.buffer_mut(),
                area,
                palette.bg,
                module_frame.content_opacity(),
            );
        }
        (None, None) => {}
    }
}

/// Full-area "Loading <title>…" screen.
fn draw_loading(frame: &mut Frame, message: &str, area: Rect, palette: &Palette, ui: UiOptions) {
    let spinner = spinner_frame(frame.count(), ui);
    let dumbbell = if ui.ascii_only { "o=====o" } else { "▐█▬▬▬█▌" };
    let lines = vec![
        Line::from(Span::styled(
            dumbbell,
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{spinner} "), Style::default().fg(palette.accent)),
            Span::styled(message.to_string(), styles::body(palette)),
        ]),
    ];
    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: top,
        height: area.bottom().saturating_sub(top),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

fn draw_frame_panel(
    frame: &mut Frame,
    module_frame: &ModuleFrame,
    document: &FrameDocument,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let module = module_frame.module();
    let policy = module_frame.policy();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary_dim))
        .style(Style::default().bg(palette.bg))
        .title(Line::from(Span::styled(
            format!(" {} ", module.title),
            styles::title(palette),
        )));

    let label = |text: &'static str| Span::styled(format!("{text:<9}"), styles::muted(palette));
    let content_type = document.content_type.as_deref().unwrap_or("unknown");
    let lines = vec![
        Line::from(vec![
            label("URL"),
            Span::styled(module.url, Style::default().fg(palette.accent)),
        ]),
        Line::from(vec![
            label("Allow"),
            Span::styled(policy.allow_attribute(), styles::body(palette)),
        ]),
        Line::from(vec![
            label("Sandbox"),
            Span::styled(policy.sandbox_attribute(), styles::body(palette)),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(
                document.status.to_string(),
                Style::default().fg(if (200..300).contains(&document.status) {
                    palette.success
                } else {
                    palette.warning
                }),
            ),
            Span::styled(
                format!(
                    " {} {} {} {content_type}",
                    glyphs.bullet,
                    format_bytes(document.content_length),
                    glyphs.bullet
                ),
                styles::muted(palette),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(module.description, styles::body(palette))),
        Line::from(""),
        Line::from(Span::styled(
            "This module runs in its own sandboxed context. Open the URL above in a browser to use it.",
            styles::muted(palette),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
