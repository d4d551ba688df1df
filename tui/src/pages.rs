//! First-party pages: home, sign in, sign up, settings and not found.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use fitsyn_engine::forms::{LoginFocus, SignUpFocus, TextField};
use fitsyn_engine::hit::{ClickTarget, HitMap};
use fitsyn_engine::home::{HomeAction, Workout, explore_modules};
use fitsyn_engine::settings::SettingsRow;
use fitsyn_engine::{App, NotFoundFocus, Route};

use crate::page::{
    PageBuilder, Piece, centered_column, truncate_with_ellipsis, untrusted_line,
};
use crate::theme::{Glyphs, Palette, styles};

const PAGE_WIDTH: u16 = 76;
const FORM_WIDTH: u16 = 48;
const INDENT: &str = "  ";

pub(crate) fn draw_page(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    match app.route() {
        Route::Home => draw_home(frame, app, area, palette, glyphs, hits),
        Route::Login => draw_login(frame, app, area, palette, glyphs, hits),
        Route::SignUp => draw_signup(frame, app, area, palette, glyphs, hits),
        Route::Settings => draw_settings(frame, app, area, palette, glyphs, hits),
        Route::NotFound(path) => draw_not_found(frame, app, path, area, palette, hits),
        // Module routes render through the frame view.
        Route::Module(_) => {}
    }
}

fn button(label: &str, palette: &Palette, focused: bool) -> Span<'static> {
    Span::styled(format!("[ {label} ]"), styles::button(palette, focused))
}

fn heading(text: &str, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::raw(INDENT),
        Span::styled(text.to_string(), styles::title(palette)),
    ])
}

fn subtitle(text: &str, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::raw(INDENT),
        Span::styled(text.to_string(), styles::muted(palette)),
    ])
}

// ========================================================================
// Home
// ========================================================================

fn draw_home(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let column = centered_column(area, PAGE_WIDTH);
    let text_width = usize::from(column.width).saturating_sub(6);
    let focus = app.home_focus();
    let is = |action: HomeAction| focus == Some(action);
    let mut page = PageBuilder::default();

    page.blank();
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled("FitSyn", styles::brand(palette)),
    ]));
    page.line(subtitle(
        "Your AI-powered fitness companion. Train smarter, get stronger.",
        palette,
    ));
    page.blank();
    let mut hero = vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(
            button("Start Training →", palette, is(HomeAction::StartTraining)),
            ClickTarget::Home(HomeAction::StartTraining),
            is(HomeAction::StartTraining),
        ),
    ];
    if app.home_actions().contains(&HomeAction::SignIn) {
        hero.push(Piece::text(Span::raw("  ")));
        hero.push(Piece::control(
            button("Sign In", palette, is(HomeAction::SignIn)),
            ClickTarget::Home(HomeAction::SignIn),
            is(HomeAction::SignIn),
        ));
    }
    page.row(hero);

    // Quick Start
    let quick = app.quick_start();
    page.blank();
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::text(Span::styled("Quick Start", styles::title(palette))),
        Piece::text(Span::raw("   ")),
        Piece::control(
            Span::styled(
                "View all",
                styles::link(palette, is(HomeAction::ViewAllWorkouts)),
            ),
            ClickTarget::Home(HomeAction::ViewAllWorkouts),
            is(HomeAction::ViewAllWorkouts),
        ),
    ]);
    page.line(subtitle("Today's suggested workout", palette));
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled(
            format!("{} ", glyphs.bullet),
            Style::default().fg(palette.peach),
        ),
        Span::styled(
            quick.featured.title,
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", workout_stats(quick.featured)),
            styles::muted(palette),
        ),
    ]));
    page.row(vec![
        Piece::text(Span::raw("    ")),
        Piece::control(
            button("Start Workout", palette, is(HomeAction::StartWorkout)),
            ClickTarget::Home(HomeAction::StartWorkout),
            is(HomeAction::StartWorkout),
        ),
    ]);
    for (idx, workout) in quick.others.iter().enumerate() {
        let action = HomeAction::Workout(idx);
        let focused = is(action);
        let marker = if focused { glyphs.selected } else { " " };
        page.control_line(
            Line::from(vec![
                Span::raw(format!("  {marker} ")),
                Span::styled(
                    workout.title,
                    if focused {
                        styles::button(palette, true)
                    } else {
                        styles::body(palette)
                    },
                ),
                Span::styled(format!("  {}", workout_stats(workout)), styles::muted(palette)),
            ]),
            ClickTarget::Home(action),
            focused,
        );
    }

    // Explore Modules
    page.blank();
    page.line(heading("Explore Modules", palette));
    page.line(subtitle("Everything you need for your fitness journey", palette));
    page.blank();
    for (idx, module) in explore_modules().enumerate() {
        let action = HomeAction::Module(idx);
        let focused = is(action);
        let marker = if focused { glyphs.selected } else { " " };
        page.control_line(
            Line::from(vec![
                Span::styled(format!("  {marker} "), Style::default().fg(palette.primary)),
                Span::styled(
                    module.title,
                    if focused {
                        styles::button(palette, true)
                    } else {
                        styles::title(palette)
                    },
                ),
            ]),
            ClickTarget::Home(action),
            focused,
        );
        page.line(Line::from(vec![
            Span::raw("      "),
            Span::styled(
                truncate_with_ellipsis(module.description, text_width),
                styles::muted(palette),
            ),
        ]));
    }

    page.render(frame, column, hits);
}

fn workout_stats(workout: &Workout) -> String {
    format!(
        "{} min · {} cal · {}",
        workout.minutes,
        workout.calories,
        workout.intensity.as_str()
    )
}

// ========================================================================
// Auth forms
// ========================================================================

/// A bracketed single-line input. Returns the span and the cursor column
/// inside it.
fn text_input(
    value: &TextField,
    placeholder: &str,
    masked: bool,
    width: usize,
    focused: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> (Span<'static>, u16) {
    let inner = width.saturating_sub(4).max(1);
    let shown = if masked {
        glyphs.mask.repeat(value.grapheme_len())
    } else {
        value.as_str().to_string()
    };
    let (text, style) = if shown.is_empty() {
        (placeholder.to_string(), styles::muted(palette))
    } else {
        (
            tail_fit(&shown, inner),
            Style::default().fg(palette.text_primary),
        )
    };
    let style = if focused {
        style.bg(palette.bg_highlight)
    } else {
        style
    };
    let typed_width = if shown.is_empty() { 0 } else { text.width() };
    let pad = inner.saturating_sub(text.width());
    let content = format!("[ {text}{} ]", " ".repeat(pad));
    (Span::styled(content, style), (2 + typed_width) as u16)
}

/// The last `max` columns of `text`, cut on grapheme boundaries.
fn tail_fit(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for g in text.graphemes(true).rev() {
        let w = g.width();
        if used + w > max {
            break;
        }
        used += w;
        kept.push(g);
    }
    kept.reverse();
    kept.concat()
}

struct FieldRow<'a> {
    label: &'static str,
    value: &'a TextField,
    placeholder: &'a str,
    masked: bool,
    focused: bool,
    target: ClickTarget,
}

fn field_row(
    page: &mut PageBuilder,
    field: &FieldRow<'_>,
    extra: Option<Piece>,
    busy: bool,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled(field.label, styles::body(palette)),
    ]));
    let (span, cursor) = text_input(
        field.value,
        field.placeholder,
        field.masked,
        width,
        field.focused,
        palette,
        glyphs,
    );
    let mut pieces = vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(span, field.target, field.focused),
    ];
    if let Some(extra) = extra {
        pieces.push(Piece::text(Span::raw(" ")));
        pieces.push(extra);
    }
    page.row(pieces);
    if field.focused && !busy {
        page.cursor_on_last(INDENT.len() as u16 + cursor);
    }
}

fn show_password_toggle(shown: bool, target: ClickTarget, palette: &Palette) -> Piece {
    let label = if shown { "Hide" } else { "Show" };
    Piece::control(
        Span::styled(format!("({label})"), styles::link(palette, false)),
        target,
        false,
    )
}

fn draw_login(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let column = centered_column(area, FORM_WIDTH);
    let width = usize::from(column.width).saturating_sub(10).max(12);
    let form = app.login_form();
    let focus = form.focus();
    let busy = form.is_busy();
    let mut page = PageBuilder::default();

    page.blank();
    page.line(heading("Welcome Back", palette));
    page.line(subtitle("Sign in to sync your progress across devices", palette));
    page.blank();
    field_row(
        &mut page,
        &FieldRow {
            label: "Email",
            value: &form.email,
            placeholder: "you@example.com",
            masked: false,
            focused: focus == LoginFocus::Email,
            target: ClickTarget::Login(LoginFocus::Email),
        },
        None,
        busy,
        width,
        palette,
        glyphs,
    );
    page.blank();
    field_row(
        &mut page,
        &FieldRow {
            label: "Password",
            value: &form.password,
            placeholder: &glyphs.mask.repeat(8),
            masked: !form.show_password(),
            focused: focus == LoginFocus::Password,
            target: ClickTarget::Login(LoginFocus::Password),
        },
        Some(show_password_toggle(
            form.show_password(),
            ClickTarget::LoginShowPassword,
            palette,
        )),
        busy,
        width,
        palette,
        glyphs,
    );
    page.blank();
    let submit = if busy { "Signing In..." } else { "Sign In →" };
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(
            button(submit, palette, focus == LoginFocus::Submit),
            ClickTarget::Login(LoginFocus::Submit),
            focus == LoginFocus::Submit,
        ),
    ]);
    page.line(subtitle("or", palette));
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(
            button(
                &format!("{} Continue as Guest", glyphs.user),
                palette,
                focus == LoginFocus::Guest,
            ),
            ClickTarget::Login(LoginFocus::Guest),
            focus == LoginFocus::Guest,
        ),
    ]);
    page.blank();
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::text(Span::styled(
            "Don't have an account? ",
            styles::muted(palette),
        )),
        Piece::control(
            Span::styled(
                "Sign Up",
                styles::link(palette, focus == LoginFocus::SignUpLink),
            ),
            ClickTarget::Login(LoginFocus::SignUpLink),
            focus == LoginFocus::SignUpLink,
        ),
    ]);

    page.render(frame, column, hits);
}

fn draw_signup(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let column = centered_column(area, FORM_WIDTH);
    let width = usize::from(column.width).saturating_sub(10).max(12);
    let form = app.signup_form();
    let focus = form.focus();
    let busy = form.is_busy();
    let mut page = PageBuilder::default();

    page.blank();
    page.line(heading("Create Account", palette));
    page.line(subtitle("Join FitSyn to sync your progress across devices", palette));
    page.blank();
    field_row(
        &mut page,
        &FieldRow {
            label: "Name",
            value: &form.name,
            placeholder: "Your name",
            masked: false,
            focused: focus == SignUpFocus::Name,
            target: ClickTarget::SignUp(SignUpFocus::Name),
        },
        None,
        busy,
        width,
        palette,
        glyphs,
    );
    page.blank();
    field_row(
        &mut page,
        &FieldRow {
            label: "Email",
            value: &form.email,
            placeholder: "you@example.com",
            masked: false,
            focused: focus == SignUpFocus::Email,
            target: ClickTarget::SignUp(SignUpFocus::Email),
        },
        None,
        busy,
        width,
        palette,
        glyphs,
    );
    page.blank();
    field_row(
        &mut page,
        &FieldRow {
            label: "Password",
            value: &form.password,
            placeholder: "At least 6 characters",
            masked: !form.show_password(),
            focused: focus == SignUpFocus::Password,
            target: ClickTarget::SignUp(SignUpFocus::Password),
        },
        Some(show_password_toggle(
            form.show_password(),
            ClickTarget::SignUpShowPassword,
            palette,
        )),
        busy,
        width,
        palette,
        glyphs,
    );
    page.blank();
    let submit = if busy {
        "Creating Account..."
    } else {
        "Create Account →"
    };
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(
            button(submit, palette, focus == SignUpFocus::Submit),
            ClickTarget::SignUp(SignUpFocus::Submit),
            focus == SignUpFocus::Submit,
        ),
    ]);
    page.blank();
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::text(Span::styled(
            "Already have an account? ",
            styles::muted(palette),
        )),
        Piece::control(
            Span::styled(
                "Sign In",
                styles::link(palette, focus == SignUpFocus::LoginLink),
            ),
            ClickTarget::SignUp(SignUpFocus::LoginLink),
            focus == SignUpFocus::LoginLink,
        ),
    ]);

    page.render(frame, column, hits);
}

// ========================================================================
// Settings
// ========================================================================

fn draw_settings(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    hits: &mut HitMap,
) {
    let column = centered_column(area, PAGE_WIDTH);
    let settings = app.settings_page();
    let mut page = PageBuilder::default();

    page.blank();
    page.line(heading("Settings", palette));
    page.line(subtitle("Customize your FitSyn experience", palette));
    page.blank();

    for row in SettingsRow::ALL {
        let focused = settings.selected() == row;
        let marker = if focused { glyphs.selected } else { " " };
        let switch = match row {
            SettingsRow::Theme => Some(app.theme().is_dark()),
            SettingsRow::Sound => Some(!app.is_muted()),
            SettingsRow::Notifications => Some(settings.notifications()),
            _ => None,
        };
        let mut spans = vec![
            Span::styled(format!("  {marker} "), Style::default().fg(palette.primary)),
            Span::styled(
                row.title(),
                if focused {
                    styles::button(palette, true)
                } else {
                    styles::title(palette)
                },
            ),
        ];
        if let Some(on) = switch {
            let (glyph, color) = if on {
                (glyphs.toggle_on, palette.success)
            } else {
                (glyphs.toggle_off, palette.text_muted)
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(glyph, Style::default().fg(color)));
        }
        page.control_line(Line::from(spans), ClickTarget::Settings(row), focused);
        page.line(Line::from(vec![
            Span::raw("      "),
            Span::styled(row.description(app.theme()), styles::muted(palette)),
        ]));
        page.blank();
    }

    page.line(heading("Theme Preview", palette));
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled("    ", Style::default().bg(palette.primary)),
        Span::raw(" "),
        Span::styled("    ", Style::default().bg(palette.accent)),
        Span::raw(" "),
        Span::styled("    ", Style::default().bg(palette.success)),
        Span::raw(" "),
        Span::styled("    ", Style::default().bg(palette.bg_panel)),
    ]));

    page.render(frame, column, hits);
}

// ========================================================================
// Not found
// ========================================================================

fn draw_not_found(
    frame: &mut Frame,
    app: &App,
    path: &str,
    area: Rect,
    palette: &Palette,
    hits: &mut HitMap,
) {
    let column = centered_column(area, PAGE_WIDTH);
    let focus = app.not_found_focus();
    let mut page = PageBuilder::default();
    let path = untrusted_line(path, usize::from(column.width).saturating_sub(4));

    page.blank();
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled(
            "404",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    page.line(heading("Oops! This workout doesn't exist.", palette));
    page.line(Line::from(vec![
        Span::raw(INDENT),
        Span::styled(path, Style::default().fg(palette.peach)),
    ]));
    page.blank();
    page.row(vec![
        Piece::text(Span::raw(INDENT)),
        Piece::control(
            button("Go Home", palette, focus == NotFoundFocus::Home),
            ClickTarget::NotFoundHome,
            focus == NotFoundFocus::Home,
        ),
        Piece::text(Span::raw("  ")),
        Piece::control(
            button("Go Back", palette, focus == NotFoundFocus::Back),
            ClickTarget::NotFoundBack,
            focus == NotFoundFocus::Back,
        ),
    ]);

    page.render(frame, column, hits);
}
