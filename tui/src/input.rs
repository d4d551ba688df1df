//! Input handling: terminal events translated into shell commands.

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use fitsyn_engine::{App, Command, Route};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads crossterm events on a blocking thread and hands them to the UI loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a thread blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Backpressure instead of dropping: a large paste must
                    // arrive intact.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// What the key map needs to know about the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// A form page is showing, so printable keys are text.
    pub text_entry: bool,
    pub menu_open: bool,
    pub dropdown_open: bool,
}

impl KeyContext {
    #[must_use]
    pub fn from_app(app: &App) -> Self {
        Self {
            text_entry: matches!(app.route(), Route::Login | Route::SignUp),
            menu_open: app.menu().is_open(),
            dropdown_open: app.dropdown().is_open(),
        }
    }
}

/// Drain pending terminal events into the app. Returns whether the app
/// wants to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if let Some(command) = command_for(&ev, KeyContext::from_app(app)) {
            debug!(?command, "Input");
            app.dispatch(command);
        }
        if app.should_quit() {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Map one terminal event to a command.
#[must_use]
pub fn command_for(event: &Event, ctx: KeyContext) -> Option<Command> {
    match event {
        Event::Key(key) => command_for_key(key, ctx),
        Event::Mouse(mouse) => command_for_mouse(mouse),
        Event::Paste(text) => Some(Command::Paste(normalize_paste(text))),
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent, ctx: KeyContext) -> Option<Command> {
    if matches!(key.kind, KeyEventKind::Release) {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'q') => Some(Command::Quit),
            KeyCode::Char('n') => Some(Command::ToggleMenu),
            KeyCode::Char('s') => Some(Command::ToggleMute),
            KeyCode::Char('u') => Some(Command::UserControl),
            KeyCode::Char('r') => Some(Command::ToggleShowPassword),
            KeyCode::Char('b') => Some(Command::Back),
            KeyCode::Char('g') => Some(Command::Home),
            KeyCode::Char('x') => Some(Command::DismissToast),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Left => Some(Command::Back),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Command::Dismiss),
        KeyCode::Tab | KeyCode::Down => Some(Command::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Command::FocusPrev),
        KeyCode::Enter if ctx.dropdown_open && !ctx.menu_open => Some(Command::DropdownSignOut),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Char(c) if ctx.text_entry && !ctx.menu_open => Some(Command::Insert(c)),
        KeyCode::Char(' ') => Some(Command::Activate),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('m') => Some(Command::ToggleMenu),
        _ => None,
    }
}

fn command_for_mouse(mouse: &MouseEvent) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        MouseEventKind::ScrollDown => Some(Command::FocusNext),
        MouseEventKind::ScrollUp => Some(Command::FocusPrev),
        _ => None,
    }
}

/// Fields are single line: a trailing line break is dropped, inner ones
/// become spaces.
fn normalize_paste(text: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}
