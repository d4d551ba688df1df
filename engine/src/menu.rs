//! Full-screen navigation menu open/close state.
//!
//! `is_open` is the logical state the rest of the shell reads. The panel and
//! backdrop stay mounted while the close animation plays, so the renderer
//! asks [`NavigationMenu::is_mounted`] and [`NavigationMenu::visible_fraction`]
//! instead.
//!
//! Menu contents are never stored here: they are rebuilt from the session on
//! every render via [`fitsyn_types::MenuView::build`].

use std::time::Duration;

use fitsyn_types::ui::{AnimPhase, EffectTimer};

/// The panel slides in from the left edge and back out the same way.
#[derive(Debug, Clone)]
enum MenuPhase {
    Closed,
    Opening(EffectTimer),
    Open,
    /// `from` is how far the panel was slid in when the close started, so an
    /// interrupted open reverses from where it was.
    Closing { timer: EffectTimer, from: f32 },
}

#[derive(Debug, Clone)]
pub struct NavigationMenu {
    phase: MenuPhase,
    selected: usize,
    slide: Duration,
}

impl NavigationMenu {
    #[must_use]
    pub fn new(slide: Duration) -> Self {
        Self {
            phase: MenuPhase::Closed,
            selected: 0,
            slide,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.phase, MenuPhase::Opening(_) | MenuPhase::Open)
    }

    /// Backdrop and panel are on screen (open, or animating).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !matches!(self.phase, MenuPhase::Closed)
    }

    /// How much of the panel is slid in, `0.0..=1.0`.
    #[must_use]
    pub fn visible_fraction(&self) -> f32 {
        match &self.phase {
            MenuPhase::Closed => 0.0,
            MenuPhase::Open => 1.0,
            MenuPhase::Opening(timer) => timer.progress(),
            MenuPhase::Closing { timer, from } => from * (1.0 - timer.progress()),
        }
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.selected = 0;
        self.phase = MenuPhase::Opening(EffectTimer::new(self.slide));
        tracing::debug!("Menu opened");
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        let from = self.visible_fraction();
        self.phase = MenuPhase::Closing {
            timer: EffectTimer::new(self.slide),
            from,
        };
        tracing::debug!("Menu closed");
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        match &mut self.phase {
            MenuPhase::Opening(timer) => {
                timer.advance(delta);
                if timer.phase() == AnimPhase::Completed {
                    self.phase = MenuPhase::Open;
                }
            }
            MenuPhase::Closing { timer, .. } => {
                timer.advance(delta);
                if timer.phase() == AnimPhase::Completed {
                    self.phase = MenuPhase::Closed;
                }
            }
            MenuPhase::Closed | MenuPhase::Open => {}
        }
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize, len: usize) {
        if len > 0 {
            self.selected = index.min(len - 1);
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }
}
