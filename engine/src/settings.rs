//! Settings page rows.

use fitsyn_types::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Theme,
    Sound,
    Notifications,
    Privacy,
    Help,
    About,
}

impl SettingsRow {
    pub const ALL: [Self; 6] = [
        Self::Theme,
        Self::Sound,
        Self::Notifications,
        Self::Privacy,
        Self::Help,
        Self::About,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Theme => "Theme",
            Self::Sound => "Sound Effects",
            Self::Notifications => "Notifications",
            Self::Privacy => "Privacy",
            Self::Help => "Help & Support",
            Self::About => "About FitSyn",
        }
    }

    /// Secondary line. The theme row reflects the active theme.
    #[must_use]
    pub fn description(self, theme: Theme) -> String {
        match self {
            Self::Theme => match theme {
                Theme::Dark => "Dark mode enabled".to_string(),
                Theme::Light => "Light mode enabled".to_string(),
            },
            Self::Sound => "Button clicks and transitions".to_string(),
            Self::Notifications => "Workout reminders and updates".to_string(),
            Self::Privacy => "Manage your data and preferences".to_string(),
            Self::Help => "FAQs and contact support".to_string(),
            Self::About => format!("Version {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Rows with an on/off switch.
    #[must_use]
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::Theme | Self::Sound | Self::Notifications)
    }
}

/// Session-local settings page state.
#[derive(Debug, Clone)]
pub struct SettingsPage {
    notifications: bool,
    selected: usize,
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self {
            notifications: true,
            selected: 0,
        }
    }
}

impl SettingsPage {
    #[must_use]
    pub fn notifications(&self) -> bool {
        self.notifications
    }

    pub fn toggle_notifications(&mut self) {
        self.notifications = !self.notifications;
    }

    #[must_use]
    pub fn selected(&self) -> SettingsRow {
        SettingsRow::ALL[self.selected % SettingsRow::ALL.len()]
    }

    pub fn select(&mut self, row: SettingsRow) {
        if let Some(idx) = SettingsRow::ALL.iter().position(|r| *r == row) {
            self.selected = idx;
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % SettingsRow::ALL.len();
    }

    pub fn select_prev(&mut self) {
        let len = SettingsRow::ALL.len();
        self.selected = (self.selected + len - 1) % len;
    }
}
