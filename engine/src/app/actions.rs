//! Command handling: user input mapped onto the shell state machines.

use std::time::Duration;

use fitsyn_types::{AuthFlow, MenuAction, Route};

use super::{App, Command, NotFoundFocus};
use crate::forms::{FILL_ALL_FIELDS, LoginFocus, SignUpFocus};
use crate::header::UserControlAction;
use crate::hit::ClickTarget;
use crate::home::HomeAction;
use crate::session::{AuthOutcome, SignOutOrigin};
use crate::settings::SettingsRow;
use crate::sound::Cue;

/// Delay before the confirming click when sound is switched back on.
const UNMUTE_CLICK_DELAY: Duration = Duration::from_millis(50);

impl App {
    pub fn dispatch(&mut self, command: Command) {
        if command == Command::Quit {
            self.should_quit = true;
            return;
        }
        if self.splash.show_splash() {
            return;
        }
        match command {
            Command::ToggleMenu => self.toggle_menu(),
            Command::CloseMenu => self.close_menu(),
            Command::ToggleMute => self.sound.toggle_mute(),
            Command::UserControl => self.activate_user_control(),
            Command::DropdownSignOut => self.dropdown_sign_out(),
            Command::Dismiss => {
                if self.menu.is_open() {
                    self.close_menu();
                } else {
                    self.dropdown.close();
                }
            }
            Command::FocusNext => self.move_focus(true),
            Command::FocusPrev => self.move_focus(false),
            Command::Activate => self.activate(),
            Command::Insert(c) => self.edit(|app| match app.router.current() {
                Route::Login => app.login.insert_char(c),
                Route::SignUp => app.signup.insert_char(c),
                _ => {}
            }),
            Command::Paste(text) => self.edit(|app| match app.router.current() {
                Route::Login => app.login.insert_str(&text),
                Route::SignUp => app.signup.insert_str(&text),
                _ => {}
            }),
            Command::Backspace => self.edit(|app| match app.router.current() {
                Route::Login => app.login.backspace(),
                Route::SignUp => app.signup.backspace(),
                _ => {}
            }),
            Command::ToggleShowPassword => match self.router.current() {
                Route::Login => self.login.toggle_show_password(),
                Route::SignUp => self.signup.toggle_show_password(),
                _ => {}
            },
            Command::Back => {
                self.sound.play_click();
                self.go_back();
            }
            Command::Home => {
                self.sound.play_click();
                self.navigate(Route::Home);
            }
            Command::Navigate(route) => self.navigate(route),
            Command::Click { column, row } => self.click(column, row),
            Command::DismissToast => self.toasts.dismiss_latest(),
            Command::Quit => {}
        }
    }

    /// Form edits are ignored while an overlay has the keyboard.
    fn edit(&mut self, apply: impl FnOnce(&mut Self)) {
        if self.menu.is_open() {
            return;
        }
        apply(self);
    }

    fn toggle_menu(&mut self) {
        self.sound.play_click();
        self.sound.play_swoosh();
        self.dropdown.close();
        self.menu.toggle();
    }

    fn close_menu(&mut self) {
        if !self.menu.is_open() {
            return;
        }
        self.sound.play_swoosh();
        self.menu.close();
    }

    fn activate_menu_entry(&mut self, index: usize) {
        let view = self.menu_view();
        let Some(item) = view.entry(index) else {
            return;
        };
        self.sound.play_click();
        match item.action.clone() {
            MenuAction::Navigate(route) => {
                // Close before navigating so the menu never rebuilds for
                // the route it is leaving.
                self.menu.close();
                self.navigate(route);
            }
            MenuAction::SignOut => self.session.sign_out(SignOutOrigin::Menu),
        }
    }

    fn activate_user_control(&mut self) {
        self.sound.play_click();
        match UserControlAction::for_session(self.session.state()) {
            UserControlAction::NavigateToLogin => self.navigate(Route::Login),
            UserControlAction::ToggleDropdown => self.dropdown.toggle(),
        }
    }

    fn dropdown_sign_out(&mut self) {
        if !self.dropdown.is_open() || !self.session.state().is_authenticated() {
            return;
        }
        self.sound.play_click();
        self.session.sign_out(SignOutOrigin::Header);
    }

    fn move_focus(&mut self, forward: bool) {
        if self.menu.is_open() {
            let len = self.menu_view().len();
            if forward {
                self.menu.select_next(len);
            } else {
                self.menu.select_prev(len);
            }
            return;
        }
        match self.router.current() {
            Route::Home => {
                let len = self.home_actions().len();
                self.home_focus = if forward {
                    (self.home_focus + 1) % len
                } else {
                    (self.home_focus + len - 1) % len
                };
            }
            Route::Login if forward => self.login.focus_next(),
            Route::Login => self.login.focus_prev(),
            Route::SignUp if forward => self.signup.focus_next(),
            Route::SignUp => self.signup.focus_prev(),
            Route::Settings if forward => self.settings.select_next(),
            Route::Settings => self.settings.select_prev(),
            Route::NotFound(_) => {
                self.not_found_focus = match self.not_found_focus {
                    NotFoundFocus::Home => NotFoundFocus::Back,
                    NotFoundFocus::Back => NotFoundFocus::Home,
                };
            }
            Route::Module(_) => {}
        }
    }

    fn activate(&mut self) {
        if self.menu.is_open() {
            self.activate_menu_entry(self.menu.selected());
            return;
        }
        match self.router.current() {
            Route::Home => {
                if let Some(action) = self.home_focus() {
                    self.activate_home(action);
                }
            }
            Route::Login => self.activate_login(self.login.focus()),
            Route::SignUp => self.activate_signup(self.signup.focus()),
            Route::Settings => self.activate_settings_row(self.settings.selected()),
            Route::NotFound(_) => match self.not_found_focus {
                NotFoundFocus::Home => self.dispatch(Command::Home),
                NotFoundFocus::Back => self.dispatch(Command::Back),
            },
            Route::Module(_) => {}
        }
    }

    fn activate_home(&mut self, action: HomeAction) {
        if !matches!(action, HomeAction::StartTraining | HomeAction::SignIn) {
            self.sound.play_click();
        }
        let route = action.route(&self.quick_start);
        self.navigate(route);
    }

    fn activate_login(&mut self, focus: LoginFocus) {
        match focus {
            LoginFocus::Email => self.login.focus_next(),
            LoginFocus::Password | LoginFocus::Submit => self.submit_login(),
            LoginFocus::Guest => {
                self.sound.play_click();
                self.navigate(Route::Home);
            }
            LoginFocus::SignUpLink => {
                self.sound.play_click();
                self.navigate(Route::SignUp);
            }
        }
    }

    fn activate_signup(&mut self, focus: SignUpFocus) {
        match focus {
            SignUpFocus::Name | SignUpFocus::Email => self.signup.focus_next(),
            SignUpFocus::Password | SignUpFocus::Submit => self.submit_signup(),
            SignUpFocus::LoginLink => {
                self.sound.play_click();
                self.navigate(Route::Login);
            }
        }
    }

    fn submit_login(&mut self) {
        if self.login.is_busy() {
            return;
        }
        self.sound.play_click();
        let Some((email, password)) = self.login.credentials() else {
            self.toasts.error("Error", FILL_ALL_FIELDS);
            return;
        };
        self.login.set_busy(true);
        self.session.sign_in(email, password);
    }

    fn submit_signup(&mut self) {
        if self.signup.is_busy() {
            return;
        }
        self.sound.play_click();
        let Some(request) = self.signup.request() else {
            self.toasts.error("Error", FILL_ALL_FIELDS);
            return;
        };
        self.signup.set_busy(true);
        self.session.sign_up(request);
    }

    fn activate_settings_row(&mut self, row: SettingsRow) {
        match row {
            SettingsRow::Theme => {
                self.sound.play_click();
                self.theme.toggle(self.durable.as_ref());
            }
            SettingsRow::Sound => {
                if self.sound.is_muted() {
                    self.sound.set_muted(false);
                    self.sound.play_after(Cue::Click, UNMUTE_CLICK_DELAY);
                } else {
                    self.sound.play_click();
                    self.sound.set_muted(true);
                }
            }
            SettingsRow::Notifications => {
                self.sound.play_click();
                self.settings.toggle_notifications();
            }
            SettingsRow::Privacy | SettingsRow::Help | SettingsRow::About => {
                self.sound.play_click();
            }
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        let dropdown = self.hits.region_of(ClickTarget::Dropdown);
        let trigger = self.hits.region_of(ClickTarget::UserControl);
        self.dropdown
            .close_on_outside_click(dropdown, trigger, column, row);

        let Some(target) = self.hits.target_at(column, row) else {
            return;
        };
        match target {
            ClickTarget::Hamburger => self.toggle_menu(),
            ClickTarget::Mute => self.sound.toggle_mute(),
            ClickTarget::UserControl => self.activate_user_control(),
            ClickTarget::Dropdown | ClickTarget::MenuPanel => {}
            ClickTarget::DropdownSignOut => self.dropdown_sign_out(),
            ClickTarget::MenuBackdrop | ClickTarget::MenuClose => self.close_menu(),
            ClickTarget::MenuEntry(index) => {
                if self.menu.is_open() {
                    let len = self.menu_view().len();
                    self.menu.select(index, len);
                    self.activate_menu_entry(index);
                }
            }
            ClickTarget::Home(action) if *self.router.current() == Route::Home => {
                if let Some(idx) = self.home_actions().iter().position(|a| *a == action) {
                    self.home_focus = idx;
                }
                self.activate_home(action);
            }
            ClickTarget::Login(focus) if *self.router.current() == Route::Login => {
                self.login.set_focus(focus);
                if !matches!(focus, LoginFocus::Email | LoginFocus::Password) {
                    self.activate_login(focus);
                }
            }
            ClickTarget::LoginShowPassword if *self.router.current() == Route::Login => {
                self.login.toggle_show_password();
            }
            ClickTarget::SignUp(focus) if *self.router.current() == Route::SignUp => {
                self.signup.set_focus(focus);
                if matches!(focus, SignUpFocus::Submit | SignUpFocus::LoginLink) {
                    self.activate_signup(focus);
                }
            }
            ClickTarget::SignUpShowPassword if *self.router.current() == Route::SignUp => {
                self.signup.toggle_show_password();
            }
            ClickTarget::Settings(row) if *self.router.current() == Route::Settings => {
                self.settings.select(row);
                self.activate_settings_row(row);
            }
            ClickTarget::NotFoundHome if matches!(self.router.current(), Route::NotFound(_)) => {
                self.dispatch(Command::Home);
            }
            ClickTarget::NotFoundBack if matches!(self.router.current(), Route::NotFound(_)) => {
                self.dispatch(Command::Back);
            }
            // Stale region from a page that is no longer shown.
            ClickTarget::Home(_)
            | ClickTarget::Login(_)
            | ClickTarget::LoginShowPassword
            | ClickTarget::SignUp(_)
            | ClickTarget::SignUpShowPassword
            | ClickTarget::Settings(_)
            | ClickTarget::NotFoundHome
            | ClickTarget::NotFoundBack => {}
        }
    }

    pub(super) fn apply_auth_outcome(&mut self, outcome: AuthOutcome) {
        match outcome {
            AuthOutcome::SignedIn(result) => {
                self.login.set_busy(false);
                match result {
                    Ok(session) => {
                        tracing::info!(user = %session.id(), "Signed in");
                        self.toasts
                            .info("Welcome back!", "You have successfully signed in.");
                        self.navigate(Route::Home);
                    }
                    Err(err) => {
                        tracing::info!("Sign-in failed: {err}");
                        self.toasts.error(
                            AuthFlow::SignIn.failure_title(),
                            err.kind.message(AuthFlow::SignIn),
                        );
                    }
                }
            }
            AuthOutcome::SignedUp(result) => {
                self.signup.set_busy(false);
                match result {
                    Ok(session) => {
                        tracing::info!(user = %session.id(), "Account created");
                        self.toasts.info("Account created!", "Welcome to FitSyn.");
                        self.navigate(Route::Home);
                    }
                    Err(err) => {
                        tracing::info!("Sign-up failed: {err}");
                        self.toasts.error(
                            AuthFlow::SignUp.failure_title(),
                            err.kind.message(AuthFlow::SignUp),
                        );
                    }
                }
            }
            AuthOutcome::SignedOut { origin, result } => {
                if let Err(err) = result {
                    tracing::warn!("Sign-out failed: {err}");
                    self.toasts.error("Error", "Failed to sign out.");
                }
                match origin {
                    SignOutOrigin::Menu => self.menu.close(),
                    SignOutOrigin::Header => {
                        self.dropdown.close();
                        self.navigate(Route::Home);
                    }
                }
            }
            AuthOutcome::Restored(result) => match result {
                Ok(Some(session)) => tracing::info!(user = %session.id(), "Session restored"),
                Ok(None) => tracing::debug!("No session to restore"),
                Err(err) => tracing::warn!("Session restore failed: {err}"),
            },
        }
    }
}
