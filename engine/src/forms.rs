//! Login and sign-up form state.
//!
//! Forms keep their field values across failed submissions so the user can
//! correct and retry. While a request is in flight the form is busy and
//! ignores edits.

use fitsyn_identity::SignUpRequest;
use fitsyn_types::SecretString;
use unicode_segmentation::UnicodeSegmentation;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

const MAX_FIELD_LEN: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
}

impl TextField {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        if c.is_control() || self.value.len() >= MAX_FIELD_LEN {
            return;
        }
        self.value.push(c);
    }

    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push(c);
        }
    }

    /// Remove the last grapheme cluster.
    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.value.grapheme_indices(true).next_back() {
            self.value.truncate(idx);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of grapheme clusters, used for password masking.
    #[must_use]
    pub fn grapheme_len(&self) -> usize {
        self.value.graphemes(true).count()
    }
}

/// Focusable elements in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Submit,
    Guest,
    SignUpLink,
}

impl LoginFocus {
    const ORDER: [Self; 5] = [
        Self::Email,
        Self::Password,
        Self::Submit,
        Self::Guest,
        Self::SignUpLink,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpFocus {
    Name,
    Email,
    Password,
    Submit,
    LoginLink,
}

impl SignUpFocus {
    const ORDER: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Password,
        Self::Submit,
        Self::LoginLink,
    ];
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, forward: bool) -> T {
    let idx = order.iter().position(|f| *f == current).unwrap_or(0);
    let len = order.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    order[next]
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: TextField,
    pub password: TextField,
    focus: LoginFocus,
    show_password: bool,
    busy: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: TextField::default(),
            password: TextField::default(),
            focus: LoginFocus::Email,
            show_password: false,
            busy: false,
        }
    }
}

impl LoginForm {
    #[must_use]
    pub fn focus(&self) -> LoginFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: LoginFocus) {
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(&LoginFocus::ORDER, self.focus, true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = cycle(&LoginFocus::ORDER, self.focus, false);
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            LoginFocus::Email => Some(&mut self.email),
            LoginFocus::Password => Some(&mut self.password),
            LoginFocus::Submit | LoginFocus::Guest | LoginFocus::SignUpLink => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.push(c);
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.push_str(text);
        }
    }

    pub fn backspace(&mut self) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.backspace();
        }
    }

    #[must_use]
    pub fn show_password(&self) -> bool {
        self.show_password
    }

    pub fn toggle_show_password(&mut self) {
        self.show_password = !self.show_password;
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Credentials to submit, or `None` when a field is empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(String, SecretString)> {
        if self.email.is_empty() || self.password.is_empty() {
            return None;
        }
        Some((
            self.email.as_str().trim().to_string(),
            SecretString::new(self.password.as_str()),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    focus: SignUpFocus,
    show_password: bool,
    busy: bool,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            name: TextField::default(),
            email: TextField::default(),
            password: TextField::default(),
            focus: SignUpFocus::Name,
            show_password: false,
            busy: false,
        }
    }
}

impl SignUpForm {
    #[must_use]
    pub fn focus(&self) -> SignUpFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: SignUpFocus) {
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(&SignUpFocus::ORDER, self.focus, true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = cycle(&SignUpFocus::ORDER, self.focus, false);
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            SignUpFocus::Name => Some(&mut self.name),
            SignUpFocus::Email => Some(&mut self.email),
            SignUpFocus::Password => Some(&mut self.password),
            SignUpFocus::Submit | SignUpFocus::LoginLink => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.push(c);
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.push_str(text);
        }
    }

    pub fn backspace(&mut self) {
        if self.busy {
            return;
        }
        if let Some(field) = self.focused_field() {
            field.backspace();
        }
    }

    #[must_use]
    pub fn show_password(&self) -> bool {
        self.show_password
    }

    pub fn toggle_show_password(&mut self) {
        self.show_password = !self.show_password;
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// The sign-up request, or `None` when a field is empty.
    #[must_use]
    pub fn request(&self) -> Option<SignUpRequest> {
        if self.name.as_str().trim().is_empty() || self.email.is_empty() || self.password.is_empty()
        {
            return None;
        }
        Some(SignUpRequest {
            display_name: self.name.as_str().trim().to_string(),
            email: self.email.as_str().trim().to_string(),
            password: SecretString::new(self.password.as_str()),
        })
    }
}
