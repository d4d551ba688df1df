//! Transient toast notifications.
//!
//! Toasts are UI feedback only: auth outcomes, validation failures. Each one
//! expires after the configured lifetime; the newest is rendered on top.

use std::collections::VecDeque;
use std::time::Duration;

const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    remaining: Duration,
}

impl Toast {
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    lifetime: Duration,
}

impl ToastQueue {
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime,
        }
    }

    pub fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        variant: ToastVariant,
    ) {
        let toast = Toast {
            title: title.into(),
            description: description.into(),
            variant,
            remaining: self.lifetime,
        };
        tracing::debug!(title = %toast.title, "Toast");
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title, description, ToastVariant::Default);
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title, description, ToastVariant::Destructive);
    }

    pub fn advance(&mut self, delta: Duration) {
        for toast in &mut self.toasts {
            toast.remaining = toast.remaining.saturating_sub(delta);
        }
        self.toasts.retain(|toast| !toast.remaining.is_zero());
    }

    /// Dismiss the newest toast.
    pub fn dismiss_latest(&mut self) {
        self.toasts.pop_back();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
