use std::time::{Duration, Instant};

use crate::store::TaskError;

pub const DEFAULT_LIFETIME: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing message describing the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Notice {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }
}

impl From<&TaskError> for Notice {
    fn from(err: &TaskError) -> Self {
        Notice::error(err.to_string())
    }
}

/// Single-slot transient notification.
///
/// Showing a notice replaces whatever is displayed and restarts the
/// deadline, so the latest notice always wins.
#[derive(Debug)]
pub struct Toast {
    current: Option<(Notice, Instant)>,
    lifetime: Duration,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

impl Toast {
    pub fn new(lifetime: Duration) -> Self {
        Toast {
            current: None,
            lifetime,
        }
    }

    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now + self.lifetime));
    }

    /// Clear the slot once its deadline has passed. Returns `true` if a
    /// notice was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.current {
            Some((_, deadline)) if now >= deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }
}
