//! Floating notification stack shown in the top-right corner of the dashboard.
//!
//! A toast starts either as `Loading` (updated in place once the action
//! settles) or directly as a final `Success`/`Error`/`Info`. Final toasts
//! auto-close after [`AUTO_CLOSE`]; loading toasts stay until updated.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

pub const AUTO_CLOSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Local>,
    shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant, auto_close: Duration) -> bool {
        self.kind != ToastKind::Loading && now.duration_since(self.shown_at) >= auto_close
    }
}

#[derive(Debug)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
    auto_close: Duration,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(AUTO_CLOSE)
    }
}

impl ToastStack {
    pub fn new(auto_close: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            auto_close,
        }
    }

    fn push(&mut self, kind: ToastKind, message: String) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message,
            created_at: Local::now(),
            shown_at: Instant::now(),
        });
        id
    }

    pub fn loading(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Loading, message.into())
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Success, message.into())
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Error, message.into())
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Info, message.into())
    }

    /// Replace a toast's kind and text in place and restart its auto-close
    /// timer. Falls back to pushing a new toast if `id` was already dismissed.
    pub fn update(&mut self, id: ToastId, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) => {
                toast.kind = kind;
                toast.message = message;
                toast.shown_at = Instant::now();
            }
            None => {
                self.push(kind, message);
            }
        }
    }

    /// Settle a loading toast as an error. The loading toast is
    /// replaced so a failed action never leaves a spinner behind.
    pub fn fail(&mut self, id: ToastId, message: impl Into<String>) {
        self.update(id, ToastKind::Error, message);
    }

    pub fn dismiss_all(&mut self) {
        self.toasts.clear();
    }

    pub fn prune_expired(&mut self, now: Instant) {
        let auto_close = self.auto_close;
        self.toasts.retain(|t| !t.is_expired(now, auto_close));
    }

    /// Newest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().rev()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
