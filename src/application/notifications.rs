//! Transient user notifications ("toasts").

use super::scheduler::Clock;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier {
    fn notify(&mut self, message: &str);

    fn notify_error(&mut self, message: &str) {
        self.notify(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Stack of toasts, oldest first, each expiring after a fixed duration.
///
/// When the stack is full the oldest toast is dropped to make room.
pub struct ToastQueue {
    clock: Rc<dyn Clock>,
    duration: Duration,
    capacity: usize,
    toasts: VecDeque<Toast>,
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("duration", &self.duration)
            .field("capacity", &self.capacity)
            .field("toasts", &self.toasts)
            .finish()
    }
}

impl ToastQueue {
    pub fn new(clock: Rc<dyn Clock>, duration: Duration, capacity: usize) -> Self {
        Self {
            clock,
            duration,
            capacity: capacity.max(1),
            toasts: VecDeque::new(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Drops every toast whose time is up.
    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    fn push(&mut self, message: &str, level: ToastLevel) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            message: message.to_string(),
            level,
            expires_at: self.clock.now() + self.duration,
        });
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, message: &str) {
        self.push(message, ToastLevel::Success);
    }

    fn notify_error(&mut self, message: &str) {
        self.push(message, ToastLevel::Error);
    }
}

/// Notifier that keeps every message; for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
