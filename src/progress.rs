//! Best-effort progress messages.
//!
//! Sinks must never block the pull path or fail it: a full or disconnected
//! channel drops the message.

use std::sync::mpsc::{Sender, SyncSender};

/// Receives human-readable progress messages.
pub trait ProgressSink {
    /// Deliver one message. Must not block indefinitely.
    fn send(&self, message: String);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn send(&self, _message: String) {}
}

/// Forwards messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn send(&self, message: String) {
        tracing::info!("{}", message);
    }
}

impl ProgressSink for Sender<String> {
    fn send(&self, message: String) {
        let _ = Sender::send(self, message);
    }
}

impl ProgressSink for SyncSender<String> {
    fn send(&self, message: String) {
        // try_send: a full bounded channel must not stall reading
        let _ = self.try_send(message);
    }
}
