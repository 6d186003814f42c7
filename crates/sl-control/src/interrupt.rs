//! Emergency pause/resume signalling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the emergency signal asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptRequest {
    /// Freeze every operation in place.
    Pause,
    /// Continue whatever was frozen.
    Resume,
}

/// Shared emergency line.
///
/// Clones observe the same request. The controller checks it on every
/// polling iteration; an external thread raises it with
/// [`InterruptLine::request`] while an operation is running.
#[derive(Clone, Debug, Default)]
pub struct InterruptLine {
    pause: Arc<AtomicBool>,
}

impl InterruptLine {
    /// A line with no pause requested.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, request: InterruptRequest) {
        self.pause
            .store(request == InterruptRequest::Pause, Ordering::SeqCst);
    }

    pub fn pause_requested(&self) -> bool {
        self.pause.load(Ordering::SeqCst)
    }

    /// Request currently on the line.
    pub fn current(&self) -> InterruptRequest {
        if self.pause_requested() {
            InterruptRequest::Pause
        } else {
            InterruptRequest::Resume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_request() {
        let line = InterruptLine::new();
        let remote = line.clone();
        assert_eq!(line.current(), InterruptRequest::Resume);

        remote.request(InterruptRequest::Pause);
        assert!(line.pause_requested());

        line.request(InterruptRequest::Resume);
        assert!(!remote.pause_requested());
    }

    #[test]
    fn repeated_requests_are_idempotent() {
        let line = InterruptLine::new();
        line.request(InterruptRequest::Pause);
        line.request(InterruptRequest::Pause);
        assert_eq!(line.current(), InterruptRequest::Pause);
    }
}
