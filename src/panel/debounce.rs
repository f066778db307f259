use std::time::{Duration, Instant};

use crate::models::CompileRequest;

/// Coalesces rapid compile triggers into one outbound request. Each
/// `schedule` replaces whatever is pending, so only the snapshot taken at
/// the end of a burst survives the quiescence window. Deadline-based and
/// polled from the hub tick rather than timer-driven.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    deadline: Instant,
    request: CompileRequest,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replaces any not-yet-fired request and restarts the quiescence window.
    pub fn schedule(&mut self, now: Instant, request: CompileRequest) {
        self.pending = Some(Pending {
            deadline: now + self.window,
            request,
        });
    }

    /// Yields the pending request once the window has elapsed; at most once
    /// per schedule.
    pub fn poll(&mut self, now: Instant) -> Option<CompileRequest> {
        let deadline = self.pending.as_ref()?.deadline;
        if now < deadline {
            return None;
        }

        let overshoot = now.duration_since(deadline);
        if overshoot.as_millis() > 5 {
            tracing::debug!(
                overshoot_ms = overshoot.as_millis() as u64,
                "compile debounce overshoot"
            );
        }

        self.pending.take().map(|pending| pending.request)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
