// Superseding request control.
// At most one lookup per request class is in flight; beginning a new one
// cancels and invalidates the previous.

use tokio_util::sync::CancellationToken;

/// Tracks the in-flight request for one request class.
///
/// `begin` hands out a guard tied to a fresh cancellation token and cancels
/// whatever was still pending. `settle` accepts only the most recent guard,
/// so a response that ignored its cancellation signal is still discarded.
#[derive(Debug, Default)]
pub struct RequestSlot {
    next_seq: u64,
    active: Option<ActiveRequest>,
}

#[derive(Debug)]
struct ActiveRequest {
    seq: u64,
    token: CancellationToken,
}

/// Handle for a single in-flight request.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    seq: u64,
    token: CancellationToken,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, cancelling any still-pending predecessor.
    pub fn begin(&mut self) -> RequestGuard {
        if let Some(prev) = self.active.take() {
            prev.token.cancel();
        }
        self.next_seq += 1;
        let token = CancellationToken::new();
        self.active = Some(ActiveRequest {
            seq: self.next_seq,
            token: token.clone(),
        });
        RequestGuard {
            seq: self.next_seq,
            token,
        }
    }

    /// Mark a request as finished.
    ///
    /// Returns true and clears the slot when `guard` is still the active
    /// request. Superseded or already-settled guards return false; their
    /// results must be discarded, whether they succeeded or failed.
    pub fn settle(&mut self, guard: &RequestGuard) -> bool {
        match &self.active {
            Some(active) if active.seq == guard.seq => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Whether `guard` is still the active request.
    pub fn is_current(&self, guard: &RequestGuard) -> bool {
        self.active.as_ref().is_some_and(|a| a.seq == guard.seq)
    }

    /// Whether any request is in flight.
    pub fn pending(&self) -> bool {
        self.active.is_some()
    }

    /// Cancel and clear the active request, if any.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

impl RequestGuard {
    /// Resolves once this request has been superseded or torn down.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_cancels_previous() {
        let mut slot = RequestSlot::new();

        let first = slot.begin();
        assert!(!first.is_cancelled());

        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_settle_accepts_only_latest() {
        let mut slot = RequestSlot::new();

        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.is_current(&first));
        assert!(slot.is_current(&second));

        assert!(!slot.settle(&first));
        assert!(slot.settle(&second));

        // Settling is one-shot
        assert!(!slot.settle(&second));
        assert!(!slot.pending());
    }

    #[test]
    fn test_settle_after_newer_begin_is_rejected() {
        let mut slot = RequestSlot::new();

        let first = slot.begin();
        let second = slot.begin();

        // The stale guard resolving late must not clear the newer request
        assert!(!slot.settle(&first));
        assert!(slot.pending());
        assert!(slot.is_current(&second));
    }

    #[test]
    fn test_cancel_clears_active() {
        let mut slot = RequestSlot::new();

        let guard = slot.begin();
        slot.cancel();

        assert!(guard.is_cancelled());
        assert!(!slot.pending());
        assert!(!slot.settle(&guard));
    }

    #[test]
    fn test_cancel_without_active_is_noop() {
        let mut slot = RequestSlot::new();
        slot.cancel();
        assert!(!slot.pending());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves_on_supersede() {
        let mut slot = RequestSlot::new();

        let first = slot.begin();
        let _second = slot.begin();

        // Completes immediately because begin() already fired the token
        first.cancelled().await;
        assert!(first.is_cancelled());
    }
}
