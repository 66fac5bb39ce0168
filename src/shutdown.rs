//! The shutdown coordinator (ยง4.5): guaranteed post-processing exactly
//! once, whoever gets there first.
//!
//! A JVM-style process-wide shutdown hook has no direct Rust analog
//! (ยง9 Design Notes). This crate takes the explicitly sanctioned
//! fallback: "fold the responsibilities into the supervision loop's
//! finally-branch and a signal handler." Concretely, `Director::run`
//! races its own poll interval against `tokio::signal::ctrl_c()` on
//! every iteration; both the loop's normal termination check and the
//! signal branch call into the same `finish()` routine. Because the
//! Director's roster and writer are owned exclusively by the
//! supervision task (ยง5 Shared state), the actual post-processing body
//! always runs on that task; what [`ShutdownCoordinator`] provides is
//! the atomic claim that makes calling `finish()` from either of those
//! two race arms safe and idempotent.

// Layer 1: Standard library
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2/3: none

/// Guards post-processing so it runs at most once, regardless of
/// whether it is reached via normal loop exit, timeout, external
/// cancel, or (in embedded mode) an explicit stop request.
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    claimed: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// A fresh, unclaimed coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim post-processing.
    ///
    /// Returns `true` if this call won the race -- the equivalent of
    /// "hook removal succeeded" in ยง4.4: the caller is responsible for
    /// running post-processing. Returns `false` if another caller
    /// already claimed it; the caller MUST NOT duplicate post-processing
    /// in that case.
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// `true` iff post-processing has already been claimed by someone.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let coordinator = ShutdownCoordinator::new();
        assert!(coordinator.try_claim());
        assert!(coordinator.is_claimed());
    }

    #[test]
    fn test_second_claim_loses() {
        let coordinator = ShutdownCoordinator::new();
        assert!(coordinator.try_claim());
        assert!(!coordinator.try_claim());
    }

    #[test]
    fn test_claim_is_shared_across_clones() {
        let coordinator = ShutdownCoordinator::new();
        let clone = coordinator.clone();
        assert!(clone.try_claim());
        assert!(!coordinator.try_claim());
    }
}
