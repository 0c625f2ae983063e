//! Single-use latch limiting a process to one migration run.

use crate::error::{MigrateError, MigrateResult};
use std::sync::Mutex;

/// Lifecycle of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotRun,
    Running,
    Succeeded,
    Failed,
}

/// Check-and-set latch guarding the migration engine.
///
/// The first caller of [`acquire`](Self::acquire) moves the guard from
/// `NotRun` to `Running`; every later caller fails with
/// [`MigrateError::AlreadyRun`], whatever the outcome of the first run.
#[derive(Debug)]
pub struct RunGuard {
    state: Mutex<RunState>,
}

static GLOBAL_GUARD: RunGuard = RunGuard::new();

impl RunGuard {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RunState::NotRun),
        }
    }

    /// The process-wide guard used by [`crate::migrate`] and friends.
    pub fn global() -> &'static RunGuard {
        &GLOBAL_GUARD
    }

    /// Claim the guard for a run.
    pub fn acquire(&self) -> MigrateResult<()> {
        let mut state = self.state.lock().map_err(|_| MigrateError::GuardPoisoned)?;
        if *state != RunState::NotRun {
            return Err(MigrateError::AlreadyRun);
        }
        *state = RunState::Running;
        Ok(())
    }

    /// Record how the claimed run ended.
    pub fn finish(&self, succeeded: bool) {
        if let Ok(mut state) = self.state.lock() {
            *state = if succeeded {
                RunState::Succeeded
            } else {
                RunState::Failed
            };
        }
    }

    pub fn state(&self) -> RunState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(RunState::Failed)
    }

    /// Return the guard to `NotRun`.
    ///
    /// Meant for tests and for hosts that own a private guard; the global
    /// guard is never reset by the engine.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = RunState::NotRun;
        }
    }
}

impl Default for RunGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_acquire_wins() {
        let guard = RunGuard::new();
        assert_eq!(guard.state(), RunState::NotRun);
        guard.acquire().unwrap();
        assert_eq!(guard.state(), RunState::Running);
        assert!(matches!(guard.acquire(), Err(MigrateError::AlreadyRun)));
    }

    #[test]
    fn test_failed_run_still_latches() {
        let guard = RunGuard::new();
        guard.acquire().unwrap();
        guard.finish(false);
        assert_eq!(guard.state(), RunState::Failed);
        assert!(matches!(guard.acquire(), Err(MigrateError::AlreadyRun)));
    }

    #[test]
    fn test_reset() {
        let guard = RunGuard::new();
        guard.acquire().unwrap();
        guard.finish(true);
        guard.reset();
        guard.acquire().unwrap();
    }

    #[test]
    fn test_concurrent_acquire_single_winner() {
        let guard = Arc::new(RunGuard::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || guard.acquire().is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
