//! Idempotent redirect latch for the forced-logout path
//!
//! Several requests may fail with 401/403 at the same time. Only the first
//! one performs the redirect; the latch re-arms on the next successful login.

use std::sync::atomic::{AtomicBool, Ordering};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Default)]
pub struct RedirectGuard {
    fired: AtomicBool,
}

impl RedirectGuard {
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Returns true exactly once per armed period, and never while already on the login route
    pub fn should_redirect(&self, current_path: &str) -> bool {
        if current_path.trim_end_matches('/') == LOGIN_PATH {
            return false;
        }
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn rearm(&self) {
        self.fired.store(false, Ordering::Release);
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
