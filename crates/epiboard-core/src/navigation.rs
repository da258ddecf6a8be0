//! Navigation seam used by the forced-logout path
//!
//! The browser implements this with `window.location`; the native client
//! tracks the route of the command being executed.

use parking_lot::RwLock;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// In-process route holder
#[derive(Debug)]
pub struct RouteTracker {
    current: RwLock<String>,
    history: RwLock<Vec<String>>,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new("/")
    }
}

impl RouteTracker {
    pub fn new(initial: &str) -> Self {
        Self {
            current: RwLock::new(initial.to_string()),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Paths navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.read().clone()
    }

    pub fn is_at(&self, path: &str) -> bool {
        *self.current.read() == path
    }
}

impl Navigator for RouteTracker {
    fn current_path(&self) -> String {
        self.current.read().clone()
    }

    fn navigate(&self, path: &str) {
        let from = self.current_path();
        info!(from = %from, to = path, "Navigating");
        *self.current.write() = path.to_string();
        self.history.write().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_tracker_records_history() {
        let tracker = RouteTracker::new("/analytics");
        tracker.navigate("/login");
        assert!(tracker.is_at("/login"));
        assert_eq!(tracker.history(), vec!["/login".to_string()]);
    }
}
