//! epiboard-core - Native runtime for the epiboard dashboard
//!
//! Provides:
//! - Configuration loading (file + environment)
//! - Durable storage backends for the session keys
//! - Session store with change subscription
//! - HTTP API client with bearer injection and forced logout on 401/403
//! - Page loaders (fail-fast and all-settled) and the dashboard poller

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod loaders;
pub mod manage;
pub mod navigation;
pub mod poller;
pub mod prediction;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::CoreError;
pub use event::{EventBus, SessionEvent};
pub use loaders::{AnalyticsPage, DashboardPage};
pub use manage::DataManager;
pub use navigation::{Navigator, RouteTracker};
pub use poller::Poller;
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage};
