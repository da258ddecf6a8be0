//! epiboard-types - Shared data types for epiboard
//!
//! Pure data structures and state machines without heavy dependencies.
//! No tokio, no async runtime, no HTTP client: everything here compiles
//! for both the native runtime and the wasm32 browser bundle.
//!
//! Used by:
//! - epiboard-core (native API client, session store, loaders)
//! - epiboard-web (browser frontend)
//! - epiboard (CLI)

pub mod auth_guard;
pub mod error;
pub mod fetch;
pub mod format;
pub mod guard;
pub mod i18n;
pub mod models;
pub mod permissions;
pub mod prediction;
pub mod session;
pub mod storage;
pub mod table;

pub use auth_guard::{RedirectGuard, LOGIN_PATH};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use fetch::{FetchReport, LoadState, SectionFailure};
pub use guard::{guard_decision, GuardDecision};
pub use i18n::{translate, translate_with, Language};
pub use models::{
    AnalyticsData, AuthenticatedUser, CountryDetail, CountryManage, CountryRow, CountrySummary,
    CountryValue, GlobalStats, InputRow, LoginRequest, LoginResponse, Metadata, Metric,
    ModelMetric, PredictionOut, Role, TrendPoint, User,
};
pub use models::{search_countries, top_by_confirmed};
pub use permissions::{allowed_routes, can_access, home_route, CountryCode, RouteKey};
pub use prediction::{FormField, FormPhase, PredictionForm, PredictionView};
pub use session::{Session, SessionStatus};
pub use storage::{clear_credentials, restore_session, DurableStorage, StorageError, StorageKey};
pub use table::{DraftField, EditDraft, ManageTable, SortColumn, SortConfig, SortDirection};
