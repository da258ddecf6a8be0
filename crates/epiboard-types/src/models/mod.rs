//! Records exchanged with the backend API

pub mod analytics;
pub mod auth;
pub mod covid;
pub mod manage;
pub mod prediction;

pub use analytics::{AnalyticsData, CountryValue, Metric, TrendPoint};
pub use auth::{AuthenticatedUser, LoginRequest, LoginResponse, Role, User};
pub use covid::{search_countries, top_by_confirmed, CountryDetail, CountrySummary, GlobalStats};
pub use manage::{CountryManage, CountryRow};
pub use prediction::{InputRow, Metadata, ModelMetric, PredictionOut};
