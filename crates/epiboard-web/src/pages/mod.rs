//! Page components

mod analytics;
mod countries;
mod country_detail;
mod dashboard;
mod data_management;
mod login;
mod prediction;

pub use analytics::Analytics;
pub use countries::Countries;
pub use country_detail::CountryDetailPage;
pub use dashboard::Dashboard;
pub use data_management::DataManagement;
pub use login::Login;
pub use prediction::Prediction;
