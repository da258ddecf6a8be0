//! Browser build configuration
//!
//! The API root is fixed at build time. Empty means same origin, which is the
//! layout `epiboard web` serves (bundle and `/api/v1` proxy on one port).

use std::time::Duration;

/// Path prefix of every backend endpoint
pub const API_PREFIX: &str = "/api/v1";

pub const DASHBOARD_REFRESH: Duration = Duration::from_secs(5 * 60);
pub const METRICS_REFRESH: Duration = Duration::from_secs(60);
pub const TOP_LIMIT: u32 = 10;
pub const TREND_DAYS: u32 = 30;
pub const DASHBOARD_TOP_COUNTRIES: usize = 5;

/// `EPIBOARD_API_ROOT` at build time, trailing slash trimmed
pub fn api_root() -> &'static str {
    option_env!("EPIBOARD_API_ROOT")
        .unwrap_or("")
        .trim_end_matches('/')
}

/// Full URL for an endpoint path such as `/covid/global`
pub fn endpoint(path: &str) -> String {
    format!("{}{}{}", api_root(), API_PREFIX, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_has_prefix() {
        assert!(endpoint("/covid/global").ends_with("/api/v1/covid/global"));
    }
}
