//! Country codes, route keys and the static permission table
//!
//! Every user operates under one country profile. Each profile has a fixed
//! allow-list of routes; lookups are pure and synchronous.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Country profile a user operates under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CountryCode {
    #[default]
    Usa,
    Fr,
    Ch,
}

impl CountryCode {
    pub const ALL: [CountryCode; 3] = [CountryCode::Usa, CountryCode::Fr, CountryCode::Ch];

    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Usa => "usa",
            CountryCode::Fr => "fr",
            CountryCode::Ch => "ch",
        }
    }

    /// Human-readable name for selectors
    pub fn display_name(&self) -> &'static str {
        match self {
            CountryCode::Usa => "United States",
            CountryCode::Fr => "France",
            CountryCode::Ch => "Switzerland",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usa" | "us" => Ok(CountryCode::Usa),
            "fr" => Ok(CountryCode::Fr),
            "ch" => Ok(CountryCode::Ch),
            other => Err(format!("Unknown country code '{}' (expected usa, fr or ch)", other)),
        }
    }
}

/// Stable identifier for a navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKey {
    Dashboard,
    Countries,
    CountryDetail,
    Analytics,
    DataManagement,
    Prediction,
}

impl RouteKey {
    pub const ALL: [RouteKey; 6] = [
        RouteKey::Dashboard,
        RouteKey::Countries,
        RouteKey::CountryDetail,
        RouteKey::Analytics,
        RouteKey::DataManagement,
        RouteKey::Prediction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKey::Dashboard => "dashboard",
            RouteKey::Countries => "countries",
            RouteKey::CountryDetail => "country-detail",
            RouteKey::Analytics => "analytics",
            RouteKey::DataManagement => "data-management",
            RouteKey::Prediction => "prediction",
        }
    }

    /// Router path (parameterised for the detail page)
    pub fn path(&self) -> &'static str {
        match self {
            RouteKey::Dashboard => "/",
            RouteKey::Countries => "/countries",
            RouteKey::CountryDetail => "/countries/:id",
            RouteKey::Analytics => "/analytics",
            RouteKey::DataManagement => "/data-management",
            RouteKey::Prediction => "/prediction",
        }
    }

    /// Resolve a concrete location path to its route key
    pub fn from_path(path: &str) -> Option<RouteKey> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(RouteKey::Dashboard),
            "/countries" => Some(RouteKey::Countries),
            "/analytics" => Some(RouteKey::Analytics),
            "/data-management" => Some(RouteKey::DataManagement),
            "/prediction" => Some(RouteKey::Prediction),
            _ => trimmed
                .strip_prefix("/countries/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|_| RouteKey::CountryDetail),
        }
    }

    /// Translation key for navigation labels
    pub fn label_key(&self) -> &'static str {
        match self {
            RouteKey::Dashboard => "sidebar.dashboard",
            RouteKey::Countries => "sidebar.countries",
            RouteKey::CountryDetail => "sidebar.countries",
            RouteKey::Analytics => "sidebar.analytics",
            RouteKey::DataManagement => "sidebar.dataManagement",
            RouteKey::Prediction => "sidebar.prediction",
        }
    }

    /// Whether the route appears as a navigation entry
    pub fn in_navigation(&self) -> bool {
        !matches!(self, RouteKey::CountryDetail)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const USA_ROUTES: &[RouteKey] = &RouteKey::ALL;

const FR_ROUTES: &[RouteKey] = &[
    RouteKey::Dashboard,
    RouteKey::Countries,
    RouteKey::CountryDetail,
    RouteKey::Analytics,
    RouteKey::Prediction,
];

const CH_ROUTES: &[RouteKey] = &[RouteKey::Prediction];

/// Allow-list for a country, in navigation order
pub fn allowed_routes(country: CountryCode) -> &'static [RouteKey] {
    match country {
        CountryCode::Usa => USA_ROUTES,
        CountryCode::Fr => FR_ROUTES,
        CountryCode::Ch => CH_ROUTES,
    }
}

pub fn can_access(country: CountryCode, route: RouteKey) -> bool {
    allowed_routes(country).contains(&route)
}

/// Fallback destination for a user hitting a route outside their allow-list
pub fn home_route(country: CountryCode) -> RouteKey {
    allowed_routes(country)
        .first()
        .copied()
        .unwrap_or(RouteKey::Prediction)
}
