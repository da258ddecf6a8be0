//! Analytics series: per-country rankings and cumulative trend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metric selector for `/analytics/{metric}/...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cases,
    Deaths,
    Recovered,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cases, Metric::Deaths, Metric::Recovered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
        }
    }

    /// Translation key for tab labels
    pub fn label_key(&self) -> &'static str {
        match self {
            Metric::Cases => "analytics.cases",
            Metric::Deaths => "analytics.deaths",
            Metric::Recovered => "analytics.recovered",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cases" => Ok(Metric::Cases),
            "deaths" => Ok(Metric::Deaths),
            "recovered" => Ok(Metric::Recovered),
            other => Err(format!("Unknown metric '{}'", other)),
        }
    }
}

/// `{name, value}` pair from the top/new endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryValue {
    pub name: String,
    pub value: f64,
}

/// `{name, value}` pair from the trend endpoint (name is an ISO date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub name: String,
    pub value: f64,
}

/// Merged result of the three analytics calls for one metric
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsData {
    pub total_by_country: Vec<CountryValue>,
    pub new_by_country: Vec<CountryValue>,
    pub cumulative_trend: Vec<TrendPoint>,
}

impl AnalyticsData {
    pub fn is_empty(&self) -> bool {
        self.total_by_country.is_empty()
            && self.new_by_country.is_empty()
            && self.cumulative_trend.is_empty()
    }

    /// Largest value across both rankings, used to scale bars
    pub fn max_ranking_value(&self) -> f64 {
        self.total_by_country
            .iter()
            .chain(self.new_by_country.iter())
            .map(|c| c.value)
            .fold(0.0, f64::max)
    }
}
