//! Prediction endpoint payloads and model quality metrics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature vector sent to `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InputRow {
    #[serde(rename = "Confirmed")]
    pub confirmed: i64,
    #[serde(rename = "Deaths")]
    pub deaths: i64,
    #[serde(rename = "Recovered")]
    pub recovered: i64,
    #[serde(rename = "Active")]
    pub active: i64,
    #[serde(rename = "New_cases")]
    pub new_cases: i64,
    #[serde(rename = "New_recovered")]
    pub new_recovered: i64,
    pub date: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "WHO_Region")]
    pub who_region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionOut {
    pub pred_new_deaths: f64,
}

/// Controlled vocabulary for the region and country selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Metadata {
    pub who_regions: Vec<String>,
    #[serde(default)]
    pub countries_by_region: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    /// Countries for a region; unknown regions yield an empty list
    pub fn countries_in(&self, region: &str) -> Vec<String> {
        self.countries_by_region
            .get(region)
            .cloned()
            .unwrap_or_default()
    }
}

/// One evaluation row from `GET /metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetric {
    pub date: String,
    #[serde(alias = "rmse_log")]
    pub rmse: f64,
    pub r2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_row_wire_names() {
        let row = InputRow {
            confirmed: 10,
            who_region: "Europe".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Confirmed"], 10);
        assert_eq!(json["WHO_Region"], "Europe");
        assert_eq!(json["New_cases"], 0);
    }

    #[test]
    fn test_metric_accepts_rmse_log() {
        let m: ModelMetric =
            serde_json::from_str(r#"{"date":"2024-01-01","rmse_log":0.5,"r2":0.9}"#).unwrap();
        assert_eq!(m.rmse, 0.5);
        let m: ModelMetric =
            serde_json::from_str(r#"{"date":"2024-01-01","rmse":0.7,"r2":0.8}"#).unwrap();
        assert_eq!(m.rmse, 0.7);
    }

    #[test]
    fn test_unknown_region_is_empty() {
        let meta = Metadata::default();
        assert!(meta.countries_in("Mars").is_empty());
    }
}
