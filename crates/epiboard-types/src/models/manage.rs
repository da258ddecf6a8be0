//! Editable country totals: backend (`snake_case`) and frontend (`camelCase`) shapes

use serde::{Deserialize, Serialize};

/// Wire shape of `GET /covid/countries/manage` and `PUT /covid/countries/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryManage {
    pub id: String,
    pub country: String,
    pub total_cases: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
}

/// Table row used by the data management view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRow {
    pub id: String,
    pub country: String,
    pub total_cases: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
}

impl From<CountryManage> for CountryRow {
    fn from(m: CountryManage) -> Self {
        Self {
            id: m.id,
            country: m.country,
            total_cases: m.total_cases,
            total_deaths: m.total_deaths,
            total_recovered: m.total_recovered,
        }
    }
}

impl From<CountryRow> for CountryManage {
    fn from(r: CountryRow) -> Self {
        Self {
            id: r.id,
            country: r.country,
            total_cases: r.total_cases,
            total_deaths: r.total_deaths,
            total_recovered: r.total_recovered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_shape_field_names() {
        let wire = r#"{"id":"7","country":"Peru","total_cases":10,"total_deaths":2,"total_recovered":5}"#;
        let row: CountryRow = serde_json::from_str::<CountryManage>(wire).unwrap().into();
        let front = serde_json::to_value(&row).unwrap();
        assert_eq!(front["totalCases"], 10);

        let back = serde_json::to_value(CountryManage::from(row)).unwrap();
        assert_eq!(back["total_recovered"], 5);
    }
}
