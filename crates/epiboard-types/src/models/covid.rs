//! Read-only epidemiological statistics

use serde::{Deserialize, Serialize};

/// Worldwide totals from `GET /covid/global`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalStats {
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub new_confirmed: f64,
    pub new_deaths: f64,
    pub new_recovered: f64,
    pub last_updated: String,
}

impl GlobalStats {
    /// Split the timestamp into (date, time) for display
    pub fn last_updated_parts(&self) -> (String, String) {
        match self.last_updated.split_once('T') {
            Some((date, time)) => {
                let time = time
                    .split(['.', 'Z', '+'])
                    .next()
                    .unwrap_or_default()
                    .to_string();
                (date.to_string(), time)
            }
            None => (self.last_updated.clone(), String::new()),
        }
    }
}

/// One row of `GET /covid/countries/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub id: String,
    pub country: String,
    pub confirmed_total: f64,
    pub confirmed_new: f64,
    pub deaths_total: f64,
    pub deaths_new: f64,
}

/// A summary row plus metrics derived at render time
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDetail {
    pub summary: CountrySummary,
}

impl CountryDetail {
    /// Locate a country by id in a summary list
    pub fn find(list: &[CountrySummary], id: &str) -> Option<Self> {
        list.iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|summary| Self { summary })
    }

    /// Deaths as a percentage of confirmed cases
    pub fn fatality_rate(&self) -> Option<f64> {
        percentage(self.summary.deaths_total, self.summary.confirmed_total)
    }

    /// New cases as a percentage of confirmed cases
    pub fn new_case_rate(&self) -> Option<f64> {
        percentage(self.summary.confirmed_new, self.summary.confirmed_total)
    }
}

/// Case-insensitive substring match on the country name
pub fn search_countries<'a>(list: &'a [CountrySummary], term: &str) -> Vec<&'a CountrySummary> {
    let needle = term.trim().to_lowercase();
    list.iter()
        .filter(|c| needle.is_empty() || c.country.to_lowercase().contains(&needle))
        .collect()
}

/// Highest confirmed totals first
pub fn top_by_confirmed(list: &[CountrySummary], n: usize) -> Vec<CountrySummary> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| b.confirmed_total.total_cmp(&a.confirmed_total));
    sorted.truncate(n);
    sorted
}

pub(crate) fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole > 0.0 {
        Some(part * 100.0 / whole)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, confirmed: f64, new: f64, deaths: f64) -> CountrySummary {
        CountrySummary {
            id: id.to_string(),
            country: format!("Country {}", id),
            confirmed_total: confirmed,
            confirmed_new: new,
            deaths_total: deaths,
            deaths_new: 0.0,
        }
    }

    #[test]
    fn test_detail_rates() {
        let list = vec![summary("1", 1000.0, 50.0, 25.0), summary("2", 10.0, 1.0, 1.0)];
        let detail = CountryDetail::find(&list, "1").unwrap();
        assert_eq!(detail.fatality_rate(), Some(2.5));
        assert_eq!(detail.new_case_rate(), Some(5.0));
    }

    #[test]
    fn test_detail_not_found_and_zero_confirmed() {
        let list = vec![summary("1", 0.0, 0.0, 0.0)];
        assert!(CountryDetail::find(&list, "9").is_none());
        let detail = CountryDetail::find(&list, "1").unwrap();
        assert_eq!(detail.fatality_rate(), None);
        assert_eq!(detail.new_case_rate(), None);
    }

    #[test]
    fn test_search_and_top() {
        let mut list = vec![summary("1", 10.0, 0.0, 0.0), summary("2", 30.0, 0.0, 0.0)];
        list.push(CountrySummary {
            country: "Saint Lucia".to_string(),
            ..summary("3", 20.0, 0.0, 0.0)
        });
        assert_eq!(search_countries(&list, "LUC").len(), 1);
        assert_eq!(search_countries(&list, "").len(), 3);
        assert_eq!(search_countries(&list, "country").len(), 2);

        let top = top_by_confirmed(&list, 2);
        assert_eq!(top.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["2", "3"]);
    }

    #[test]
    fn test_last_updated_parts() {
        let stats = GlobalStats {
            last_updated: "2024-03-01T12:30:05.123456".to_string(),
            ..Default::default()
        };
        assert_eq!(
            stats.last_updated_parts(),
            ("2024-03-01".to_string(), "12:30:05".to_string())
        );

        let plain = GlobalStats {
            last_updated: "2024-03-01".to_string(),
            ..Default::default()
        };
        assert_eq!(plain.last_updated_parts().1, "");
    }
}
