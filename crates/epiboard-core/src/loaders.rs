//! Page data loaders
//!
//! Single-resource pages fail fast: the call's error is the page's error.
//! Multi-resource pages issue their calls in parallel and settle each one
//! independently; the page only fails when every call failed.

use crate::api::ApiClient;
use chrono::{DateTime, Utc};
use epiboard_types::{
    top_by_confirmed, AnalyticsData, ApiResult, CountryDetail, CountrySummary, FetchReport,
    GlobalStats, Metric, ModelMetric,
};
use tracing::{debug, warn};

/// Dashboard: global totals plus the per-country summary
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub global: Option<GlobalStats>,
    pub countries: Vec<CountrySummary>,
    pub report: FetchReport,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardPage {
    pub fn top_countries(&self, n: usize) -> Vec<CountrySummary> {
        top_by_confirmed(&self.countries, n)
    }
}

/// Analytics for one metric
#[derive(Debug, Clone)]
pub struct AnalyticsPage {
    pub metric: Metric,
    pub data: AnalyticsData,
    pub report: FetchReport,
}

fn log_degraded(page: &str, report: &FetchReport) {
    for failure in &report.failures {
        warn!(
            page,
            section = failure.section,
            kind = ?failure.error.kind,
            error = %failure.error,
            "Section degraded to empty"
        );
    }
}

/// Settle a report: every section failed means the page failed
fn finish<T>(page: &str, report: &FetchReport, value: T) -> ApiResult<T> {
    log_degraded(page, report);
    match report.failures.first() {
        Some(first) if report.all_failed() => Err(first.error.clone()),
        _ => Ok(value),
    }
}

pub async fn load_dashboard(api: &ApiClient) -> ApiResult<DashboardPage> {
    let (global, countries) = tokio::join!(api.global_stats(), api.countries_summary());

    let mut report = FetchReport::new();
    let global = report.settle("global", global.map(Some));
    let countries = report.settle("countries", countries);
    debug!(countries = countries.len(), "Dashboard loaded");

    let page = DashboardPage {
        global,
        countries,
        fetched_at: Utc::now(),
        report: report.clone(),
    };
    finish("dashboard", &report, page)
}

pub async fn load_countries(api: &ApiClient) -> ApiResult<Vec<CountrySummary>> {
    api.countries_summary().await
}

/// `Ok(None)` when the id is absent from the summary list
pub async fn load_country_detail(api: &ApiClient, id: &str) -> ApiResult<Option<CountryDetail>> {
    let list = api.countries_summary().await?;
    let detail = CountryDetail::find(&list, id);
    if detail.is_none() {
        debug!(id, "Country not found in summary");
    }
    Ok(detail)
}

pub async fn load_analytics(
    api: &ApiClient,
    metric: Metric,
    top_limit: u32,
    trend_days: u32,
) -> ApiResult<AnalyticsPage> {
    let (top, new, trend) = tokio::join!(
        api.analytics_top(metric, top_limit),
        api.analytics_new(metric, top_limit),
        api.analytics_trend(metric, trend_days),
    );

    let mut report = FetchReport::new();
    let data = AnalyticsData {
        total_by_country: report.settle("top", top),
        new_by_country: report.settle("new", new),
        cumulative_trend: report.settle("trend", trend),
    };

    let page = AnalyticsPage {
        metric,
        data,
        report: report.clone(),
    };
    finish("analytics", &report, page)
}

pub async fn load_model_metrics(api: &ApiClient) -> ApiResult<Vec<ModelMetric>> {
    api.model_metrics().await
}
