//! CLI helpers: route gating, output formats and table rendering
//!
//! Every page-equivalent command passes through [`gate`], the same decision
//! the browser route guard makes.

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use epiboard_core::{AnalyticsPage, DashboardPage};
use epiboard_types::format::{format_count, format_percent};
use epiboard_types::{
    allowed_routes, guard_decision, CountryCode, CountryDetail, CountryRow, CountrySummary,
    CountryValue, GuardDecision, ModelMetric, PredictionView, RouteKey, Session, SortConfig,
};
use serde_json::json;
use std::time::Duration;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    NotLoggedIn,
    Forbidden {
        route: RouteKey,
        country: CountryCode,
        home: RouteKey,
    },
    SessionExpired {
        status: Option<u16>,
    },
    NotFound {
        what: &'static str,
        id: String,
    },
    InvalidInput(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NotLoggedIn => {
                write!(f, "Not logged in. Run 'epiboard login <username>' first.")
            }
            CliError::Forbidden {
                route,
                country,
                home,
            } => {
                write!(
                    f,
                    "The {} page is not available for {}. Try 'epiboard {}'.",
                    route,
                    country.display_name(),
                    command_for(*home)
                )
            }
            CliError::SessionExpired { status } => match status {
                Some(code) => write!(
                    f,
                    "Session rejected by the server (HTTP {}). Run 'epiboard login' again.",
                    code
                ),
                None => write!(f, "Session expired. Run 'epiboard login' again."),
            },
            CliError::NotFound { what, id } => write!(f, "{} '{}' not found", what, id),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

// ============================================================================
// Route gating
// ============================================================================

/// Guard decision for a command; `Loading` cannot happen after hydration
pub fn gate(session: &Session, route: RouteKey) -> Result<(), CliError> {
    match guard_decision(session, route) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Loading | GuardDecision::RedirectLogin => Err(CliError::NotLoggedIn),
        GuardDecision::RedirectHome(home) => Err(CliError::Forbidden {
            route,
            country: session.country().unwrap_or_default(),
            home,
        }),
    }
}

/// Command that opens a route
pub fn command_for(route: RouteKey) -> &'static str {
    match route {
        RouteKey::Dashboard => "stats",
        RouteKey::Countries => "countries",
        RouteKey::CountryDetail => "country <id>",
        RouteKey::Analytics => "analytics",
        RouteKey::DataManagement => "manage list",
        RouteKey::Prediction => "predict",
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == OutputFormat::Json
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

// ============================================================================
// Formatters
// ============================================================================

pub fn format_whoami(session: &Session, json: bool) -> String {
    let Some(user) = session.user.as_ref().filter(|_| session.is_authenticated()) else {
        return if json {
            to_json(&json!({ "authenticated": false }))
        } else {
            "Not logged in.".to_string()
        };
    };
    let routes: Vec<&str> = allowed_routes(user.country)
        .iter()
        .map(|r| r.as_str())
        .collect();

    if json {
        return to_json(&json!({
            "authenticated": true,
            "user": user,
            "allowed_routes": routes,
        }));
    }

    let mut lines = vec![];
    lines.push(format!("User:     {}", user.username));
    if !user.email.is_empty() {
        lines.push(format!("Email:    {}", user.email));
    }
    lines.push(format!("Role:     {}", user.role));
    lines.push(format!(
        "Country:  {} ({})",
        user.country.display_name(),
        user.country
    ));
    lines.push(format!("Pages:    {}", routes.join(", ")));
    lines.join("\n")
}

pub fn format_dashboard(page: &DashboardPage, top: usize, json: bool, no_color: bool) -> String {
    let top_countries = page.top_countries(top);
    if json {
        return to_json(&json!({
            "global": page.global,
            "top_countries": top_countries,
            "failed_sections": page.report.failures.iter().map(|f| f.section).collect::<Vec<_>>(),
            "fetched_at": page.fetched_at.to_rfc3339(),
        }));
    }

    let mut out = vec![];
    match &page.global {
        Some(global) => {
            let (date, time) = global.last_updated_parts();
            out.push("Global overview".to_string());
            out.push("===============".to_string());
            out.push(format!(
                "Confirmed:  {:>15}  (+{})",
                format_count(global.confirmed),
                format_count(global.new_confirmed)
            ));
            out.push(format!(
                "Deaths:     {:>15}  (+{})",
                format_count(global.deaths),
                format_count(global.new_deaths)
            ));
            out.push(format!(
                "Recovered:  {:>15}  (+{})",
                format_count(global.recovered),
                format_count(global.new_recovered)
            ));
            out.push(format!("Last updated {} at {}", date, time));
        }
        None => out.push("Global figures unavailable.".to_string()),
    }

    out.push(String::new());
    if page.report.failed("countries") {
        out.push("Country summary unavailable.".to_string());
    } else {
        out.push("Most affected countries".to_string());
        out.push(format_countries(&top_countries, false, no_color));
    }
    out.join("\n")
}

pub fn format_countries(countries: &[CountrySummary], json: bool, no_color: bool) -> String {
    if json {
        return to_json(countries);
    }
    if countries.is_empty() {
        return "No countries found.".to_string();
    }

    let mut table = new_table(
        &["ID", "Country", "Confirmed", "New", "Deaths", "New deaths"],
        no_color,
    );
    for c in countries {
        table.add_row(vec![
            c.id.clone(),
            c.country.clone(),
            format_count(c.confirmed_total),
            format_count(c.confirmed_new),
            format_count(c.deaths_total),
            format_count(c.deaths_new),
        ]);
    }
    format!("{}\n{} results", table, countries.len())
}

pub fn format_country_detail(detail: &CountryDetail, json: bool) -> String {
    let s = &detail.summary;
    if json {
        return to_json(&json!({
            "summary": s,
            "fatality_rate": detail.fatality_rate(),
            "new_case_rate": detail.new_case_rate(),
        }));
    }

    let lines = [
        format!("Country:        {} ({})", s.country, s.id),
        format!("Total cases:    {}", format_count(s.confirmed_total)),
        format!("New cases:      {}", format_count(s.confirmed_new)),
        format!("Total deaths:   {}", format_count(s.deaths_total)),
        format!("New deaths:     {}", format_count(s.deaths_new)),
        format!("Fatality rate:  {}", format_percent(detail.fatality_rate())),
        format!("New-case rate:  {}", format_percent(detail.new_case_rate())),
    ];
    lines.join("\n")
}

fn ranking_table(title: &str, values: &[CountryValue], failed: bool, no_color: bool) -> String {
    if failed {
        return format!("{}: unavailable", title);
    }
    if values.is_empty() {
        return format!("{}: no data", title);
    }
    let mut table = new_table(&["#", "Country", "Value"], no_color);
    for (i, v) in values.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), v.name.clone(), format_count(v.value)]);
    }
    format!("{}\n{}", title, table)
}

pub fn format_analytics(page: &AnalyticsPage, json: bool, no_color: bool) -> String {
    let data = &page.data;
    if json {
        return to_json(&json!({
            "metric": page.metric,
            "total_by_country": data.total_by_country,
            "new_by_country": data.new_by_country,
            "cumulative_trend": data.cumulative_trend,
            "failed_sections": page.report.failures.iter().map(|f| f.section).collect::<Vec<_>>(),
        }));
    }

    let mut out = vec![
        ranking_table(
            &format!("Top countries by total {}", page.metric),
            &data.total_by_country,
            page.report.failed("top"),
            no_color,
        ),
        ranking_table(
            &format!("Top countries by new {}", page.metric),
            &data.new_by_country,
            page.report.failed("new"),
            no_color,
        ),
    ];

    if page.report.failed("trend") {
        out.push("Cumulative trend: unavailable".to_string());
    } else {
        match (data.cumulative_trend.first(), data.cumulative_trend.last()) {
            (Some(first), Some(last)) => out.push(format!(
                "Cumulative trend: {} ({}) -> {} ({}), {} points",
                format_count(first.value),
                first.name,
                format_count(last.value),
                last.name,
                data.cumulative_trend.len()
            )),
            _ => out.push("Cumulative trend: no data".to_string()),
        }
    }
    out.join("\n\n")
}

pub fn format_manage_rows(
    rows: &[CountryRow],
    sort: SortConfig,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(rows);
    }
    if rows.is_empty() {
        return "No matching rows.".to_string();
    }

    let mut headers = vec![
        "ID".to_string(),
        "Country".to_string(),
        "Total cases".to_string(),
        "Total deaths".to_string(),
        "Total recovered".to_string(),
    ];
    let sorted = match sort.column {
        epiboard_types::SortColumn::Country => 1,
        epiboard_types::SortColumn::TotalCases => 2,
        epiboard_types::SortColumn::TotalDeaths => 3,
        epiboard_types::SortColumn::TotalRecovered => 4,
    };
    headers[sorted] = format!("{} {}", headers[sorted], sort.direction.indicator());
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let mut table = new_table(&header_refs, no_color);
    for r in rows {
        table.add_row(vec![
            r.id.clone(),
            r.country.clone(),
            format_count(r.total_cases as f64),
            format_count(r.total_deaths as f64),
            format_count(r.total_recovered as f64),
        ]);
    }
    table.to_string()
}

pub fn format_prediction(view: &PredictionView, json: bool) -> String {
    if json {
        return to_json(&json!({
            "pred_new_deaths": view.predicted,
            "death_rate": view.death_rate,
            "recovery_rate": view.recovery_rate,
            "region": view.region,
            "country": view.country,
            "date": view.date,
            "confirmed": view.confirmed,
        }));
    }

    let lines = [
        format!("Predicted new deaths:  {}", format_count(view.predicted)),
        format!("Death rate:            {}", format_percent(view.death_rate)),
        format!("Recovery rate:         {}", format_percent(view.recovery_rate)),
        format!("Region:                {}", view.region),
        format!("Country:               {}", view.country),
        format!("Date:                  {}", view.date),
    ];
    lines.join("\n")
}

pub fn format_metrics(metrics: &[ModelMetric], json: bool, no_color: bool) -> String {
    if json {
        return to_json(metrics);
    }
    if metrics.is_empty() {
        return "No model metrics recorded.".to_string();
    }

    let mut table = new_table(&["Date", "RMSE", "R²"], no_color);
    for m in metrics {
        table.add_row(vec![
            m.date.clone(),
            format!("{:.4}", m.rmse),
            format!("{:.4}", m.r2),
        ]);
    }
    table.to_string()
}

/// Status line printed under a refreshing view
pub fn refresh_footer(fetched_at: DateTime<Utc>, period: Duration) -> String {
    format!(
        "Refreshed {} - next in {}s (Ctrl+C to stop)",
        fetched_at.format("%H:%M:%S"),
        period.as_secs()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use epiboard_types::{
        AnalyticsData, ApiError, FetchReport, GlobalStats, Metric, SortColumn, SortDirection,
    };

    fn summary(id: &str, country: &str, confirmed: f64) -> CountrySummary {
        CountrySummary {
            id: id.to_string(),
            country: country.to_string(),
            confirmed_total: confirmed,
            confirmed_new: 10.0,
            deaths_total: confirmed / 100.0,
            deaths_new: 1.0,
        }
    }

    fn session(country: Option<CountryCode>) -> Session {
        match country {
            Some(c) => Session::hydrate(Some("tok".to_string()), Some(c)),
            None => Session::unauthenticated(),
        }
    }

    #[test]
    fn test_gate_requires_login() {
        let err = gate(&session(None), RouteKey::Dashboard).unwrap_err();
        assert!(matches!(err, CliError::NotLoggedIn));
    }

    #[test]
    fn test_gate_follows_permission_table() {
        assert!(gate(&session(Some(CountryCode::Usa)), RouteKey::DataManagement).is_ok());
        assert!(gate(&session(Some(CountryCode::Fr)), RouteKey::Analytics).is_ok());

        let err = gate(&session(Some(CountryCode::Fr)), RouteKey::DataManagement).unwrap_err();
        assert!(matches!(
            err,
            CliError::Forbidden {
                home: RouteKey::Dashboard,
                ..
            }
        ));
    }

    #[test]
    fn test_forbidden_points_to_home_command() {
        let err = gate(&session(Some(CountryCode::Ch)), RouteKey::Dashboard).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Switzerland"));
        assert!(message.contains("epiboard predict"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::parse(Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::parse(None), OutputFormat::Table);
    }

    #[test]
    fn test_whoami_logged_out() {
        assert_eq!(format_whoami(&session(None), false), "Not logged in.");
        assert!(format_whoami(&session(None), true).contains("\"authenticated\": false"));
    }

    #[test]
    fn test_whoami_lists_pages() {
        let output = format_whoami(&session(Some(CountryCode::Ch)), false);
        assert!(output.contains("Pages:    prediction"));
    }

    #[test]
    fn test_format_countries_counts_results() {
        let output = format_countries(
            &[summary("fr", "France", 1000.0), summary("de", "Germany", 2000.0)],
            false,
            true,
        );
        assert!(output.contains("France"));
        assert!(output.ends_with("2 results"));
    }

    #[test]
    fn test_format_countries_json() {
        let output = format_countries(&[summary("fr", "France", 1000.0)], true, false);
        assert!(output.starts_with('['));
        assert!(output.contains("\"confirmed_total\""));
    }

    #[test]
    fn test_country_detail_rates() {
        let detail = CountryDetail {
            summary: summary("fr", "France", 1000.0),
        };
        let output = format_country_detail(&detail, false);
        assert!(output.contains("Fatality rate:  1.00%"));
        assert!(output.contains("New-case rate:  1.00%"));

        let empty = CountryDetail {
            summary: summary("xx", "Nowhere", 0.0),
        };
        assert!(format_country_detail(&empty, false).contains("Fatality rate:  N/A"));
    }

    #[test]
    fn test_dashboard_degraded_sections() {
        let mut report = FetchReport::new();
        let global: Option<GlobalStats> = report.settle("global", Err(ApiError::network("down")));
        let countries = report.settle("countries", Ok(vec![summary("fr", "France", 1.0)]));
        let page = DashboardPage {
            global,
            countries,
            report,
            fetched_at: Utc::now(),
        };

        let output = format_dashboard(&page, 5, false, true);
        assert!(output.contains("Global figures unavailable."));
        assert!(output.contains("France"));

        let json = format_dashboard(&page, 5, true, true);
        assert!(json.contains("\"global\""));
    }

    #[test]
    fn test_analytics_marks_failed_section() {
        let mut report = FetchReport::new();
        let data = AnalyticsData {
            total_by_country: report.settle(
                "top",
                Ok(vec![CountryValue {
                    name: "France".to_string(),
                    value: 5.0,
                }]),
            ),
            new_by_country: report.settle("new", Err(ApiError::network("down"))),
            cumulative_trend: report.settle("trend", Ok(vec![])),
        };
        let page = AnalyticsPage {
            metric: Metric::Deaths,
            data,
            report,
        };

        let output = format_analytics(&page, false, true);
        assert!(output.contains("Top countries by total deaths"));
        assert!(output.contains("Top countries by new deaths: unavailable"));
        assert!(output.contains("Cumulative trend: no data"));
    }

    #[test]
    fn test_manage_rows_show_sort_indicator() {
        let rows = vec![CountryRow {
            id: "fr".to_string(),
            country: "France".to_string(),
            total_cases: 10,
            total_deaths: 1,
            total_recovered: 5,
        }];
        let sort = SortConfig {
            column: SortColumn::TotalCases,
            direction: SortDirection::Desc,
        };
        let output = format_manage_rows(&rows, sort, false, true);
        assert!(output.contains("Total cases ▼"));
        assert!(format_manage_rows(&[], sort, false, true).contains("No matching rows"));
    }

    #[test]
    fn test_metrics_table() {
        let metrics = vec![ModelMetric {
            date: "2024-01-01".to_string(),
            rmse: 0.123456,
            r2: 0.9,
        }];
        let output = format_metrics(&metrics, false, true);
        assert!(output.contains("0.1235"));
        assert!(output.contains("0.9000"));
        assert_eq!(format_metrics(&[], false, true), "No model metrics recorded.");
    }

    #[test]
    fn test_refresh_footer_uses_configured_period() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(
            refresh_footer(at, Duration::from_secs(60)),
            "Refreshed 09:05:07 - next in 60s (Ctrl+C to stop)"
        );
    }
}
