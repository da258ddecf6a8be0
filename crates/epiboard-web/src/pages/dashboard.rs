//! Dashboard page - global figures and the most affected countries

use crate::api::{fetch_countries_summary, fetch_global_stats};
use crate::components::{CardColor, ErrorPanel, MetricsTable, StatsCard};
use crate::config::{DASHBOARD_REFRESH, DASHBOARD_TOP_COUNTRIES};
use crate::i18n::use_i18n;
use epiboard_types::format::{format_compact, format_count};
use epiboard_types::{top_by_confirmed, CountrySummary, FetchReport, GlobalStats};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos_router::components::A;

#[derive(Debug, Clone, Default)]
struct DashboardData {
    global: Option<GlobalStats>,
    countries: Vec<CountrySummary>,
    report: FetchReport,
}

/// Both calls run concurrently; the page fails only when both do
async fn load_dashboard() -> Result<DashboardData, String> {
    let (global, countries) = futures::join!(fetch_global_stats(), fetch_countries_summary());

    let mut report = FetchReport::new();
    let global = report.settle("global", global.map(Some));
    let countries = report.settle("countries", countries);

    if report.all_failed() {
        return Err(report
            .first_message()
            .unwrap_or("Failed to load data. Please try again later.")
            .to_string());
    }
    for failure in &report.failures {
        warn!("Dashboard section {} failed: {}", failure.section, failure.error);
    }
    Ok(DashboardData {
        global,
        countries,
        report,
    })
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let i18n = use_i18n();
    let (version, set_version) = signal(0u32);

    let dashboard = LocalResource::new(move || {
        let _ = version.get();
        load_dashboard()
    });

    // Polling stops with the page
    match set_interval_with_handle(move || set_version.update(|v| *v += 1), DASHBOARD_REFRESH) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => warn!("Dashboard refresh disabled: {:?}", e),
    }

    view! {
        <div class="page dashboard-page">
            <div class="page-header">
                <h2 class="page-title">{move || i18n.t("dashboard.title")}</h2>
            </div>

            <Suspense fallback=move || view! { <div class="loading">{i18n.t("common.loading")}</div> }>
                {move || {
                    dashboard
                        .get()
                        .map(|result| match result.as_ref() {
                            Ok(data) => view! { <DashboardContent data=data.clone() /> }.into_any(),
                            Err(message) => {
                                view! {
                                    <ErrorPanel
                                        message=message.clone()
                                        on_retry=move || set_version.update(|v| *v += 1)
                                    />
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>

            <MetricsTable />
        </div>
    }
}

#[component]
fn DashboardContent(data: DashboardData) -> impl IntoView {
    let i18n = use_i18n();
    let partial = !data.report.is_complete();
    let top = top_by_confirmed(&data.countries, DASHBOARD_TOP_COUNTRIES);

    view! {
        {partial.then(|| view! { <p class="warning-banner">{move || i18n.t("common.partial")}</p> })}

        {data.global.map(|global| view! { <GlobalCards global=global /> })}

        <section class="top-countries">
            <h3>{move || i18n.t("dashboard.topCountries")}</h3>
            {if top.is_empty() {
                view! { <p class="hint">{move || i18n.t("common.noData")}</p> }.into_any()
            } else {
                view! {
                    <ol class="top-list">
                        {top
                            .into_iter()
                            .map(|c| {
                                view! {
                                    <li>
                                        <A href=format!("/countries/{}", c.id)>{c.country}</A>
                                        <span class="top-value">{format_count(c.confirmed_total)}</span>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ol>
                }
                    .into_any()
            }}
        </section>
    }
}

#[component]
fn GlobalCards(global: GlobalStats) -> impl IntoView {
    let i18n = use_i18n();
    let (date, time) = global.last_updated_parts();
    let new_label = move |n: f64| {
        Signal::derive(move || format!("+{} {}", format_count(n), i18n.t("dashboard.new")))
    };

    view! {
        <div class="stats-grid">
            <StatsCard
                label=Signal::derive(move || i18n.t("dashboard.confirmed"))
                value=format_compact(global.confirmed)
                detail=new_label(global.new_confirmed)
                color=CardColor::Blue
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("dashboard.deaths"))
                value=format_compact(global.deaths)
                detail=new_label(global.new_deaths)
                color=CardColor::Red
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("dashboard.recovered"))
                value=format_compact(global.recovered)
                detail=new_label(global.new_recovered)
                color=CardColor::Green
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("dashboard.new"))
                value=format_count(global.new_confirmed)
                color=CardColor::Yellow
            />
        </div>
        <p class="last-updated">
            {move || i18n.tf("dashboard.lastUpdated", &[&date, &time])}
        </p>
    }
}
