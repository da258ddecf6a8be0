//! Analytics page - rankings and cumulative trend per metric

use crate::api::{fetch_analytics_new, fetch_analytics_top, fetch_analytics_trend};
use crate::components::{BarChart, ErrorPanel, TrendChart};
use crate::config::{TOP_LIMIT, TREND_DAYS};
use crate::i18n::use_i18n;
use epiboard_types::{AnalyticsData, FetchReport, Metric};
use leptos::logging::warn;
use leptos::prelude::*;

#[derive(Debug, Clone, Default)]
struct AnalyticsView {
    data: AnalyticsData,
    report: FetchReport,
}

/// All three sections settle independently
async fn load_analytics(metric: Metric) -> Result<AnalyticsView, String> {
    let (top, new, trend) = futures::join!(
        fetch_analytics_top(metric, TOP_LIMIT),
        fetch_analytics_new(metric, TOP_LIMIT),
        fetch_analytics_trend(metric, TREND_DAYS),
    );

    let mut report = FetchReport::new();
    let data = AnalyticsData {
        total_by_country: report.settle("top", top),
        new_by_country: report.settle("new", new),
        cumulative_trend: report.settle("trend", trend),
    };

    if report.all_failed() {
        return Err(report
            .first_message()
            .unwrap_or("Failed to load data. Please try again later.")
            .to_string());
    }
    for failure in &report.failures {
        warn!("Analytics {} section {} failed: {}", metric, failure.section, failure.error);
    }
    Ok(AnalyticsView { data, report })
}

#[component]
pub fn Analytics() -> impl IntoView {
    let i18n = use_i18n();
    let metric = RwSignal::new(Metric::default());
    let (version, set_version) = signal(0u32);

    let analytics = LocalResource::new(move || {
        let _ = version.get();
        load_analytics(metric.get())
    });

    view! {
        <div class="page analytics-page">
            <div class="page-header">
                <h2 class="page-title">{move || i18n.t("analytics.title")}</h2>
            </div>

            <div class="tabs" role="tablist">
                {Metric::ALL
                    .iter()
                    .map(|m| {
                        let m = *m;
                        view! {
                            <button
                                role="tab"
                                class=move || if metric.get() == m { "tab tab--active" } else { "tab" }
                                on:click=move |_| metric.set(m)
                            >
                                {move || i18n.t(m.label_key())}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <Suspense fallback=move || view! { <div class="loading">{i18n.t("common.loading")}</div> }>
                {move || {
                    analytics
                        .get()
                        .map(|result| match result.as_ref() {
                            Ok(view_data) => view! { <AnalyticsSections view_data=view_data.clone() /> }.into_any(),
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
        </div>
    }
}

#[component]
fn AnalyticsSections(view_data: AnalyticsView) -> impl IntoView {
    let i18n = use_i18n();
    let AnalyticsView { data, report } = view_data;
    let failed = move |section: &'static str| {
        let failed = report.failed(section);
        Signal::derive(move || {
            if failed { i18n.t("common.partial") } else { i18n.t("common.noData") }
        })
    };

    view! {
        <div class="analytics-grid">
            <BarChart
                title=Signal::derive(move || i18n.t("analytics.top"))
                data=data.total_by_country
                empty_label=failed("top")
            />
            <BarChart
                title=Signal::derive(move || i18n.t("analytics.new"))
                data=data.new_by_country
                empty_label=failed("new")
            />
            <TrendChart
                title=Signal::derive(move || i18n.t("analytics.trend"))
                data=data.cumulative_trend
                empty_label=failed("trend")
            />
        </div>
    }
}
