//! Model quality widget, refreshed every minute

use crate::api::fetch_model_metrics;
use crate::config::METRICS_REFRESH;
use crate::i18n::use_i18n;
use leptos::logging::warn;
use leptos::prelude::*;

#[component]
pub fn MetricsTable() -> impl IntoView {
    let i18n = use_i18n();
    let (version, set_version) = signal(0u32);

    let metrics = LocalResource::new(move || {
        let _ = version.get();
        fetch_model_metrics()
    });

    match set_interval_with_handle(move || set_version.update(|v| *v += 1), METRICS_REFRESH) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => warn!("Metrics refresh disabled: {:?}", e),
    }

    view! {
        <section class="metrics-widget">
            <h3 class="chart-title">{move || i18n.t("metrics.title")}</h3>
            <Suspense fallback=move || view! { <div class="loading">{i18n.t("common.loading")}</div> }>
                {move || {
                    metrics
                        .get()
                        .map(|result| match result.as_ref() {
                            Ok(rows) if rows.is_empty() => {
                                view! { <p class="hint">{i18n.t("common.noData")}</p> }.into_any()
                            }
                            Ok(rows) => {
                                let rows = rows.clone();
                                view! {
                                    <table class="data-table">
                                        <thead>
                                            <tr>
                                                <th>{i18n.t("metrics.date")}</th>
                                                <th>{i18n.t("metrics.rmse")}</th>
                                                <th>{i18n.t("metrics.r2")}</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|m| {
                                                    view! {
                                                        <tr>
                                                            <td>{m.date}</td>
                                                            <td>{format!("{:.4}", m.rmse)}</td>
                                                            <td>{format!("{:.4}", m.r2)}</td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="error-message">{e.message.clone()}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </section>
    }
}
