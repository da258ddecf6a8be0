//! Horizontal bar chart for per-country rankings

use epiboard_types::format::format_compact;
use epiboard_types::CountryValue;
use leptos::prelude::*;

#[component]
pub fn BarChart(
    #[prop(into)] title: Signal<String>,
    data: Vec<CountryValue>,
    /// Shown instead of the bars when `data` is empty
    #[prop(into)]
    empty_label: Signal<String>,
) -> impl IntoView {
    let max = data
        .iter()
        .map(|d| d.value)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let body = if data.is_empty() {
        view! { <div class="chart-empty">{move || empty_label.get()}</div> }.into_any()
    } else {
        data.into_iter()
            .map(|entry| {
                let width = format!("width: {:.1}%", entry.value / max * 100.0);
                view! {
                    <div class="bar-row">
                        <span class="bar-label">{entry.name}</span>
                        <div class="bar-track">
                            <div class="bar-fill" style=width></div>
                        </div>
                        <span class="bar-value">{format_compact(entry.value)}</span>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <section class="chart bar-chart">
            <h3 class="chart-title">{move || title.get()}</h3>
            {body}
        </section>
    }
}
