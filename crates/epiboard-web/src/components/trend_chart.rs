//! Cumulative trend line

use epiboard_types::TrendPoint;
use leptos::prelude::*;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 200.0;

/// SVG path through the points, scaled to the chart box
fn trend_path(points: &[TrendPoint]) -> String {
    let (min, max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));
    let range = if max > min { max - min } else { 1.0 };
    let x_step = WIDTH / (points.len().saturating_sub(1)).max(1) as f64;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 * x_step;
            let y = HEIGHT - (p.value - min) / range * HEIGHT;
            let op = if i == 0 { "M" } else { "L" };
            format!("{} {:.2},{:.2}", op, x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
pub fn TrendChart(
    #[prop(into)] title: Signal<String>,
    data: Vec<TrendPoint>,
    #[prop(into)] empty_label: Signal<String>,
) -> impl IntoView {
    let body = if data.is_empty() {
        view! { <div class="chart-empty">{move || empty_label.get()}</div> }.into_any()
    } else {
        let first = data.first().map(|p| p.name.clone()).unwrap_or_default();
        let last = data.last().map(|p| p.name.clone()).unwrap_or_default();
        view! {
            <svg
                class="trend-chart"
                viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)
                preserveAspectRatio="none"
            >
                <path
                    d=trend_path(&data)
                    fill="none"
                    stroke="var(--accent-primary)"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                />
            </svg>
            <div class="trend-axis">
                <span>{first}</span>
                <span>{last}</span>
            </div>
        }
        .into_any()
    };

    view! {
        <section class="chart">
            <h3 class="chart-title">{move || title.get()}</h3>
            {body}
        </section>
    }
}
