//! Stats card component

use leptos::prelude::*;

/// Accent of a card
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CardColor {
    #[default]
    Default,
    Blue,
    Red,
    Green,
    Yellow,
}

impl CardColor {
    fn to_class(self) -> &'static str {
        match self {
            CardColor::Default => "",
            CardColor::Blue => "stats-card--blue",
            CardColor::Red => "stats-card--red",
            CardColor::Green => "stats-card--green",
            CardColor::Yellow => "stats-card--yellow",
        }
    }
}

/// Headline figure with an optional secondary line (e.g. "+1,234 new")
#[component]
pub fn StatsCard(
    #[prop(into)] label: Signal<String>,
    #[prop(into)] value: String,
    #[prop(optional, into)] detail: Option<Signal<String>>,
    #[prop(optional)] color: CardColor,
) -> impl IntoView {
    let class = format!("stats-card {}", color.to_class());

    view! {
        <div class=class>
            <div class="stats-card-label">{move || label.get()}</div>
            <div class="stats-card-value">{value}</div>
            {detail.map(|d| view! { <div class="stats-card-detail">{move || d.get()}</div> })}
        </div>
    }
}
