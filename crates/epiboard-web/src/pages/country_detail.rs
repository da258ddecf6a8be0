//! Single country figures

use crate::api::fetch_countries_summary;
use crate::components::{CardColor, ErrorPanel, StatsCard};
use crate::i18n::use_i18n;
use epiboard_types::format::{format_count, format_percent};
use epiboard_types::CountryDetail;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

#[component]
pub fn CountryDetailPage() -> impl IntoView {
    let i18n = use_i18n();
    let params = use_params_map();
    let (version, set_version) = signal(0u32);

    let id = move || params.with(|p| p.get("id").unwrap_or_default());

    let detail = LocalResource::new(move || {
        let _ = version.get();
        let id = id();
        async move {
            fetch_countries_summary()
                .await
                .map(|list| CountryDetail::find(&list, &id))
        }
    });

    view! {
        <div class="page country-detail-page">
            <A href="/countries" attr:class="back-link">{move || format!("← {}", i18n.t("common.back"))}</A>

            <Suspense fallback=move || view! { <div class="loading">{i18n.t("common.loading")}</div> }>
                {move || {
                    detail
                        .get()
                        .map(|result| match result.as_ref() {
                            Ok(Some(detail)) => view! { <DetailContent detail=detail.clone() /> }.into_any(),
                            Ok(None) => {
                                view! { <div class="empty-state"><p>{i18n.t("country.notFound")}</p></div> }
                                    .into_any()
                            }
                            Err(e) => {
                                view! {
                                    <ErrorPanel
                                        message=e.message.clone()
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
fn DetailContent(detail: CountryDetail) -> impl IntoView {
    let i18n = use_i18n();
    let s = &detail.summary;
    let fatality = format_percent(detail.fatality_rate());
    let new_case = format_percent(detail.new_case_rate());

    view! {
        <div class="page-header">
            <h2 class="page-title">{s.country.clone()}</h2>
        </div>
        <div class="stats-grid">
            <StatsCard
                label=Signal::derive(move || i18n.t("country.confirmed"))
                value=format_count(s.confirmed_total)
                color=CardColor::Blue
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("country.newCases"))
                value=format_count(s.confirmed_new)
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("country.deaths"))
                value=format_count(s.deaths_total)
                color=CardColor::Red
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("country.newDeaths"))
                value=format_count(s.deaths_new)
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("country.fatalityRate"))
                value=fatality
                color=CardColor::Yellow
            />
            <StatsCard
                label=Signal::derive(move || i18n.t("country.newCaseRate"))
                value=new_case
            />
        </div>
    }
}
