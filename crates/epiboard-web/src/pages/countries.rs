//! Countries list with search

use crate::api::fetch_countries_summary;
use crate::components::ErrorPanel;
use crate::i18n::use_i18n;
use epiboard_types::format::format_count;
use epiboard_types::search_countries;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Countries() -> impl IntoView {
    let i18n = use_i18n();
    let (version, set_version) = signal(0u32);
    let (search, set_search) = signal(String::new());

    let summary = LocalResource::new(move || {
        let _ = version.get();
        fetch_countries_summary()
    });

    view! {
        <div class="page countries-page">
            <div class="page-header">
                <h2 class="page-title">{move || i18n.t("countries.title")}</h2>
                <input
                    type="search"
                    class="search-input"
                    placeholder=move || i18n.t("countries.search")
                    prop:value=move || search.get()
                    on:input=move |e| set_search.set(event_target_value(&e))
                />
            </div>

            <Suspense fallback=move || view! { <div class="loading">{i18n.t("common.loading")}</div> }>
                {move || {
                    summary
                        .get()
                        .map(|result| match result.as_ref() {
                            Ok(list) => {
                                let list = list.clone();
                                view! {
                                    {move || {
                                        let term = search.get();
                                        let matches = search_countries(&list, &term);
                                        let count = matches.len().to_string();
                                        let rows = matches
                                            .into_iter()
                                            .map(|c| {
                                                let name = c.country.clone();
                                                view! {
                                                    <tr>
                                                        <td>
                                                            <A href=format!("/countries/{}", c.id)>{name}</A>
                                                        </td>
                                                        <td>{format_count(c.confirmed_total)}</td>
                                                        <td>{format_count(c.confirmed_new)}</td>
                                                        <td>{format_count(c.deaths_total)}</td>
                                                        <td>{format_count(c.deaths_new)}</td>
                                                    </tr>
                                                }
                                            })
                                            .collect_view();
                                        view! {
                                            <p class="result-count">{i18n.tf("common.results", &[&count])}</p>
                                            <table class="data-table">
                                                <thead>
                                                    <tr>
                                                        <th>{i18n.t("manage.country")}</th>
                                                        <th>{i18n.t("country.confirmed")}</th>
                                                        <th>{i18n.t("country.newCases")}</th>
                                                        <th>{i18n.t("country.deaths")}</th>
                                                        <th>{i18n.t("country.newDeaths")}</th>
                                                    </tr>
                                                </thead>
                                                <tbody>{rows}</tbody>
                                            </table>
                                        }
                                    }}
                                }
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
