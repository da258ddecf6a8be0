//! Death prediction form and results panel

use crate::api::{fetch_metadata, predict};
use crate::i18n::use_i18n;
use epiboard_types::format::{format_count, format_percent};
use epiboard_types::{FormField, PredictionForm, PredictionView};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Prediction() -> impl IntoView {
    let i18n = use_i18n();
    let form = RwSignal::new(PredictionForm::new());

    spawn_local(async move {
        match fetch_metadata().await {
            Ok(metadata) => form.update(|f| f.set_metadata(metadata)),
            Err(e) => {
                leptos::logging::warn!("Metadata unavailable: {}", e);
                form.update(|f| f.metadata_failed(i18n.t("error.metadata")));
            }
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(row) = form.try_update(|f| f.begin_submit()).flatten() else {
            return;
        };
        spawn_local(async move {
            let outcome = predict(&row).await;
            form.update(|f| f.finish_submit(outcome));
        });
    };

    let field_input = move |field: FormField| {
        let kind = if field.is_numeric() { "number" } else { "date" };
        view! {
            <label class="form-field">
                <span>{move || i18n.t(field.label_key())}</span>
                <input
                    type=kind
                    min=field.is_numeric().then_some("0")
                    required
                    prop:value=move || form.with(|f| f.value(field).to_string())
                    on:input=move |e| form.update(|f| f.set_field(field, &event_target_value(&e)))
                />
            </label>
        }
    };

    view! {
        <div class="page prediction-page">
            <div class="page-header">
                <h2 class="page-title">{move || i18n.t("prediction.title")}</h2>
                <p class="subtitle">{move || i18n.t("prediction.subtitle")}</p>
            </div>

            <div class="prediction-layout">
                <form class="prediction-form" on:submit=on_submit>
                    <label class="form-field">
                        <span>{move || i18n.t("prediction.region")}</span>
                        <select
                            disabled=move || form.with(|f| !f.region_enabled())
                            on:change=move |e| form.update(|f| f.select_region(&event_target_value(&e)))
                        >
                            <option value="" selected=move || form.with(|f| f.region().is_empty())>
                                {move || i18n.t("prediction.selectRegion")}
                            </option>
                            {move || {
                                form.with(|f| f.regions().to_vec())
                                    .into_iter()
                                    .map(|region| {
                                        let selected = region.clone();
                                        let value = region.clone();
                                        view! {
                                            <option
                                                value=value
                                                selected=move || form.with(|f| f.region() == selected)
                                            >
                                                {region}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </label>

                    {move || {
                        form.with(|f| f.metadata_error().map(str::to_string))
                            .map(|message| view! { <p class="error-message">{message}</p> })
                    }}

                    <label class="form-field">
                        <span>{move || i18n.t("prediction.country")}</span>
                        <select
                            disabled=move || form.with(|f| f.available_countries().is_empty())
                            on:change=move |e| form.update(|f| f.select_country(&event_target_value(&e)))
                        >
                            <option value="" selected=move || form.with(|f| f.country().is_empty())>
                                {move || i18n.t("prediction.selectCountry")}
                            </option>
                            {move || {
                                form.with(|f| f.available_countries().to_vec())
                                    .into_iter()
                                    .map(|country| {
                                        let selected = country.clone();
                                        let value = country.clone();
                                        view! {
                                            <option
                                                value=value
                                                selected=move || form.with(|f| f.country() == selected)
                                            >
                                                {country}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </label>

                    {FormField::ALL.iter().map(|field| field_input(*field)).collect_view()}

                    <button
                        class="btn btn-primary"
                        type="submit"
                        disabled=move || form.with(|f| !f.can_submit())
                    >
                        {move || i18n.t(form.with(|f| f.submit_label_key()))}
                    </button>

                    {move || {
                        form.with(|f| f.error().is_some())
                            .then(|| view! { <p class="error-message" role="alert">{i18n.t("error.prediction")}</p> })
                    }}
                </form>

                {move || match form.with(|f| f.results().cloned()) {
                    Some(result) => view! { <PredictionResults result=result /> }.into_any(),
                    None => {
                        view! {
                            <div class="empty-state">
                                <h3>{i18n.t("prediction.emptyTitle")}</h3>
                                <p class="hint">{i18n.t("prediction.emptySubtitle")}</p>
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn PredictionResults(result: PredictionView) -> impl IntoView {
    let i18n = use_i18n();

    view! {
        <section class="prediction-results">
            <div class="stats-card stats-card--red">
                <div class="stats-card-label">{move || i18n.t("prediction.predictedDeaths")}</div>
                <div class="stats-card-value">{format_count(result.predicted)}</div>
            </div>
            <dl class="result-details">
                <dt>{move || i18n.t("prediction.deathRate")}</dt>
                <dd>{format_percent(result.death_rate)}</dd>
                <dt>{move || i18n.t("prediction.recoveryRate")}</dt>
                <dd>{format_percent(result.recovery_rate)}</dd>
                <dt>{move || i18n.t("prediction.region")}</dt>
                <dd>{result.region}</dd>
                <dt>{move || i18n.t("prediction.country")}</dt>
                <dd>{result.country}</dd>
                <dt>{move || i18n.t("prediction.date")}</dt>
                <dd>{result.date}</dd>
            </dl>
        </section>
    }
}
