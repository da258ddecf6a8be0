//! Header with country switcher and language selector

use crate::auth::use_auth;
use crate::i18n::use_i18n;
use epiboard_types::{CountryCode, Language};
use leptos::prelude::*;

/// Header with title, mobile hamburger menu and session controls
#[component]
pub fn Header(
    sidebar_open: ReadSignal<bool>,
    set_sidebar_open: WriteSignal<bool>,
) -> impl IntoView {
    let auth = use_auth();
    let i18n = use_i18n();

    let on_country = move |e: leptos::ev::Event| {
        if let Ok(country) = event_target_value(&e).parse::<CountryCode>() {
            auth.switch_country(country, i18n);
        }
    };
    let on_language = move |e: leptos::ev::Event| {
        if let Ok(language) = event_target_value(&e).parse::<Language>() {
            i18n.set_language(language);
        }
    };

    view! {
        <header class="header">
            <button
                class="hamburger"
                on:click=move |_| set_sidebar_open.update(|v| *v = !*v)
                aria-label="Toggle sidebar"
                aria-expanded=move || sidebar_open.get().to_string()
            >
                <span class="hamburger-icon">"☰"</span>
            </button>

            <div class="header-content">
                <h1 class="logo">{move || i18n.t("app.title")}</h1>
            </div>

            <div class="header-controls">
                <label class="header-control">
                    <span>{move || i18n.t("app.country")}</span>
                    <select class="filter-select" on:change=on_country>
                        {CountryCode::ALL
                            .iter()
                            .map(|code| {
                                let code = *code;
                                view! {
                                    <option
                                        value=code.as_str()
                                        selected=move || auth.country() == code
                                    >
                                        {code.display_name()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>

                <label class="header-control">
                    <span>{move || i18n.t("app.language")}</span>
                    <select class="filter-select" on:change=on_language>
                        {move || {
                            Language::options_for(auth.country())
                                .iter()
                                .map(|lang| {
                                    let lang = *lang;
                                    view! {
                                        <option
                                            value=lang.as_str()
                                            selected=move || i18n.language() == lang
                                        >
                                            {lang.native_name()}
                                        </option>
                                    }
                                })
                                .collect_view()
                        }}
                    </select>
                </label>

                {move || {
                    auth.user()
                        .map(|user| view! { <span class="header-user">{user.username}</span> })
                }}
            </div>
        </header>
    }
}
