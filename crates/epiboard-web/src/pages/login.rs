//! Login page

use crate::auth::use_auth;
use crate::i18n::use_i18n;
use epiboard_types::home_route;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let i18n = use_i18n();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        submitting.set(true);
        error.set(None);

        let (user, pass) = (username.get_untracked(), password.get_untracked());
        spawn_local(async move {
            if let Err(message) = auth.login(user, pass).await {
                error.set(Some(message));
            }
            submitting.set(false);
        });
    };

    // Sole navigation, also after a fresh login
    view! {
        <Show when=move || auth.is_authenticated()>
            <Redirect path=home_route(auth.country()).path() />
        </Show>

        <div class="login-page">
            <form class="login-card" on:submit=on_submit>
                <h1 class="login-title">{move || i18n.t("login.title")}</h1>

                <label class="form-field">
                    <span>{move || i18n.t("login.username")}</span>
                    <input
                        type="text"
                        autocomplete="username"
                        required
                        prop:value=move || username.get()
                        on:input=move |e| username.set(event_target_value(&e))
                    />
                </label>

                <label class="form-field">
                    <span>{move || i18n.t("login.password")}</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        required
                        prop:value=move || password.get()
                        on:input=move |e| password.set(event_target_value(&e))
                    />
                </label>

                {move || error.get().map(|message| view! { <p class="error-message" role="alert">{message}</p> })}

                <button class="btn btn-primary" type="submit" disabled=move || submitting.get()>
                    {move || {
                        if submitting.get() { i18n.t("login.submitting") } else { i18n.t("login.submit") }
                    }}
                </button>
            </form>
        </div>
    }
}
