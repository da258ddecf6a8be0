//! Error display with retry

use crate::i18n::use_i18n;
use leptos::prelude::*;

/// Page-level error message and a retry button
#[component]
pub fn ErrorPanel(
    /// Message to display
    #[prop(into)]
    message: String,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    let i18n = use_i18n();

    view! {
        <div class="error-state" role="alert">
            <p class="error-message">{message}</p>
            <button class="btn btn-secondary" on:click=move |_| on_retry.run(())>
                {move || i18n.t("common.retry")}
            </button>
        </div>
    }
}
