//! Route guard wrapper

use crate::auth::use_auth;
use crate::i18n::use_i18n;
use epiboard_types::{guard_decision, GuardDecision, RouteKey, LOGIN_PATH};
use leptos::prelude::*;
use leptos_router::components::Redirect;

/// Render `children` only when the session may open `route`
#[component]
pub fn ProtectedRoute(route: RouteKey, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let i18n = use_i18n();

    move || match guard_decision(&auth.session(), route) {
        GuardDecision::Loading => {
            view! { <div class="loading">{i18n.t("common.loading")}</div> }.into_any()
        }
        GuardDecision::Allow => children().into_any(),
        GuardDecision::RedirectLogin => view! { <Redirect path=LOGIN_PATH /> }.into_any(),
        GuardDecision::RedirectHome(home) => view! { <Redirect path=home.path() /> }.into_any(),
    }
}
