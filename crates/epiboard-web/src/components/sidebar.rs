//! Sidebar navigation filtered by the active country's allow-list

use crate::auth::use_auth;
use crate::i18n::use_i18n;
use epiboard_types::{allowed_routes, RouteKey};
use leptos::prelude::*;
use leptos_router::components::A;

/// Inline Lucide-style icon per route
fn route_icon(route: RouteKey) -> impl IntoView {
    let shapes = match route {
        RouteKey::Dashboard => view! {
            <rect width="7" height="9" x="3" y="3" rx="1"/>
            <rect width="7" height="5" x="14" y="3" rx="1"/>
            <rect width="7" height="9" x="14" y="12" rx="1"/>
            <rect width="7" height="5" x="3" y="16" rx="1"/>
        }
        .into_any(),
        RouteKey::Countries | RouteKey::CountryDetail => view! {
            <circle cx="12" cy="12" r="10"/>
            <path d="M2 12h20"/>
            <path d="M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"/>
        }
        .into_any(),
        RouteKey::Analytics => view! {
            <polyline points="22 7 13.5 15.5 8.5 10.5 2 17"/>
            <polyline points="16 7 22 7 22 13"/>
        }
        .into_any(),
        RouteKey::DataManagement => view! {
            <ellipse cx="12" cy="5" rx="9" ry="3"/>
            <path d="M3 5v14a9 3 0 0 0 18 0V5"/>
            <path d="M3 12a9 3 0 0 0 18 0"/>
        }
        .into_any(),
        RouteKey::Prediction => view! {
            <path d="M3 3v18h18"/>
            <path d="m19 9-5 5-4-4-3 3"/>
        }
        .into_any(),
    };

    view! {
        <svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            {shapes}
        </svg>
    }
}

/// Sidebar with navigation menu
#[component]
pub fn Sidebar(
    sidebar_open: ReadSignal<bool>,
    set_sidebar_open: WriteSignal<bool>,
) -> impl IntoView {
    let auth = use_auth();
    let i18n = use_i18n();

    let nav_routes = move || {
        allowed_routes(auth.country())
            .iter()
            .copied()
            .filter(RouteKey::in_navigation)
            .collect::<Vec<_>>()
    };

    view! {
        <>
            // Backdrop overlay for mobile
            <Show when=move || sidebar_open.get()>
                <div
                    class="sidebar-backdrop"
                    on:click=move |_| set_sidebar_open.set(false)
                ></div>
            </Show>

            <aside class="sidebar" class:sidebar-open=move || sidebar_open.get()>
                <button
                    class="sidebar-close"
                    on:click=move |_| set_sidebar_open.set(false)
                    aria-label="Close sidebar"
                >
                    "✕"
                </button>

                <nav class="nav" aria-label=move || i18n.t("sidebar.navigation")>
                    <ul class="nav-list">
                        <For
                            each=nav_routes
                            key=|route| *route
                            children=move |route| {
                                view! {
                                    <li class="nav-item">
                                        <A
                                            href=route.path()
                                            attr:class="sidebar-link"
                                            on:click=move |_| set_sidebar_open.set(false)
                                        >
                                            <span class="sidebar-link-icon">{route_icon(route)}</span>
                                            <span class="sidebar-link-label">
                                                {move || i18n.t(route.label_key())}
                                            </span>
                                        </A>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </nav>

                <button class="sidebar-logout" on:click=move |_| auth.logout()>
                    {move || i18n.t("sidebar.logout")}
                </button>
            </aside>
        </>
    }
}
