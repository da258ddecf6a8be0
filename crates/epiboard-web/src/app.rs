//! Main Leptos App component with SPA router

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::auth::provide_auth;
use crate::components::{Header, ProtectedRoute, Sidebar, ToastProvider};
use crate::i18n::provide_i18n;
use crate::pages::{
    Analytics, Countries, CountryDetailPage, Dashboard, DataManagement, Login, Prediction,
};
use epiboard_types::RouteKey;

/// Main App component
#[component]
pub fn App() -> impl IntoView {
    let auth = provide_auth();
    provide_i18n(auth.country());

    // Mobile sidebar state
    let (sidebar_open, set_sidebar_open) = signal(false);

    view! {
        <ToastProvider>
            <Router>
                <div class="app">
                    <Show when=move || auth.is_authenticated()>
                        <Header sidebar_open set_sidebar_open />
                    </Show>
                    <div class="layout">
                        <Show when=move || auth.is_authenticated()>
                            <Sidebar sidebar_open set_sidebar_open />
                        </Show>
                        <main class="content">
                            <Routes fallback=|| "Not found">
                                <Route path=path!("/login") view=Login />
                                <Route
                                    path=path!("/")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::Dashboard>
                                            <Dashboard />
                                        </ProtectedRoute>
                                    }
                                />
                                <Route
                                    path=path!("/countries")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::Countries>
                                            <Countries />
                                        </ProtectedRoute>
                                    }
                                />
                                <Route
                                    path=path!("/countries/:id")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::CountryDetail>
                                            <CountryDetailPage />
                                        </ProtectedRoute>
                                    }
                                />
                                <Route
                                    path=path!("/analytics")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::Analytics>
                                            <Analytics />
                                        </ProtectedRoute>
                                    }
                                />
                                <Route
                                    path=path!("/data-management")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::DataManagement>
                                            <DataManagement />
                                        </ProtectedRoute>
                                    }
                                />
                                <Route
                                    path=path!("/prediction")
                                    view=|| view! {
                                        <ProtectedRoute route=RouteKey::Prediction>
                                            <Prediction />
                                        </ProtectedRoute>
                                    }
                                />
                            </Routes>
                        </main>
                    </div>
                </div>
            </Router>
        </ToastProvider>
    }
}
