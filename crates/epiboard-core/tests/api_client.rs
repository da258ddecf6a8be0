//! API client behaviour against an in-process mock backend

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use epiboard_core::loaders::{load_analytics, load_country_detail, load_dashboard};
use epiboard_core::session::SharedStorage;
use epiboard_core::{
    prediction, ApiClient, DataManager, MemoryStorage, Navigator, RouteTracker, SessionStore,
};
use epiboard_types::{
    ApiErrorKind, DurableStorage, FormField, Metric, PredictionForm, SortColumn, StorageKey,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Harness
// ============================================================================

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

struct Harness {
    api: ApiClient,
    session: Arc<SessionStore>,
    storage: SharedStorage,
    tracker: Arc<RouteTracker>,
}

fn harness(base: &str, token: Option<&str>, path: &str) -> Harness {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set(StorageKey::AuthToken, token).unwrap();
        storage.set(StorageKey::SelectedCountry, "usa").unwrap();
    }
    let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
    session.hydrate();
    let tracker = Arc::new(RouteTracker::new(path));
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        base,
        Arc::clone(&session),
        tracker.clone(),
    );
    Harness {
        api,
        session,
        storage,
        tracker,
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn summary_json() -> Value {
    json!([
        {"id": "fr", "country": "France", "confirmed_total": 1000.0, "confirmed_new": 10.0, "deaths_total": 20.0, "deaths_new": 1.0},
        {"id": "it", "country": "Italy", "confirmed_total": 500.0, "confirmed_new": 5.0, "deaths_total": 50.0, "deaths_new": 0.0}
    ])
}

// ============================================================================
// Auth header and forced logout
// ============================================================================

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let router = Router::new().route(
        "/api/v1/covid/global",
        get(|headers: HeaderMap| async move {
            match bearer(&headers).as_deref() {
                Some("tok-123") => Json(json!({
                    "confirmed": 10.0, "deaths": 1.0, "recovered": 5.0,
                    "new_confirmed": 1.0, "new_deaths": 0.0, "new_recovered": 1.0,
                    "last_updated": "2024-05-01T08:00:00"
                }))
                .into_response(),
                _ => StatusCode::UNAUTHORIZED.into_response(),
            }
        }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok-123"), "/");

    let stats = h.api.global_stats().await.unwrap();
    assert_eq!(stats.confirmed, 10.0);
    assert!(h.tracker.history().is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_redirect_exactly_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().route(
        "/api/v1/covid/countries/summary",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token expired"})))
            }
        }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("stale"), "/countries");
    let mut events = h.session.subscribe();

    let (a, b, c) = tokio::join!(
        h.api.countries_summary(),
        h.api.countries_summary(),
        h.api.countries_summary()
    );

    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(err.message, "Token expired");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(h.tracker.history(), vec!["/login".to_string()]);
    assert!(h.storage.get(StorageKey::AuthToken).is_none());
    assert!(h.storage.get(StorageKey::SelectedCountry).is_none());
    assert!(!h.session.is_authenticated());
    assert!(matches!(
        events.recv().await.unwrap(),
        epiboard_core::SessionEvent::Expired { status: 401 }
    ));
}

#[tokio::test]
async fn test_403_forces_logout_too() {
    let router = Router::new().route(
        "/api/v1/metadata",
        get(|| async { StatusCode::FORBIDDEN }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/prediction");

    let err = h.api.metadata().await.unwrap_err();
    assert_eq!(err.status, Some(403));
    assert!(h.tracker.is_at("/login"));
}

#[tokio::test]
async fn test_no_redirect_when_already_on_login() {
    let router = Router::new().route(
        "/api/v1/covid/global",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/login");

    assert!(h.api.global_stats().await.is_err());
    assert!(h.tracker.history().is_empty());
    assert!(h.storage.get(StorageKey::AuthToken).is_none());
}

#[tokio::test]
async fn test_server_errors_do_not_log_out() {
    let router = Router::new().route(
        "/api/v1/covid/global",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/");

    let err = h.api.global_stats().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Server);
    assert!(h.session.is_authenticated());
    assert_eq!(h.storage.get(StorageKey::AuthToken).as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_network_error_kind() {
    // Bind then release a port so nothing listens on it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = harness(&format!("http://{}/api/v1", addr), Some("tok"), "/");
    let err = h.api.global_stats().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert!(h.session.is_authenticated());
}

// ============================================================================
// Login
// ============================================================================

fn login_router() -> Router {
    Router::new().route(
        "/api/v1/auth/login",
        post(|Json(body): Json<Value>| async move {
            if body["username"] == "admin" && body["password"] == "secret" {
                Json(json!({
                    "access_token": "fresh-token",
                    "token_type": "bearer",
                    "expires_in": 3600,
                    "user": {"id": 1, "username": "admin", "email": "admin@covid-app.com", "role": "admin"}
                }))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Incorrect username or password"})),
                )
                    .into_response()
            }
        }),
    )
}

#[tokio::test]
async fn test_login_success_persists_token() {
    let base = spawn_backend(login_router()).await;
    let h = harness(&base, None, "/login");
    h.storage.set(StorageKey::SelectedCountry, "fr").unwrap();

    let user = h.session.login(&h.api, "admin", "secret").await.unwrap();
    assert_eq!(user.username, "admin");
    assert_eq!(user.country, epiboard_types::CountryCode::Fr);
    assert_eq!(
        h.storage.get(StorageKey::AuthToken).as_deref(),
        Some("fresh-token")
    );
}

#[tokio::test]
async fn test_login_failure_keeps_server_message_and_does_not_redirect() {
    let base = spawn_backend(login_router()).await;
    let h = harness(&base, None, "/");

    let err = h.session.login(&h.api, "admin", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect username or password");
    assert!(h.tracker.history().is_empty());
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_login_rearms_redirect_guard() {
    let router = login_router().route(
        "/api/v1/covid/global",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("old"), "/");

    assert!(h.api.global_stats().await.is_err());
    assert_eq!(h.tracker.history().len(), 1);

    h.session.login(&h.api, "admin", "secret").await.unwrap();
    h.tracker.navigate("/");
    assert!(h.api.global_stats().await.is_err());
    assert_eq!(
        h.tracker.history(),
        vec!["/login".to_string(), "/".to_string(), "/login".to_string()]
    );
}

// ============================================================================
// Loaders
// ============================================================================

#[tokio::test]
async fn test_dashboard_degrades_when_one_call_fails() {
    let router = Router::new()
        .route(
            "/api/v1/covid/global",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route(
            "/api/v1/covid/countries/summary",
            get(|| async { Json(summary_json()) }),
        );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/");

    let page = load_dashboard(&h.api).await.unwrap();
    assert!(page.global.is_none());
    assert_eq!(page.countries.len(), 2);
    assert!(page.report.failed("global"));
    assert_eq!(page.top_countries(1)[0].id, "fr");
}

#[tokio::test]
async fn test_dashboard_fails_when_everything_fails() {
    let base = spawn_backend(Router::new()).await;
    let h = harness(&base, Some("tok"), "/");

    let err = load_dashboard(&h.api).await.unwrap_err();
    assert_eq!(err.status, Some(404));
}

#[tokio::test]
async fn test_analytics_all_settled() {
    let router = Router::new()
        .route(
            "/api/v1/analytics/{metric}/top",
            get(|Path(metric): Path<String>| async move {
                Json(json!([{"name": format!("top-{}", metric), "value": 3.0}]))
            }),
        )
        .route(
            "/api/v1/analytics/{metric}/new",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/api/v1/analytics/{metric}/trend",
            get(|| async {
                Json(json!([{"name": "2024-01-01", "value": 1.0}, {"name": "2024-01-02", "value": 2.0}]))
            }),
        );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/analytics");

    let page = load_analytics(&h.api, Metric::Deaths, 10, 30).await.unwrap();
    assert_eq!(page.data.total_by_country[0].name, "top-deaths");
    assert!(page.data.new_by_country.is_empty());
    assert_eq!(page.data.cumulative_trend.len(), 2);
    assert!(page.report.failed("new"));
    assert!(!page.report.all_failed());
}

#[tokio::test]
async fn test_country_detail_not_found_is_not_an_error() {
    let router = Router::new().route(
        "/api/v1/covid/countries/summary",
        get(|| async { Json(summary_json()) }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, Some("tok"), "/countries/it");

    let found = load_country_detail(&h.api, "it").await.unwrap().unwrap();
    assert_eq!(found.fatality_rate(), Some(10.0));
    assert!(load_country_detail(&h.api, "zz").await.unwrap().is_none());
}

// ============================================================================
// Data management
// ============================================================================

fn manage_router(delete_status: StatusCode) -> Router {
    Router::new()
        .route(
            "/api/v1/covid/countries/manage",
            get(|| async {
                Json(json!([
                    {"id": "1", "country": "Spain", "total_cases": 10, "total_deaths": 1, "total_recovered": 5},
                    {"id": "2", "country": "Chile", "total_cases": 30, "total_deaths": 3, "total_recovered": 9}
                ]))
            }),
        )
        .route(
            "/api/v1/covid/countries/{id}",
            put(|Path(id): Path<String>, Json(mut body): Json<Value>| async move {
                // Server-side normalization the client must adopt
                let name = body["country"].as_str().unwrap_or_default().trim().to_uppercase();
                body["country"] = json!(name);
                body["id"] = json!(id);
                Json(body)
            })
            .delete(move || async move { delete_status }),
        )
}

#[tokio::test]
async fn test_save_adopts_server_copy() {
    let base = spawn_backend(manage_router(StatusCode::NO_CONTENT)).await;
    let h = harness(&base, Some("tok"), "/data-management");

    let mut manager = DataManager::load(&h.api).await.unwrap();
    manager.table_mut().sort_by(SortColumn::TotalCases);
    assert!(manager.table_mut().begin_edit("2"));
    manager
        .table_mut()
        .update_draft(epiboard_types::DraftField::Country, " chile ");

    let saved = manager.save(&h.api).await.unwrap();
    assert_eq!(saved.country, "CHILE");
    assert!(manager.table().draft().is_none());
    assert_eq!(manager.table().rows()[1].country, "CHILE");
}

#[tokio::test]
async fn test_save_refuses_cleared_count() {
    let base = spawn_backend(manage_router(StatusCode::NO_CONTENT)).await;
    let h = harness(&base, Some("tok"), "/data-management");

    let mut manager = DataManager::load(&h.api).await.unwrap();
    assert!(manager.table_mut().begin_edit("1"));
    for input in ["1", ""] {
        manager
            .table_mut()
            .update_draft(epiboard_types::DraftField::TotalCases, input);
    }

    let err = manager.save(&h.api).await.unwrap_err();
    assert_eq!(err.kind, epiboard_types::ApiErrorKind::Validation);
    assert!(err.message.contains("TotalCases"));
    assert!(manager.table().is_editing("1"));
    assert_eq!(manager.table().rows()[0].total_cases, 10);
}

#[tokio::test]
async fn test_delete_removes_row_only_on_success() {
    let base = spawn_backend(manage_router(StatusCode::NO_CONTENT)).await;
    let h = harness(&base, Some("tok"), "/data-management");
    let mut manager = DataManager::load(&h.api).await.unwrap();
    let removed = manager.delete(&h.api, "1").await.unwrap();
    assert_eq!(removed.map(|r| r.country), Some("Spain".to_string()));
    assert_eq!(manager.table().rows().len(), 1);

    let base = spawn_backend(manage_router(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let h = harness(&base, Some("tok"), "/data-management");
    let mut manager = DataManager::load(&h.api).await.unwrap();
    assert!(manager.delete(&h.api, "1").await.is_err());
    assert_eq!(manager.table().rows().len(), 2);
}

// ============================================================================
// Prediction
// ============================================================================

fn prediction_router(predict_ok: bool) -> Router {
    Router::new()
        .route(
            "/api/v1/metadata",
            get(|| async {
                Json(json!({
                    "who_regions": ["Africa", "Europe"],
                    "countries_by_region": {"Africa": ["Senegal", "Nigeria"]}
                }))
            }),
        )
        .route(
            "/api/v1/predict",
            post(move |Json(body): Json<Value>| async move {
                if predict_ok && body["Country"] == "Senegal" && body["Confirmed"] == 200 {
                    Json(json!({"pred_new_deaths": 42.0})).into_response()
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }),
        )
}

fn fill(form: &mut PredictionForm) {
    form.select_region("Africa");
    form.select_country("Senegal");
    for field in FormField::NUMERIC {
        form.set_field(field, "abc");
    }
    form.set_field(FormField::Confirmed, "200");
    form.set_field(FormField::Date, "2020-06-01");
}

#[tokio::test]
async fn test_prediction_flow() {
    let base = spawn_backend(prediction_router(true)).await;
    let h = harness(&base, Some("tok"), "/prediction");

    let mut form = PredictionForm::new();
    prediction::load_metadata(&h.api, &mut form).await;
    assert_eq!(form.regions(), ["Africa", "Europe"]);
    fill(&mut form);

    assert!(prediction::submit(&h.api, &mut form).await);
    let view = form.results().unwrap();
    assert_eq!(view.predicted, 42.0);
    assert_eq!(view.death_rate, Some(21.0));
    assert!(form.error().is_none());
}

#[tokio::test]
async fn test_prediction_failure_hides_results() {
    let base = spawn_backend(prediction_router(false)).await;
    let h = harness(&base, Some("tok"), "/prediction");

    let mut form = PredictionForm::new();
    prediction::load_metadata(&h.api, &mut form).await;
    fill(&mut form);

    assert!(prediction::submit(&h.api, &mut form).await);
    assert!(form.error().is_some());
    assert!(form.results().is_none());
}

#[tokio::test]
async fn test_metadata_failure_keeps_region_disabled() {
    let base = spawn_backend(Router::new()).await;
    let h = harness(&base, Some("tok"), "/prediction");

    let mut form = PredictionForm::new();
    prediction::load_metadata(&h.api, &mut form).await;
    assert!(!form.region_enabled());
    assert!(form.metadata_error().is_some());
    assert!(!prediction::submit(&h.api, &mut form).await);
}

#[tokio::test]
async fn test_model_metrics_accepts_rmse_log() {
    let router = Router::new().route(
        "/api/v1/metrics",
        get(|| async { Json(json!([{"date": "2024-06-01", "rmse_log": 0.31, "r2": 0.88}])) }),
    );
    let base = spawn_backend(router).await;
    let h = harness(&base, None, "/");

    let metrics = h.api.model_metrics().await.unwrap();
    assert_eq!(metrics[0].rmse, 0.31);
}
