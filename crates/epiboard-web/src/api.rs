//! Browser API client
//!
//! Thin `gloo-net` wrappers over the backend endpoints. Every request carries
//! the stored bearer token; a 401/403 clears the credentials and sends the
//! browser to `/login` once per page lifetime.

use crate::config::endpoint;
use crate::storage::LocalStorage;
use epiboard_types::{
    clear_credentials, ApiError, ApiResult, CountryManage, CountryRow, CountrySummary,
    CountryValue, DurableStorage, GlobalStats, InputRow, LoginRequest, LoginResponse, Metadata,
    Metric, ModelMetric, PredictionOut, RedirectGuard, StorageKey, TrendPoint, LOGIN_PATH,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::logging::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

static REDIRECT_GUARD: RedirectGuard = RedirectGuard::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intercept {
    On,
    /// Login: a 401 means bad credentials
    Off,
}

fn authorize(builder: RequestBuilder) -> RequestBuilder {
    match LocalStorage.get(StorageKey::AuthToken).filter(|t| !t.is_empty()) {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

fn handle_auth_failure(status: u16) {
    if let Err(e) = clear_credentials(&LocalStorage) {
        warn!("Failed to clear credentials after {}: {}", status, e);
    }
    let path = current_path();
    if !REDIRECT_GUARD.should_redirect(&path) {
        return;
    }
    warn!("Authentication rejected ({}), redirecting to login", status);
    // Full navigation: the app restarts and hydrates from the cleared storage
    if let Some(window) = web_sys::window() {
        if window.location().set_href(LOGIN_PATH).is_err() {
            warn!("Redirect to {} failed", LOGIN_PATH);
        }
    }
}

async fn finish(
    sent: Result<Response, gloo_net::Error>,
    intercept: Intercept,
) -> ApiResult<Response> {
    let response = sent.map_err(|e| ApiError::network(e.to_string()))?;
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_status(status, &body);
    if intercept == Intercept::On && error.is_auth() {
        handle_auth_failure(status);
    }
    Err(error)
}

async fn send(builder: RequestBuilder) -> ApiResult<Response> {
    finish(authorize(builder).send().await, Intercept::On).await
}

async fn send_json<B: Serialize>(
    builder: RequestBuilder,
    body: &B,
    intercept: Intercept,
) -> ApiResult<Response> {
    let request = authorize(builder)
        .json(body)
        .map_err(|e| ApiError::network(e.to_string()))?;
    finish(request.send().await, intercept).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::decode(e.to_string()))
}

async fn get_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
    decode(send(builder).await?).await
}

// ============================================================================
// Auth
// ============================================================================

/// `POST /auth/login`; success re-arms the redirect guard
pub async fn login(request: &LoginRequest) -> ApiResult<LoginResponse> {
    let response = send_json(
        Request::post(&endpoint("/auth/login")),
        request,
        Intercept::Off,
    )
    .await?;
    let login = decode::<LoginResponse>(response).await?;
    REDIRECT_GUARD.rearm();
    Ok(login)
}

// ============================================================================
// Statistics
// ============================================================================

pub async fn fetch_global_stats() -> ApiResult<GlobalStats> {
    get_json(Request::get(&endpoint("/covid/global"))).await
}

pub async fn fetch_countries_summary() -> ApiResult<Vec<CountrySummary>> {
    get_json(Request::get(&endpoint("/covid/countries/summary"))).await
}

// ============================================================================
// Data management
// ============================================================================

pub async fn fetch_manage_rows() -> ApiResult<Vec<CountryRow>> {
    let rows: Vec<CountryManage> =
        get_json(Request::get(&endpoint("/covid/countries/manage"))).await?;
    Ok(rows.into_iter().map(CountryRow::from).collect())
}

/// Full replace; returns the server's copy
pub async fn update_country(row: &CountryRow) -> ApiResult<CountryRow> {
    let body = CountryManage::from(row.clone());
    let response = send_json(
        Request::put(&endpoint(&format!("/covid/countries/{}", row.id))),
        &body,
        Intercept::On,
    )
    .await?;
    let saved: CountryManage = decode(response).await?;
    Ok(saved.into())
}

pub async fn delete_country(id: &str) -> ApiResult<()> {
    send(Request::delete(&endpoint(&format!("/covid/countries/{}", id))))
        .await
        .map(|_| ())
}

// ============================================================================
// Analytics
// ============================================================================

pub async fn fetch_analytics_top(metric: Metric, limit: u32) -> ApiResult<Vec<CountryValue>> {
    get_json(
        Request::get(&endpoint(&format!("/analytics/{}/top", metric)))
            .query([("limit", limit.to_string())]),
    )
    .await
}

pub async fn fetch_analytics_new(metric: Metric, limit: u32) -> ApiResult<Vec<CountryValue>> {
    get_json(
        Request::get(&endpoint(&format!("/analytics/{}/new", metric)))
            .query([("limit", limit.to_string())]),
    )
    .await
}

pub async fn fetch_analytics_trend(metric: Metric, days: u32) -> ApiResult<Vec<TrendPoint>> {
    get_json(
        Request::get(&endpoint(&format!("/analytics/{}/trend", metric)))
            .query([("days", days.to_string())]),
    )
    .await
}

// ============================================================================
// Prediction
// ============================================================================

pub async fn fetch_metadata() -> ApiResult<Metadata> {
    get_json(Request::get(&endpoint("/metadata"))).await
}

pub async fn predict(row: &InputRow) -> ApiResult<PredictionOut> {
    let response = send_json(Request::post(&endpoint("/predict")), row, Intercept::On).await?;
    decode(response).await
}

pub async fn fetch_model_metrics() -> ApiResult<Vec<ModelMetric>> {
    get_json(Request::get(&endpoint("/metrics"))).await
}
