//! HTTP API client
//!
//! Single configured `reqwest` client. Every request picks up the bearer
//! token from durable storage; every 401/403 clears the credentials and
//! sends the user to the login route, at most once until the next login.
//! No retries, no backoff.

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::navigation::Navigator;
use crate::session::SessionStore;
use epiboard_types::{
    ApiError, ApiResult, CountryManage, CountryRow, CountrySummary, CountryValue, GlobalStats,
    InputRow, LoginRequest, LoginResponse, Metadata, Metric, ModelMetric, PredictionOut,
    RedirectGuard, TrendPoint, LOGIN_PATH,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Whether a failing 401/403 triggers the forced-logout path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intercept {
    On,
    /// Credential exchange: a 401 means bad credentials, not an expired session
    Off,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    redirect_guard: RedirectGuard,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("epiboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CoreError::HttpClient)?;
        Ok(Self::with_client(http, config.api_base(), session, navigator))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
            redirect_guard: RedirectGuard::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn send(&self, builder: RequestBuilder, intercept: Intercept) -> ApiResult<Response> {
        let builder = match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response");
            ApiError::network(e.to_string())
        })?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), &body);
        if intercept == Intercept::On && error.is_auth() {
            self.handle_auth_failure(status.as_u16());
        }
        Err(error)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder, Intercept::On).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Forced logout: clear credentials, then redirect once unless already on the login route
    fn handle_auth_failure(&self, status: u16) {
        self.session.force_logout(status);
        let current = self.navigator.current_path();
        if self.redirect_guard.should_redirect(&current) {
            warn!(status, from = %current, "Authentication rejected, redirecting to login");
            self.navigator.navigate(LOGIN_PATH);
        }
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// `POST /auth/login`; success re-arms the redirect guard
    pub async fn authenticate(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let builder = self.http.post(self.url("/auth/login")).json(request);
        let response = self.send(builder, Intercept::Off).await?;
        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))?;
        self.redirect_guard.rearm();
        Ok(login)
    }

    /// `POST /auth/logout`, best effort
    pub async fn logout_remote(&self) -> ApiResult<()> {
        self.send(self.http.post(self.url("/auth/logout")), Intercept::Off)
            .await
            .map(|_| ())
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub async fn global_stats(&self) -> ApiResult<GlobalStats> {
        self.json(self.http.get(self.url("/covid/global"))).await
    }

    pub async fn countries_summary(&self) -> ApiResult<Vec<CountrySummary>> {
        self.json(self.http.get(self.url("/covid/countries/summary")))
            .await
    }

    // ========================================================================
    // Data management (converted to the table shape at this boundary)
    // ========================================================================

    pub async fn manage_list(&self) -> ApiResult<Vec<CountryRow>> {
        let rows: Vec<CountryManage> = self
            .json(self.http.get(self.url("/covid/countries/manage")))
            .await?;
        Ok(rows.into_iter().map(CountryRow::from).collect())
    }

    /// Full replace; returns the server's authoritative copy
    pub async fn manage_update(&self, row: &CountryRow) -> ApiResult<CountryRow> {
        let body = CountryManage::from(row.clone());
        let saved: CountryManage = self
            .json(
                self.http
                    .put(self.url(&format!("/covid/countries/{}", row.id)))
                    .json(&body),
            )
            .await?;
        Ok(saved.into())
    }

    pub async fn manage_delete(&self, id: &str) -> ApiResult<()> {
        let builder = self.http.delete(self.url(&format!("/covid/countries/{}", id)));
        self.send(builder, Intercept::On).await.map(|_| ())
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    pub async fn analytics_top(&self, metric: Metric, limit: u32) -> ApiResult<Vec<CountryValue>> {
        self.json(
            self.http
                .get(self.url(&format!("/analytics/{}/top", metric)))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn analytics_new(&self, metric: Metric, limit: u32) -> ApiResult<Vec<CountryValue>> {
        self.json(
            self.http
                .get(self.url(&format!("/analytics/{}/new", metric)))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn analytics_trend(&self, metric: Metric, days: u32) -> ApiResult<Vec<TrendPoint>> {
        self.json(
            self.http
                .get(self.url(&format!("/analytics/{}/trend", metric)))
                .query(&[("days", days)]),
        )
        .await
    }

    // ========================================================================
    // Prediction
    // ========================================================================

    pub async fn metadata(&self) -> ApiResult<Metadata> {
        self.json(self.http.get(self.url("/metadata"))).await
    }

    pub async fn predict(&self, row: &InputRow) -> ApiResult<PredictionOut> {
        self.json(self.http.post(self.url("/predict")).json(row))
            .await
    }

    /// Model evaluation history (no login required)
    pub async fn model_metrics(&self) -> ApiResult<Vec<ModelMetric>> {
        self.json(self.http.get(self.url("/metrics"))).await
    }
}
