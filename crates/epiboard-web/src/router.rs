//! Web router using Axum
//!
//! Serves the built bundle, a health probe and a same-origin proxy to the
//! backend so the browser never needs CORS against the API.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use rust_embed::RustEmbed;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

/// Trunk output, embedded at compile time
#[derive(RustEmbed)]
#[folder = "dist/"]
#[allow_missing = true]
struct Assets;

/// Request headers relayed to the backend
const FORWARDED_HEADERS: [header::HeaderName; 3] =
    [header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT];

#[derive(Clone)]
pub struct ServerState {
    http: reqwest::Client,
    /// Backend root without trailing slash, e.g. `http://localhost:8000`
    backend: String,
}

impl ServerState {
    pub fn new(backend: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("epiboard-web/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build proxy HTTP client")?;
        Ok(Self {
            http,
            backend: backend.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }
}

/// Create the web router
pub fn create_router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/v1/{*path}", any(proxy_handler))
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}

async fn health_handler(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.backend,
    }))
}

/// Relay `/api/v1/*` to the backend; status and body pass through untouched
async fn proxy_handler(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = format!("{}{}", state.backend, target);
    debug!(%method, %url, "Proxying request");

    let mut request = state.http.request(method, &url).body(body);
    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }

    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(e) => return bad_gateway(&url, &e),
    };

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    match upstream.bytes().await {
        Ok(bytes) => {
            let mut response = (status, bytes).into_response();
            if let Some(content_type) = content_type {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            response
        }
        Err(e) => bad_gateway(&url, &e),
    }
}

fn bad_gateway(url: &str, error: &reqwest::Error) -> Response {
    warn!(url, error = %error, "Backend unreachable");
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "detail": format!("Backend unreachable: {}", error) })),
    )
        .into_response()
}

fn embedded(path: &str) -> Option<Response> {
    let file = Assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(([(header::CONTENT_TYPE, mime.as_ref().to_string())], file.data).into_response())
}

/// Bundle files, then `index.html` for client-side routes, then the setup page
async fn static_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    if path.starts_with("api/") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Not Found" })),
        )
            .into_response();
    }

    let path = if path.is_empty() { "index.html" } else { path };
    embedded(path)
        .or_else(|| embedded("index.html"))
        .unwrap_or_else(|| Html(SETUP_PAGE).into_response())
}

const SETUP_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Covid App - setup</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: system-ui, -apple-system, sans-serif;
            background: #f5f5f5;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
        }
        .setup-message {
            max-width: 600px;
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }
        h1 { font-size: 2rem; margin-bottom: 1rem; color: #1a1a1a; }
        p { margin-bottom: 1rem; color: #333; line-height: 1.6; }
        code {
            background: #f0f0f0;
            padding: 0.25rem 0.5rem;
            border-radius: 4px;
            font-family: monospace;
        }
        .step {
            margin: 1.5rem 0;
            padding: 1rem;
            background: #f8f8f8;
            border-left: 3px solid #333;
        }
    </style>
</head>
<body>
    <div class="setup-message">
        <h1>Frontend not built</h1>
        <p>The server is running but no browser bundle was embedded.</p>
        <div class="step">
            <p>Build the bundle, then rebuild the binary:</p>
            <p><code>cd crates/epiboard-web &amp;&amp; trunk build --release</code></p>
        </div>
        <p>The API proxy is available at <code>/api/v1</code> and the health probe at <code>/api/health</code>.</p>
    </div>
</body>
</html>
"#;
