//! epiboard-web - Web frontend for epiboard using Leptos + Axum
//!
//! The browser application (csr) talks to `/api/v1` directly or through the
//! proxy in [`router`] when served by `epiboard web`.

#![recursion_limit = "1024"]

pub mod api;
pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod i18n;
pub mod pages;
pub mod storage;

#[cfg(feature = "ssr")]
pub mod router;

pub use app::App;

#[cfg(feature = "ssr")]
pub use router::{create_router, ServerState};

#[cfg(feature = "ssr")]
mod server {
    use crate::router::{create_router, ServerState};
    use anyhow::{Context, Result};
    use epiboard_core::ClientConfig;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tracing::info;

    /// Run the web server, proxying `/api/v1` to `config.api_root`
    pub async fn run(config: &ClientConfig, port: u16) -> Result<()> {
        let state = ServerState::new(config.api_root.clone())?;
        let router = create_router(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!(%addr, backend = %config.api_root, "Web server listening");

        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[cfg(feature = "ssr")]
pub use server::run;
