//! Gemini Relay - credential-hiding chat proxy
//!
//! A browser (or terminal) chat client keeps the whole conversation and posts it on
//! every turn. The relay attaches the server-held credential, calls the upstream
//! model API and answers with `{ "reply" }` or `{ "error" }`.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod client;
pub mod config;
pub mod conversation;
pub mod core;
pub mod providers;
pub mod routes;

#[cfg(test)]
mod testing;

use config::Config;
use crate::core::Relay;
use providers::{Upstream, UpstreamError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>, config: &Config) -> Self {
        Self {
            relay: Arc::new(Relay::new(upstream, config.upstream_timeout)),
        }
    }

    /// State backed by the upstream selected in `config`
    pub fn from_config(
        config: &Config,
        system_instruction: Option<String>,
    ) -> Result<Self, UpstreamError> {
        let upstream = providers::from_config(config, system_instruction)?;
        Ok(Self::new(upstream, config))
    }
}

/// The complete HTTP application: API routes, static client, CORS and tracing
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(routes::router(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
