//! Intake Kernel Library
//!
//! The notification forwarder: routes, providers and shared state.
//! The main entry point for running the server is the `intake` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod forwarder;
pub mod metrics;
pub mod providers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the full application router.
pub fn app(state: AppState, config: &Config) -> Router {
    Router::new()
        .merge(routes::submit::router())
        .merge(routes::health::router())
        .merge(routes::metrics::router())
        .with_state(state)
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// CORS for browser callers of the forwarder.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
    ];

    if config.cors_is_wildcard() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}
