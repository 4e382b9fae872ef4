//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - Error to response mapping
//! - Shared application state

pub mod error;
pub mod routes;

use axum::Router;
use smokeduty_fx::RateLookupService;
use smokeduty_shared::CurrencyCode;
use smokeduty_store::RateConfigRepository;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Jurisdiction rate file.
    pub rates: Arc<RateConfigRepository>,
    /// Exchange rate lookup.
    pub fx: Arc<RateLookupService>,
    /// Currency all amounts are converted into.
    pub local_currency: CurrencyCode,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
