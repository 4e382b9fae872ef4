//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod calculations;
pub mod exchange_rates;
pub mod health;
pub mod rates;

#[cfg(test)]
pub(crate) mod test_support;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(rates::routes())
        .merge(exchange_rates::routes())
        .merge(calculations::routes())
}
