//! Rate configuration routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use smokeduty_shared::AppError;

use crate::{AppState, error::app_error_response};

/// Creates the rate configuration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rates", get(get_rates))
}

/// GET `/rates` - Current jurisdiction rates, as read from the rate file.
async fn get_rates(State(state): State<AppState>) -> Response {
    match state.rates.load().await {
        Ok(config) => Json(config).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}
