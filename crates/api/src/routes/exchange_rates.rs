//! Exchange rate lookup routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smokeduty_fx::RateLookup;
use smokeduty_shared::CurrencyCode;

use crate::{AppState, error::error_response};

/// Creates the exchange rate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/exchange-rates", get(get_exchange_rate))
}

/// Query parameters for getting an exchange rate.
#[derive(Debug, Deserialize)]
pub struct GetExchangeRateQuery {
    /// Source currency code.
    pub from: String,
    /// Target currency code (defaults to the local currency).
    pub to: Option<String>,
}

/// Response for an exchange rate lookup.
#[derive(Debug, Serialize)]
pub struct ExchangeRateResponse {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate.
    pub rate: Decimal,
    /// How the rate was obtained: "cache", "identity" or the provider name.
    pub source: String,
    /// Day the rate applies to.
    pub date: Option<NaiveDate>,
}

/// GET `/exchange-rates?from=USD&to=JPY` - Today's rate for a currency pair.
async fn get_exchange_rate(
    State(state): State<AppState>,
    Query(query): Query<GetExchangeRateQuery>,
) -> Response {
    let from = match query.from.parse::<CurrencyCode>() {
        Ok(code) => code,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, "invalid_currency", message),
    };
    let to = match query.to.as_deref().map(str::parse::<CurrencyCode>) {
        None => state.local_currency.clone(),
        Some(Ok(code)) => code,
        Some(Err(message)) => {
            return error_response(StatusCode::BAD_REQUEST, "invalid_currency", message);
        }
    };

    let today = Local::now().date_naive();
    match state.fx.lookup(&from, &to, today).await {
        RateLookup::Found(rate) => (
            StatusCode::OK,
            Json(ExchangeRateResponse {
                from_currency: rate.from_currency,
                to_currency: rate.to_currency,
                rate: rate.rate,
                source: rate.source.to_string(),
                date: rate.effective_date,
            }),
        )
            .into_response(),
        RateLookup::Unavailable => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "rate_unavailable",
            format!("No exchange rate available for {from}/{to}; enter one manually"),
        ),
    }
}
