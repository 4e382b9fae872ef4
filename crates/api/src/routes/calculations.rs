//! Tax calculation routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use smokeduty_core::currency::{ExchangeRate, convert};
use smokeduty_core::tax::{CalculationInput, TaxBreakdown, TaxCalculator};
use smokeduty_fx::RateLookup;
use smokeduty_shared::{AppError, CurrencyCode};
use tracing::{info, warn};

use crate::{AppState, error::app_error_response};

/// Creates the calculation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/calculations", post(create_calculation))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a calculation.
///
/// Decimal fields are strings so they are never parsed through a float.
/// Empty strings count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct CalculationRequest {
    /// Number of sticks.
    pub sticks: Option<i64>,
    /// Weight of one stick in grams.
    pub weight_g: Option<String>,
    /// Currency the prices are quoted in.
    pub currency: Option<String>,
    /// Item price in the foreign currency (defaults to 0).
    pub item_price_foreign: Option<String>,
    /// Shipping cost in the foreign currency (defaults to 0).
    pub shipping_foreign: Option<String>,
    /// Duty rate override (defaults to the configured rate).
    pub duty_rate: Option<String>,
    /// Exchange rate to use instead of any lookup.
    pub fx_rate_manual: Option<String>,
    /// Exchange rate to use only if the lookup is unavailable.
    pub fx_rate_fallback: Option<String>,
}

/// Request values after parsing and validation.
#[derive(Debug)]
struct ParsedRequest {
    sticks: i64,
    weight_g: Decimal,
    currency: CurrencyCode,
    item_price_foreign: Decimal,
    shipping_foreign: Decimal,
    duty_rate_override: Option<Decimal>,
    fx_rate_manual: Option<Decimal>,
    fx_rate_fallback: Option<Decimal>,
}

/// The inputs a breakdown was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationInputs {
    /// Number of sticks.
    pub sticks: i64,
    /// Weight of one stick in grams.
    pub weight_g: Decimal,
    /// Currency the prices are quoted in.
    pub currency: CurrencyCode,
    /// Item price in the foreign currency.
    pub item_price_foreign: Decimal,
    /// Shipping cost in the foreign currency.
    pub shipping_foreign: Decimal,
    /// Duty rate applied: the request override, else the configured default.
    pub duty_rate: Decimal,
}

/// Response for a calculation.
#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    /// The inputs the breakdown was computed from.
    pub inputs: CalculationInputs,
    /// Exchange rate used for conversion.
    pub exchange_rate: ExchangeRate,
    /// Revision marker of the rate file.
    pub rates_updated_at: String,
    /// Itemized result.
    pub breakdown: TaxBreakdown,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_decimal(field: &str, value: &str, errors: &mut Vec<String>) -> Option<Decimal> {
    match Decimal::from_str(value) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(format!("{field} must be a decimal number, got '{value}'"));
            None
        }
    }
}

fn parse_optional(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<Decimal> {
    present(value).and_then(|v| parse_decimal(field, v, errors))
}

impl CalculationRequest {
    /// Parses every field, collecting all problems instead of stopping at the first.
    fn parse(&self) -> Result<ParsedRequest, Vec<String>> {
        let mut errors = Vec::new();

        let sticks = match self.sticks {
            Some(n) if n > 0 => n,
            _ => {
                errors.push("sticks must be at least 1".to_string());
                0
            }
        };

        let weight_g = match present(self.weight_g.as_deref()) {
            Some(raw) => parse_decimal("weight_g", raw, &mut errors),
            None => {
                errors.push("weight_g is required".to_string());
                None
            }
        };
        if weight_g.is_some_and(|w| w <= Decimal::ZERO) {
            errors.push("weight_g must be positive".to_string());
        }

        let currency = match present(self.currency.as_deref()) {
            Some(raw) => raw.parse::<CurrencyCode>().map_err(|e| errors.push(e)).ok(),
            None => {
                errors.push("currency is required".to_string());
                None
            }
        };

        let mut amount = |field: &str, value: Option<&str>| {
            let parsed = parse_optional(field, value, &mut errors).unwrap_or(Decimal::ZERO);
            if parsed < Decimal::ZERO {
                errors.push(format!("{field} must not be negative"));
            }
            parsed
        };
        let item_price_foreign = amount("item_price_foreign", self.item_price_foreign.as_deref());
        let shipping_foreign = amount("shipping_foreign", self.shipping_foreign.as_deref());

        let duty_rate = parse_optional("duty_rate", self.duty_rate.as_deref(), &mut errors);
        if duty_rate.is_some_and(|r| r < Decimal::ZERO || r > Decimal::ONE) {
            errors.push("duty_rate must be between 0 and 1".to_string());
        }

        let fx_rate_manual =
            parse_optional("fx_rate_manual", self.fx_rate_manual.as_deref(), &mut errors);
        let fx_rate_fallback =
            parse_optional("fx_rate_fallback", self.fx_rate_fallback.as_deref(), &mut errors);
        for (field, rate) in [
            ("fx_rate_manual", fx_rate_manual),
            ("fx_rate_fallback", fx_rate_fallback),
        ] {
            if rate.is_some_and(|r| r <= Decimal::ZERO) {
                errors.push(format!("{field} must be positive"));
            }
        }

        match (weight_g, currency) {
            (Some(weight_g), Some(currency)) if errors.is_empty() => Ok(ParsedRequest {
                sticks,
                weight_g,
                currency,
                item_price_foreign,
                shipping_foreign,
                duty_rate_override: duty_rate,
                fx_rate_manual,
                fx_rate_fallback,
            }),
            _ => Err(errors),
        }
    }
}

fn validation_response(errors: &[String]) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "VALIDATION_ERROR",
            "message": errors.join("; "),
            "details": errors
        })),
    )
        .into_response()
}

fn failure(err: impl Into<AppError>) -> Response {
    app_error_response(&err.into())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/calculations` - Convert the prices and compute the tax breakdown.
async fn create_calculation(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> Response {
    let parsed = match request.parse() {
        Ok(parsed) => parsed,
        Err(errors) => {
            warn!(?errors, "Rejected calculation request");
            return validation_response(&errors);
        }
    };

    match calculate(&state, parsed).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(response) => response,
    }
}

async fn calculate(
    state: &AppState,
    parsed: ParsedRequest,
) -> Result<CalculationResponse, Response> {
    let config = state.rates.load().await.map_err(failure)?;

    let today = Local::now().date_naive();
    let lookup = state
        .fx
        .resolve(
            &parsed.currency,
            &state.local_currency,
            parsed.fx_rate_manual,
            parsed.fx_rate_fallback,
            today,
        )
        .await
        .map_err(failure)?;
    let exchange_rate = match lookup {
        RateLookup::Found(rate) => rate,
        RateLookup::Unavailable => {
            return Err(failure(AppError::ExternalService(format!(
                "No exchange rate available for {}/{}; enter one manually",
                parsed.currency, state.local_currency
            ))));
        }
    };

    let input = CalculationInput {
        sticks: parsed.sticks,
        weight_per_stick_grams: parsed.weight_g,
        item_price: convert(parsed.item_price_foreign, exchange_rate.rate).map_err(failure)?,
        shipping: convert(parsed.shipping_foreign, exchange_rate.rate).map_err(failure)?,
    };
    let params = config.parameters(parsed.duty_rate_override);
    let breakdown = TaxCalculator::calculate(&input, &params).map_err(failure)?;

    info!(
        sticks = parsed.sticks,
        currency = %parsed.currency,
        rate = %exchange_rate.rate,
        source = %exchange_rate.source,
        grand_total = %breakdown.grand_total,
        "Calculation completed"
    );

    Ok(CalculationResponse {
        inputs: CalculationInputs {
            sticks: parsed.sticks,
            weight_g: parsed.weight_g,
            currency: parsed.currency,
            item_price_foreign: parsed.item_price_foreign,
            shipping_foreign: parsed.shipping_foreign,
            duty_rate: params.duty_rate,
        },
        exchange_rate,
        rates_updated_at: config.updated_at,
        breakdown,
    })
}
