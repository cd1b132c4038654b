//! HTTP request handlers for the web adapter.

use axum::{
    extract::{Query, State},
    http::Method,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::max_profit::max_profit_for_period;
use crate::domain::query::{validate_request, RawQuoteRequest};
use crate::domain::quote::MaxProfitPoints;
use crate::ports::quote_port::QuotePort;

use super::{ApiError, AppState};

/// Raw query parameters as text. Presence and format checks belong to the
/// domain validator, so nothing is typed here.
#[derive(Debug, Deserialize)]
pub struct MaxProfitParams {
    begin: Option<String>,
    end: Option<String>,
    symbol: Option<String>,
}

/// `GET /maxprofit?begin=<secs>&end=<secs>&symbol=<SYM>`
///
/// Status codes: 200 with the buy/sell pair as JSON, 400 on malformed
/// parameters, 404 when no quotes or no realizable profit exist, 405 for
/// methods outside GET/HEAD/OPTIONS, 429 when rate limited, 500 otherwise.
pub async fn max_profit(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(params): Query<MaxProfitParams>,
) -> Result<Json<MaxProfitPoints>, ApiError> {
    let raw = RawQuoteRequest {
        method: method.as_str(),
        begin: params.begin.as_deref(),
        end: params.end.as_deref(),
        symbol: params.symbol.as_deref(),
    };
    let query = validate_request(&raw)?;

    let history = state.quote_port.quotes_for_window(&query)?;
    let result = max_profit_for_period(&history)?;

    Ok(Json(result))
}
