//! Stock quote and trade point representations.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One timestamped price sample for a symbol, as returned by a data source.
///
/// Sequences handed to the engine are ascending by `datepoint`; the data
/// source is responsible for the ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub symbol: String,
    pub datepoint: DateTime<Utc>,
    pub price: f64,
}

/// One side (buy or sell) of a realized trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePoint {
    pub price: f64,
    pub date: DateTime<Utc>,
}

/// The buy/sell pair yielding maximum margin within a requested window.
///
/// Invariants, upheld by construction in the engine: the sell point occurs
/// strictly after the buy point, and `sell.price - buy.price > 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxProfitPoints {
    #[serde(rename = "buyPoint")]
    pub buy_point: TradePoint,
    #[serde(rename = "sellPoint")]
    pub sell_point: TradePoint,
}
