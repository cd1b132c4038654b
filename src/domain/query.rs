//! Request validation: raw request fields into a range-checked [`QuoteQuery`].

use chrono::{DateTime, Utc};

use crate::domain::error::StockProfitError;

pub const BEGIN: &str = "begin";
pub const END: &str = "end";
pub const SYMBOL: &str = "symbol";

const ALLOWED_METHODS: [&str; 3] = ["GET", "HEAD", "OPTIONS"];

/// An untyped request as seen at the boundary, before any validation.
#[derive(Debug, Clone, Copy)]
pub struct RawQuoteRequest<'a> {
    pub method: &'a str,
    pub begin: Option<&'a str>,
    pub end: Option<&'a str>,
    pub symbol: Option<&'a str>,
}

/// A validated window plus symbol, ready for data lookup.
///
/// Constructed only through [`QuoteQuery::new`] or [`validate_request`], so a
/// value of this type always satisfies `begin <= end` and the symbol length
/// bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteQuery {
    pub symbol: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuoteQuery {
    /// Build a query from epoch seconds, enforcing the window and symbol
    /// invariants shared by the HTTP and CLI paths.
    pub fn new(symbol: &str, begin_secs: i64, end_secs: i64) -> Result<Self, StockProfitError> {
        let begin = DateTime::from_timestamp(begin_secs, 0)
            .ok_or(StockProfitError::ParamNotSeconds { param: BEGIN })?;
        let end = DateTime::from_timestamp(end_secs, 0)
            .ok_or(StockProfitError::ParamNotSeconds { param: END })?;

        if begin > end {
            return Err(StockProfitError::BeginAfterEnd { begin, end });
        }

        let length = symbol.chars().count();
        if !(1..=4).contains(&length) {
            return Err(StockProfitError::SymbolLength { length });
        }

        Ok(Self {
            symbol: symbol.to_string(),
            begin,
            end,
        })
    }
}

/// Validate an incoming request and produce a [`QuoteQuery`].
///
/// Checks run in a fixed order so the reported error is stable when several
/// fields are wrong at once: method, parameter presence (begin, end, symbol),
/// integer parsing (begin, end), window ordering, symbol length.
pub fn validate_request(req: &RawQuoteRequest<'_>) -> Result<QuoteQuery, StockProfitError> {
    if !ALLOWED_METHODS.contains(&req.method) {
        return Err(StockProfitError::MethodNotAllowed {
            method: req.method.to_string(),
        });
    }

    let begin = req.begin.ok_or(StockProfitError::ParamMissing { param: BEGIN })?;
    let end = req.end.ok_or(StockProfitError::ParamMissing { param: END })?;
    let symbol = req
        .symbol
        .ok_or(StockProfitError::ParamMissing { param: SYMBOL })?;

    let begin_secs: i64 = begin
        .parse()
        .map_err(|_| StockProfitError::ParamNotSeconds { param: BEGIN })?;
    let end_secs: i64 = end
        .parse()
        .map_err(|_| StockProfitError::ParamNotSeconds { param: END })?;

    QuoteQuery::new(symbol, begin_secs, end_secs)
}
