#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use stockprofit::domain::error::StockProfitError;
use stockprofit::domain::query::QuoteQuery;
pub use stockprofit::domain::quote::StockQuote;
use stockprofit::ports::quote_port::QuotePort;

pub struct MockQuotePort {
    pub data: HashMap<String, Vec<StockQuote>>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quotes(mut self, symbol: &str, quotes: Vec<StockQuote>) -> Self {
        self.data.insert(symbol.to_string(), quotes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn quotes_for_window(&self, query: &QuoteQuery) -> Result<Vec<StockQuote>, StockProfitError> {
        if let Some(reason) = self.errors.get(&query.symbol) {
            return Err(StockProfitError::Database {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(&query.symbol).cloned().unwrap_or_default())
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StockProfitError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockProfitError::Database {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(quotes) if !quotes.is_empty() => {
                let min = quotes.iter().map(|q| q.datepoint).min().unwrap();
                let max = quotes.iter().map(|q| q.datepoint).max().unwrap();
                Ok(Some((min, max, quotes.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn make_quote(symbol: &str, secs: i64, price: f64) -> StockQuote {
    StockQuote {
        symbol: symbol.to_string(),
        datepoint: DateTime::from_timestamp(secs, 0).unwrap(),
        price,
    }
}

/// One quote per second starting just inside the canonical test window
/// (begin=1699228800 is exclusive, so the first quote lands one second in).
pub fn quote_series(symbol: &str, prices: &[f64]) -> Vec<StockQuote> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| make_quote(symbol, 1_699_228_801 + i as i64, price))
        .collect()
}
