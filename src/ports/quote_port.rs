//! Data access port trait.

use chrono::{DateTime, Utc};

use crate::domain::error::StockProfitError;
use crate::domain::query::QuoteQuery;
use crate::domain::quote::StockQuote;

/// Outbound contract for loading stock quotes.
///
/// Implementations return quotes for the query's symbol with datepoint
/// strictly inside the `(begin, end)` window, ascending by datepoint.
pub trait QuotePort {
    fn quotes_for_window(&self, query: &QuoteQuery) -> Result<Vec<StockQuote>, StockProfitError>;

    /// Earliest datepoint, latest datepoint and quote count for a symbol, or
    /// `None` when the store holds nothing for it.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StockProfitError>;
}
