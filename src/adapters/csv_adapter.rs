//! CSV file quote source adapter.
//!
//! Expects one `<SYMBOL>.csv` per symbol under the base path, with a header
//! row and `datepoint,price` columns, datepoint as `YYYY-MM-DD HH:MM:SS` UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::PathBuf;

use crate::domain::error::StockProfitError;
use crate::domain::query::QuoteQuery;
use crate::domain::quote::StockQuote;
use crate::ports::quote_port::QuotePort;

const DATEPOINT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<StockQuote>, StockProfitError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StockProfitError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut quotes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockProfitError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let datepoint_str = record.get(0).ok_or_else(|| StockProfitError::Database {
                reason: "missing datepoint column".into(),
            })?;
            let datepoint = NaiveDateTime::parse_from_str(datepoint_str, DATEPOINT_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(|e| StockProfitError::Database {
                    reason: format!("invalid datepoint format: {}", e),
                })?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| StockProfitError::Database {
                    reason: "missing price column".into(),
                })?
                .parse()
                .map_err(|e| StockProfitError::Database {
                    reason: format!("invalid price value: {}", e),
                })?;

            quotes.push(StockQuote {
                symbol: symbol.to_string(),
                datepoint,
                price,
            });
        }

        Ok(quotes)
    }
}

impl QuotePort for CsvAdapter {
    fn quotes_for_window(&self, query: &QuoteQuery) -> Result<Vec<StockQuote>, StockProfitError> {
        let mut quotes: Vec<StockQuote> = self
            .read_all(&query.symbol)?
            .into_iter()
            .filter(|q| q.datepoint > query.begin && q.datepoint < query.end)
            .collect();

        // Files are not trusted to be sorted; the port contract is ascending.
        quotes.sort_by_key(|q| q.datepoint);

        Ok(quotes)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StockProfitError> {
        let quotes = self.read_all(symbol)?;
        let min = quotes.iter().map(|q| q.datepoint).min();
        let max = quotes.iter().map(|q| q.datepoint).max();

        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, quotes.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_symbol_file(dir: &tempfile::TempDir, symbol: &str, rows: &[(&str, f64)]) {
        let mut file = fs::File::create(dir.path().join(format!("{}.csv", symbol))).unwrap();
        writeln!(file, "datepoint,price").unwrap();
        for (datepoint, price) in rows {
            writeln!(file, "{},{}", datepoint, price).unwrap();
        }
    }

    #[test]
    fn reads_and_sorts_window() {
        let dir = tempfile::tempdir().unwrap();
        write_symbol_file(
            &dir,
            "UBER",
            &[
                ("2023-11-06 00:00:03", 20.0),
                ("2023-11-06 00:00:01", 10.0),
                ("2023-11-06 00:00:02", 8.0),
            ],
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let query = QuoteQuery::new("UBER", 1_699_228_800, 1_699_232_400).unwrap();
        let quotes = adapter.quotes_for_window(&query).unwrap();

        let prices: Vec<f64> = quotes.iter().map(|q| q.price).collect();
        assert_eq!(prices, vec![10.0, 8.0, 20.0]);
    }

    #[test]
    fn excludes_quotes_on_the_window_bounds() {
        let dir = tempfile::tempdir().unwrap();
        write_symbol_file(
            &dir,
            "UBER",
            &[
                ("2023-11-06 00:00:00", 5.0),
                ("2023-11-06 00:00:05", 10.0),
                ("2023-11-06 00:00:10", 15.0),
            ],
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        // begin is exactly 00:00:00, end exactly 00:00:10; both edges excluded
        let query = QuoteQuery::new("UBER", 1_699_228_800, 1_699_228_810).unwrap();
        let quotes = adapter.quotes_for_window(&query).unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, 10.0);
    }

    #[test]
    fn missing_symbol_file_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let query = QuoteQuery::new("UBER", 0, 1).unwrap();
        assert!(matches!(
            adapter.quotes_for_window(&query),
            Err(StockProfitError::Database { .. })
        ));
    }

    #[test]
    fn rejects_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("UBER.csv")).unwrap();
        writeln!(file, "datepoint,price").unwrap();
        writeln!(file, "not-a-date,10.0").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let query = QuoteQuery::new("UBER", 0, 1).unwrap();
        assert!(matches!(
            adapter.quotes_for_window(&query),
            Err(StockProfitError::Database { .. })
        ));
    }

    #[test]
    fn data_range_covers_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        write_symbol_file(
            &dir,
            "UBER",
            &[
                ("2023-11-06 00:00:05", 10.0),
                ("2023-11-06 00:00:01", 9.0),
            ],
        );
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let (min, max, count) = adapter.data_range("UBER").unwrap().unwrap();
        assert_eq!(min.timestamp(), 1_699_228_801);
        assert_eq!(max.timestamp(), 1_699_228_805);
        assert_eq!(count, 2);
    }
}
