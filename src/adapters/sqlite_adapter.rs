//! SQLite quote store adapter.

use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::domain::error::StockProfitError;
use crate::domain::query::QuoteQuery;
use crate::domain::quote::StockQuote;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

// Stored in UTC; the format sorts lexicographically, so the range predicates
// in SQL compare correctly on TEXT.
const DATEPOINT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockProfitError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| StockProfitError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, StockProfitError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), StockProfitError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS stock_quote (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                datepoint TEXT NOT NULL,
                price REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_stock_quote_symbol_datepoint
                ON stock_quote(symbol, datepoint);",
        )
        .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_quotes(&self, quotes: &[StockQuote]) -> Result<(), StockProfitError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for quote in quotes {
            tx.execute(
                "INSERT INTO stock_quote (symbol, datepoint, price) VALUES (?1, ?2, ?3)",
                params![
                    quote.symbol,
                    quote.datepoint.format(DATEPOINT_FORMAT).to_string(),
                    quote.price,
                ],
            )
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

fn parse_datepoint(text: &str) -> Result<DateTime<Utc>, StockProfitError> {
    NaiveDateTime::parse_from_str(text, DATEPOINT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StockProfitError::DatabaseQuery {
            reason: format!("invalid datepoint {text}: {e}"),
        })
}

impl QuotePort for SqliteAdapter {
    fn quotes_for_window(&self, query: &QuoteQuery) -> Result<Vec<StockQuote>, StockProfitError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        let mut stmt = conn
            .prepare(
                "SELECT symbol, datepoint, price FROM stock_quote \
                 WHERE symbol = ?1 AND datepoint > ?2 AND datepoint < ?3 \
                 ORDER BY datepoint ASC",
            )
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(
                params![
                    query.symbol,
                    query.begin.format(DATEPOINT_FORMAT).to_string(),
                    query.end.format(DATEPOINT_FORMAT).to_string(),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                },
            )
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut quotes = Vec::new();
        for row in rows {
            let (symbol, datepoint, price) =
                row.map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
            quotes.push(StockQuote {
                symbol,
                datepoint: parse_datepoint(&datepoint)?,
                price,
            });
        }

        Ok(quotes)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StockProfitError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        let row: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(datepoint), MAX(datepoint), COUNT(*) \
                 FROM stock_quote WHERE symbol = ?1",
                params![symbol],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e: rusqlite::Error| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match row {
            (Some(min), Some(max), count) if count > 0 => Ok(Some((
                parse_datepoint(&min)?,
                parse_datepoint(&max)?,
                count as usize,
            ))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, secs: i64, price: f64) -> StockQuote {
        StockQuote {
            symbol: symbol.into(),
            datepoint: DateTime::from_timestamp(secs, 0).unwrap(),
            price,
        }
    }

    fn seeded_adapter(quotes: &[StockQuote]) -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        adapter.insert_quotes(quotes).unwrap();
        adapter
    }

    fn window(symbol: &str, begin: i64, end: i64) -> QuoteQuery {
        QuoteQuery::new(symbol, begin, end).unwrap()
    }

    #[test]
    fn fetches_quotes_in_ascending_order() {
        // Inserted out of order; the query must sort by datepoint.
        let adapter = seeded_adapter(&[
            quote("UBER", 3_000, 20.0),
            quote("UBER", 1_000, 10.0),
            quote("UBER", 2_000, 15.0),
        ]);

        let quotes = adapter
            .quotes_for_window(&window("UBER", 0, 10_000))
            .unwrap();

        let times: Vec<i64> = quotes.iter().map(|q| q.datepoint.timestamp()).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
        assert_eq!(quotes[0].price, 10.0);
    }

    #[test]
    fn window_bounds_are_strictly_exclusive() {
        let adapter = seeded_adapter(&[
            quote("UBER", 1_000, 10.0),
            quote("UBER", 2_000, 15.0),
            quote("UBER", 3_000, 20.0),
        ]);

        let quotes = adapter
            .quotes_for_window(&window("UBER", 1_000, 3_000))
            .unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].datepoint.timestamp(), 2_000);
    }

    #[test]
    fn filters_by_symbol() {
        let adapter = seeded_adapter(&[
            quote("UBER", 1_000, 10.0),
            quote("LYFT", 1_500, 11.0),
            quote("UBER", 2_000, 15.0),
        ]);

        let quotes = adapter
            .quotes_for_window(&window("LYFT", 0, 10_000))
            .unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "LYFT");
    }

    #[test]
    fn empty_window_returns_empty_vec() {
        let adapter = seeded_adapter(&[quote("UBER", 1_000, 10.0)]);
        let quotes = adapter
            .quotes_for_window(&window("UBER", 5_000, 9_000))
            .unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn data_range_reports_bounds_and_count() {
        let adapter = seeded_adapter(&[
            quote("UBER", 1_000, 10.0),
            quote("UBER", 3_000, 20.0),
            quote("UBER", 2_000, 15.0),
        ]);

        let (min, max, count) = adapter.data_range("UBER").unwrap().unwrap();
        assert_eq!(min.timestamp(), 1_000);
        assert_eq!(max.timestamp(), 3_000);
        assert_eq!(count, 3);
    }

    #[test]
    fn data_range_is_none_for_unknown_symbol() {
        let adapter = seeded_adapter(&[quote("UBER", 1_000, 10.0)]);
        assert!(adapter.data_range("LYFT").unwrap().is_none());
    }

    #[test]
    fn from_config_requires_path() {
        struct EmptyConfig;
        impl ConfigPort for EmptyConfig {
            fn get_string(&self, _: &str, _: &str) -> Option<String> {
                None
            }
            fn get_int(&self, _: &str, _: &str, default: i64) -> i64 {
                default
            }
            fn get_bool(&self, _: &str, _: &str, default: bool) -> bool {
                default
            }
        }

        assert!(matches!(
            SqliteAdapter::from_config(&EmptyConfig),
            Err(StockProfitError::ConfigMissing { .. })
        ));
    }
}
