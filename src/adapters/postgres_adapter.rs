//! PostgreSQL quote store adapter.

use chrono::{DateTime, Utc};
use postgres::NoTls;
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;

use crate::domain::error::StockProfitError;
use crate::domain::query::QuoteQuery;
use crate::domain::quote::StockQuote;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

pub struct PostgresAdapter {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockProfitError> {
        // Try [postgres] connection_string first, fall back to [database] conninfo
        let connection_string = config
            .get_string("postgres", "connection_string")
            .or_else(|| config.get_string("database", "conninfo"))
            .ok_or_else(|| StockProfitError::ConfigMissing {
                section: "postgres".into(),
                key: "connection_string".into(),
            })?;

        let pg_config: postgres::Config =
            connection_string
                .parse()
                .map_err(|e: postgres::Error| StockProfitError::ConfigInvalid {
                    section: "postgres".into(),
                    key: "connection_string".into(),
                    reason: e.to_string(),
                })?;

        let pool_size = config.get_int("postgres", "pool_size", 10) as u32;

        let manager = PostgresConnectionManager::new(pg_config, NoTls);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }
}

impl QuotePort for PostgresAdapter {
    fn quotes_for_window(&self, query: &QuoteQuery) -> Result<Vec<StockQuote>, StockProfitError> {
        let mut client = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        let sql = "SELECT symbol, datepoint, price::double precision \
                   FROM stock_quote \
                   WHERE symbol = $1 AND datepoint > $2 AND datepoint < $3 \
                   ORDER BY datepoint ASC";

        let rows = client
            .query(sql, &[&query.symbol, &query.begin, &query.end])
            .map_err(|e| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let quotes = rows
            .into_iter()
            .map(|row| StockQuote {
                symbol: row.get(0),
                datepoint: row.get(1),
                price: row.get(2),
            })
            .collect();

        Ok(quotes)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StockProfitError> {
        let mut client = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StockProfitError::Database {
                reason: e.to_string(),
            })?;

        let sql = "SELECT MIN(datepoint), MAX(datepoint), COUNT(*) \
                   FROM stock_quote WHERE symbol = $1";

        let row = client
            .query_one(sql, &[&symbol])
            .map_err(|e| StockProfitError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let min: Option<DateTime<Utc>> = row.get(0);
        let max: Option<DateTime<Utc>> = row.get(1);
        let count: i64 = row.get(2);

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some((min, max, count as usize))),
            _ => Ok(None),
        }
    }
}
