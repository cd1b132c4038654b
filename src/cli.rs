//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::web::{build_router, AppState, RateLimit};
use crate::domain::error::StockProfitError;
use crate::domain::max_profit::max_profit_for_period;
use crate::domain::query::QuoteQuery;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

#[derive(Parser, Debug)]
#[command(name = "stockprofit", about = "Max-profit window service over stock quotes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Compute the max-profit window directly against the data source
    MaxProfit {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        begin: i64,
        #[arg(long)]
        end: i64,
        #[arg(long)]
        symbol: String,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::MaxProfit {
            config,
            begin,
            end,
            symbol,
        } => run_max_profit(&config, begin, end, &symbol),
        Command::Info { config, symbol } => run_info(&config, &symbol),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StockProfitError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Wire the data source selected by `[data] source` (default sqlite).
pub fn build_quote_port(
    config: &dyn ConfigPort,
) -> Result<Arc<dyn QuotePort + Send + Sync>, StockProfitError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "sqlite".to_string());

    match source.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            Ok(Arc::new(adapter))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let adapter = crate::adapters::postgres_adapter::PostgresAdapter::from_config(config)?;
            Ok(Arc::new(adapter))
        }
        "csv" => {
            let path =
                config
                    .get_string("csv", "path")
                    .ok_or_else(|| StockProfitError::ConfigMissing {
                        section: "csv".into(),
                        key: "path".into(),
                    })?;
            Ok(Arc::new(CsvAdapter::new(PathBuf::from(path))))
        }
        other => Err(StockProfitError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown data source '{other}'"),
        }),
    }
}

/// Shared by the `max-profit` subcommand and its tests: full pipeline from
/// config to serialized result.
pub fn compute_max_profit(
    config: &dyn ConfigPort,
    begin: i64,
    end: i64,
    symbol: &str,
) -> Result<String, StockProfitError> {
    let quote_port = build_quote_port(config)?;
    let query = QuoteQuery::new(symbol, begin, end)?;
    let history = quote_port.quotes_for_window(&query)?;
    let result = max_profit_for_period(&history)?;

    serde_json::to_string_pretty(&result).map_err(|e| StockProfitError::Io(std::io::Error::other(e)))
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockprofit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    init_tracing();

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let quote_port = match build_quote_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let addr: std::net::SocketAddr = config
        .get_string("server", "listen")
        .unwrap_or_else(|| "127.0.0.1:8080".to_string())
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8080".parse().unwrap());

    let rate_limit = RateLimit::new(
        config.get_int("server", "rate_per_second", 2) as u32,
        config.get_int("server", "rate_burst", 4) as u32,
    );

    tracing::info!(%addr, "starting web server");

    let state = AppState { quote_port };
    let router = build_router(state, rate_limit);

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, router).await.unwrap();
    });

    ExitCode::SUCCESS
}

fn run_max_profit(config_path: &PathBuf, begin: i64, end: i64, symbol: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match compute_max_profit(&config, begin, end, symbol) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, symbol: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let quote_port = match build_quote_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match quote_port.data_range(symbol) {
        Ok(Some((min, max, count))) => {
            println!("{symbol}: {count} quotes from {min} to {max}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("{symbol}: no quotes stored");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
