//! Domain error types.

use chrono::{DateTime, Utc};

/// Top-level error type for stockprofit.
///
/// The HTTP boundary maps variants onto status codes without string matching,
/// so every rejection reason gets its own variant with the context it needs.
#[derive(Debug, thiserror::Error)]
pub enum StockProfitError {
    #[error("{param} param is missing")]
    ParamMissing { param: &'static str },

    #[error("{param} param can't be parsed as seconds")]
    ParamNotSeconds { param: &'static str },

    #[error("begin period {begin} is after the end period {end}")]
    BeginAfterEnd {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("stock symbol must be between 1 and 4 chars long, got {length}")]
    SymbolLength { length: usize },

    #[error("method {method} not allowed")]
    MethodNotAllowed { method: String },

    #[error("no records found for the given period")]
    NoQuotes,

    #[error("it's not possible to realize a profit in the given period")]
    NoProfit,

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockProfitError> for std::process::ExitCode {
    fn from(err: &StockProfitError) -> Self {
        let code: u8 = match err {
            StockProfitError::Io(_) => 1,
            StockProfitError::ConfigParse { .. }
            | StockProfitError::ConfigMissing { .. }
            | StockProfitError::ConfigInvalid { .. } => 2,
            StockProfitError::Database { .. } | StockProfitError::DatabaseQuery { .. } => 3,
            StockProfitError::ParamMissing { .. }
            | StockProfitError::ParamNotSeconds { .. }
            | StockProfitError::BeginAfterEnd { .. }
            | StockProfitError::SymbolLength { .. }
            | StockProfitError::MethodNotAllowed { .. } => 4,
            StockProfitError::NoQuotes | StockProfitError::NoProfit => 5,
        };
        std::process::ExitCode::from(code)
    }
}
