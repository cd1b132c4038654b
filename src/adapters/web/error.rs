//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::error::StockProfitError;

/// JSON envelope for every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub fn status_from_error(err: &StockProfitError) -> StatusCode {
    match err {
        StockProfitError::ParamMissing { .. }
        | StockProfitError::ParamNotSeconds { .. }
        | StockProfitError::BeginAfterEnd { .. }
        | StockProfitError::SymbolLength { .. } => StatusCode::BAD_REQUEST,
        StockProfitError::NoQuotes | StockProfitError::NoProfit => StatusCode::NOT_FOUND,
        StockProfitError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        StockProfitError::Database { .. }
        | StockProfitError::DatabaseQuery { .. }
        | StockProfitError::ConfigParse { .. }
        | StockProfitError::ConfigMissing { .. }
        | StockProfitError::ConfigInvalid { .. }
        | StockProfitError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StockProfitError> for ApiError {
    fn from(err: StockProfitError) -> Self {
        let status = status_from_error(&err);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Full detail stays in the server log; the client gets a generic
            // message.
            tracing::error!(error = %err, "internal error");
            Self::new(status, "Internal server error")
        } else {
            tracing::debug!(error = %err, "request rejected");
            Self::new(status, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
