//! Web server adapter.
//!
//! Axum router exposing the max-profit endpoint as a JSON API. The router is
//! an explicit value built once at startup and handed to the listener.

mod error;
mod handlers;
mod rate_limit;

pub use error::{status_from_error, ApiError, ErrorBody};
pub use handlers::*;
pub use rate_limit::RateLimit;

use axum::{routing::any, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ports::quote_port::QuotePort;

pub struct AppState {
    pub quote_port: Arc<dyn QuotePort + Send + Sync>,
}

pub fn build_router(state: AppState, rate_limit: RateLimit) -> Router {
    Router::new()
        // All methods route to the handler; the validator owns the 405
        // decision so the response keeps the JSON error envelope.
        .route("/maxprofit", any(handlers::max_profit))
        // Admission control sits outside the handler: a rejected request
        // never reaches the validator.
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            rate_limit::admission,
        ))
        // Clients may run on a separate origin.
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
