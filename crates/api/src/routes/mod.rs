//! API route definitions.

pub mod health;
pub mod movements;
pub mod reports;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use cajero_core::ledger::LedgerError;

use crate::AppState;

/// Creates the API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(movements::routes())
        .merge(reports::routes())
}

/// Maps a ledger error to an HTTP response with a JSON error body.
pub(crate) fn error_response(err: &LedgerError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, "Ledger operation failed");
        // Internal detail stays out of the response body.
        return (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
