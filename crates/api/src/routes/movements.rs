//! Movement routes: balance mutations and movement listings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use cajero_shared::types::MovementId;

use crate::AppState;
use crate::routes::error_response;

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route("/movements", post(create_movement))
        .route("/movements/report", get(movements_by_date))
        .route("/movements/{movement_id}", put(update_movement))
        .route("/movements/{movement_id}", delete(delete_movement))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for applying a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Target account number.
    pub account_number: String,
    /// Movement kind token ("Deposito" or "Retiro", case-insensitive).
    pub kind: String,
    /// Positive amount.
    pub amount: Decimal,
}

/// Request body for revising a movement.
#[derive(Debug, Deserialize)]
pub struct UpdateMovementRequest {
    /// Movement kind token.
    pub kind: String,
    /// Positive amount.
    pub amount: Decimal,
}

/// Query parameters for the calendar-date report.
#[derive(Debug, Deserialize)]
pub struct DateReportQuery {
    /// Calendar date in `dd/MM/yyyy` format.
    pub date: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/movements` - Apply a deposit or withdrawal.
async fn create_movement(
    State(state): State<AppState>,
    Json(body): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    match state
        .service
        .apply_movement(&body.account_number, &body.kind, body.amount)
        .await
    {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/movements/{movement_id}` - Revise a movement's kind and amount.
async fn update_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
    Json(body): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    match state
        .service
        .revise_movement(MovementId::from_i64(movement_id), &body.kind, body.amount)
        .await
    {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/movements/{movement_id}` - Remove a movement record.
async fn delete_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
) -> impl IntoResponse {
    match state
        .service
        .remove_movement(MovementId::from_i64(movement_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/movements` - List all movements in insertion order.
async fn list_movements(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.list_all().await {
        Ok(movements) => (StatusCode::OK, Json(json!({ "movements": movements }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/movements/report?date=dd/MM/yyyy` - Movements on one calendar date.
async fn movements_by_date(
    State(state): State<AppState>,
    Query(query): Query<DateReportQuery>,
) -> impl IntoResponse {
    match state.service.by_calendar_date(&query.date).await {
        Ok(movements) => (StatusCode::OK, Json(json!({ "movements": movements }))).into_response(),
        Err(e) => error_response(&e),
    }
}
