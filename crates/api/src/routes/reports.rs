//! Report routes: the client statement with its downloadable artifact.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::fmt::Write as _;

use cajero_core::ledger::dates;
use cajero_core::ledger::projection::StatementReport;

use crate::AppState;
use crate::routes::error_response;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/statement", get(client_statement))
}

/// Query parameters for the client statement.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// Exact client display name.
    pub client: String,
    /// Range start date (YYYY-MM-DD, inclusive).
    pub from: NaiveDate,
    /// Range end date (YYYY-MM-DD, inclusive).
    pub to: NaiveDate,
}

/// GET `/reports/statement?client=&from=&to=` - Per-client statement.
///
/// Returns the statement rows plus a base64-encoded printable rendering.
async fn client_statement(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> impl IntoResponse {
    match state
        .service
        .statement_for_client(&query.client, query.from, query.to)
        .await
    {
        Ok(report) => {
            let artifact = base64_url::encode(&render_statement(&report));
            (
                StatusCode::OK,
                Json(json!({
                    "client": report.client,
                    "from": dates::format_report_date(report.start),
                    "to": dates::format_report_date(report.end),
                    "lines": report.lines,
                    "pdf_base64": artifact,
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Renders a statement as a printable plain-text document.
fn render_statement(report: &StatementReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ESTADO DE CUENTA");
    let _ = writeln!(out, "Cliente: {}", report.client);
    let _ = writeln!(
        out,
        "Periodo: {} - {}",
        dates::format_report_date(report.start),
        dates::format_report_date(report.end)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<12} {:<12} {:<10} {:<10} {:>12} {:>14}",
        "Fecha", "Cuenta", "Tipo", "Movimiento", "Valor", "Disponible"
    );
    for line in &report.lines {
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:<10} {:<10} {:>12} {:>14}",
            line.date,
            line.account_number,
            line.account_type,
            line.kind,
            line.amount,
            line.available_balance
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cajero_core::ledger::projection::StatementLine;
    use cajero_core::ledger::MovementKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_report() -> StatementReport {
        StatementReport {
            client: "Jose Lema".to_string(),
            start: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 2, 28).unwrap(),
            lines: vec![StatementLine {
                date: "10/02/2022".to_string(),
                client: "Jose Lema".to_string(),
                account_number: "478758".to_string(),
                account_type: "Ahorro".to_string(),
                account_balance: dec!(1425.00),
                is_active: true,
                kind: MovementKind::Retiro,
                amount: dec!(575.00),
                available_balance: dec!(1425.00),
            }],
        }
    }

    #[test]
    fn test_render_contains_header_and_rows() {
        let rendered = render_statement(&sample_report());
        assert!(rendered.contains("ESTADO DE CUENTA"));
        assert!(rendered.contains("Jose Lema"));
        assert!(rendered.contains("478758"));
        assert!(rendered.contains("01/02/2022 - 28/02/2022"));
    }

    #[test]
    fn test_artifact_is_base64_decodable() {
        let rendered = render_statement(&sample_report());
        let encoded = base64_url::encode(&rendered);
        let decoded = base64_url::decode(&encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), rendered);
    }

    mod router {
        use super::super::*;
        use axum::body::Body;
        use axum::http::Request;
        use chrono::Utc;
        use http_body_util::BodyExt;
        use rust_decimal_macros::dec;
        use std::sync::Arc;
        use tower::ServiceExt;

        use cajero_core::memory::MemoryLedgerStore;
        use cajero_core::store::{AccountRecord, ClientRecord};
        use cajero_core::{LedgerStore, MovementService};
        use cajero_shared::types::{AccountId, ClientId};

        async fn test_app() -> Router {
            let store = Arc::new(MemoryLedgerStore::new());
            let client = ClientRecord {
                id: ClientId::new(),
                name: "Jose Lema".to_string(),
                is_active: true,
            };
            store.insert_account(AccountRecord {
                id: AccountId::new(),
                account_number: "478758".to_string(),
                account_type: "Ahorro".to_string(),
                balance: dec!(2000.00),
                is_active: true,
                client_id: client.id,
            });
            store.insert_client(client);

            let service = MovementService::new(Arc::clone(&store) as Arc<dyn LedgerStore>);
            service
                .apply_movement("478758", "Retiro", dec!(575.00))
                .await
                .unwrap();

            let state = AppState { service };
            Router::new().merge(routes()).with_state(state)
        }

        #[tokio::test]
        async fn test_statement_includes_rows_and_artifact() {
            let app = test_app().await;
            let today = Utc::now().date_naive();

            let response = app
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(format!(
                            "/reports/statement?client=Jose%20Lema&from={today}&to={today}"
                        ))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["client"], "Jose Lema");
            assert_eq!(body["lines"].as_array().unwrap().len(), 1);
            assert!(body["pdf_base64"].as_str().unwrap().len() > 0);
        }

        #[tokio::test]
        async fn test_statement_unknown_client_is_404() {
            let app = test_app().await;
            let today = Utc::now().date_naive();

            let response = app
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(format!(
                            "/reports/statement?client=Nadie&from={today}&to={today}"
                        ))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }
}
