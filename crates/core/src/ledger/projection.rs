//! Read-only projections over the movement log.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::dates::format_report_date;
use super::movement::MovementKind;

/// One movement as seen by the list/report queries.
#[derive(Debug, Clone, Serialize)]
pub struct MovementProjection {
    /// The owning account's number.
    pub account_number: String,
    /// When the movement was applied.
    pub movement_at: DateTime<Utc>,
    /// Deposit or withdrawal.
    pub kind: MovementKind,
    /// The (positive) movement amount.
    pub amount: Decimal,
    /// The account balance after this movement was applied.
    pub balance: Decimal,
}

/// One row of a client statement.
///
/// Carries the owning account's data alongside the movement so the report
/// renderer needs no further lookups.
#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    /// Movement date, formatted `dd/MM/yyyy`.
    pub date: String,
    /// The client's display name.
    pub client: String,
    /// The owning account's number.
    pub account_number: String,
    /// The owning account's type (e.g. "Ahorro", "Corriente").
    pub account_type: String,
    /// The account's balance at query time.
    pub account_balance: Decimal,
    /// Whether the account is active.
    pub is_active: bool,
    /// Deposit or withdrawal.
    pub kind: MovementKind,
    /// The (positive) movement amount.
    pub amount: Decimal,
    /// The account balance after this movement was applied.
    pub available_balance: Decimal,
}

impl StatementLine {
    /// Formats the movement timestamp for a statement row.
    #[must_use]
    pub fn format_date(at: DateTime<Utc>) -> String {
        format_report_date(at.date_naive())
    }
}

/// A client-scoped, date-range-scoped statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    /// The client's display name.
    pub client: String,
    /// Range start (inclusive).
    pub start: NaiveDate,
    /// Range end (inclusive).
    pub end: NaiveDate,
    /// One row per movement, concatenated across the client's accounts.
    pub lines: Vec<StatementLine>,
}
