//! Ledger error types.
//!
//! Every error here is terminal: the engine never retries internally, and a
//! failed precondition aborts the enclosing store transaction. Each variant
//! carries the offending identifier/value so callers can render a
//! user-facing message.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use cajero_shared::types::MovementId;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Account Errors ==========
    /// No account matches the supplied account number.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account exists but is flagged inactive; mutations are refused.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    // ========== Mutation Errors ==========
    /// Movement kind token not recognized.
    #[error("Invalid movement kind: '{0}'")]
    InvalidMovementKind(String),

    /// Withdrawal amount exceeds the current balance.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The withdrawal amount requested.
        requested: Decimal,
        /// The balance available at the time of the request.
        available: Decimal,
    },

    /// Movement amount must be strictly positive.
    #[error("Movement amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Revise/delete target does not exist.
    #[error("Movement not found: {0}")]
    MovementNotFound(MovementId),

    // ========== Query Errors ==========
    /// Date string fails to parse against the expected pattern.
    #[error("Invalid date format: '{0}', expected dd/MM/yyyy")]
    InvalidDateFormat(String),

    /// The date query succeeded mechanically but yielded zero rows.
    #[error("No movements found on {0}")]
    NoMovementsForDate(NaiveDate),

    /// The statement range yielded zero rows across all of the client's accounts.
    #[error("No movements for client '{client}' between {start} and {end}")]
    NoMovementsInRange {
        /// The client display name.
        client: String,
        /// Range start (inclusive).
        start: NaiveDate,
        /// Range end (inclusive).
        end: NaiveDate,
    },

    // ========== Statement Errors ==========
    /// No client matches the supplied display name.
    #[error("Client not found: '{0}'")]
    ClientNotFound(String),

    /// Client resolved but owns no accounts.
    #[error("Client '{0}' has no accounts")]
    ClientHasNoAccounts(String),

    // ========== Store Errors ==========
    /// Storage backend error.
    #[error("Store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidMovementKind(_) => "INVALID_MOVEMENT_KIND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            Self::NoMovementsForDate(_) => "NO_MOVEMENTS_FOR_DATE",
            Self::NoMovementsInRange { .. } => "NO_MOVEMENTS_IN_RANGE",
            Self::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            Self::ClientHasNoAccounts(_) => "CLIENT_HAS_NO_ACCOUNTS",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::InvalidMovementKind(_)
            | Self::NonPositiveAmount(_)
            | Self::InvalidDateFormat(_) => 400,

            // 404 Not Found - the entity or result set does not exist
            Self::AccountNotFound(_)
            | Self::MovementNotFound(_)
            | Self::ClientNotFound(_)
            | Self::NoMovementsForDate(_)
            | Self::NoMovementsInRange { .. } => 404,

            // 422 Unprocessable - valid request refused by a business rule
            Self::AccountInactive(_)
            | Self::InsufficientFunds { .. }
            | Self::ClientHasNoAccounts(_) => 422,

            // 500 Internal Server Error
            Self::Store(_) => 500,
        }
    }
}
