//! Balance mutation rules.
//!
//! This is the sole place where a new account balance is computed. The
//! function is pure: store adapters load the account under their own
//! serialization point (row lock, per-account mutex), call [`apply`], and
//! persist the result atomically. Keeping the rules here means every adapter
//! enforces the same invariants.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::movement::MovementKind;

/// The slice of account state the mutation rules need.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    /// The externally visible account number.
    pub account_number: String,
    /// The current balance.
    pub balance: Decimal,
    /// Whether the account accepts mutations.
    pub is_active: bool,
}

/// Validates a movement against an account snapshot and computes the new
/// balance.
///
/// Preconditions, checked in order:
/// 1. the account is active;
/// 2. the amount is strictly positive;
/// 3. for a withdrawal, the amount does not exceed the current balance
///    (equality is allowed: a withdrawal that exactly zeroes the balance
///    succeeds).
///
/// # Errors
///
/// Returns the first violated precondition as a `LedgerError`. All failures
/// are terminal; the caller must not have written anything yet.
pub fn apply(
    account: &AccountSnapshot,
    kind: MovementKind,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    if !account.is_active {
        return Err(LedgerError::AccountInactive(account.account_number.clone()));
    }

    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    match kind {
        MovementKind::Deposito => Ok(account.balance + amount),
        MovementKind::Retiro => {
            if amount > account.balance {
                return Err(LedgerError::InsufficientFunds {
                    requested: amount,
                    available: account.balance,
                });
            }
            Ok(account.balance - amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(balance: Decimal) -> AccountSnapshot {
        AccountSnapshot {
            account_number: "225487".to_string(),
            balance,
            is_active: true,
        }
    }

    #[test]
    fn test_deposit_adds_to_balance() {
        let new_balance = apply(&snapshot(dec!(1000.00)), MovementKind::Deposito, dec!(500.00));
        assert_eq!(new_balance.unwrap(), dec!(1500.00));
    }

    #[test]
    fn test_withdrawal_subtracts_from_balance() {
        let new_balance = apply(&snapshot(dec!(1500.00)), MovementKind::Retiro, dec!(200.00));
        assert_eq!(new_balance.unwrap(), dec!(1300.00));
    }

    #[test]
    fn test_withdrawal_of_exact_balance_zeroes_account() {
        let new_balance = apply(&snapshot(dec!(1300.00)), MovementKind::Retiro, dec!(1300.00));
        assert_eq!(new_balance.unwrap(), dec!(0.00));
    }

    #[test]
    fn test_withdrawal_one_cent_over_balance_fails() {
        let result = apply(&snapshot(dec!(1300.00)), MovementKind::Retiro, dec!(1300.01));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                requested,
                available,
            }) if requested == dec!(1300.01) && available == dec!(1300.00)
        ));
    }

    #[test]
    fn test_inactive_account_refuses_any_kind() {
        let account = AccountSnapshot {
            account_number: "478758".to_string(),
            balance: dec!(1000.00),
            is_active: false,
        };
        for kind in [MovementKind::Deposito, MovementKind::Retiro] {
            assert!(matches!(
                apply(&account, kind, dec!(10.00)),
                Err(LedgerError::AccountInactive(n)) if n == "478758"
            ));
        }
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = apply(&snapshot(dec!(1000.00)), MovementKind::Deposito, dec!(0.00));
        assert!(matches!(result, Err(LedgerError::NonPositiveAmount(_))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = apply(&snapshot(dec!(1000.00)), MovementKind::Retiro, dec!(-50.00));
        assert!(matches!(result, Err(LedgerError::NonPositiveAmount(_))));
    }

    #[test]
    fn test_inactive_check_precedes_amount_check() {
        let account = AccountSnapshot {
            account_number: "478758".to_string(),
            balance: dec!(1000.00),
            is_active: false,
        };
        // Both preconditions are violated; the inactive check wins.
        let result = apply(&account, MovementKind::Deposito, dec!(0.00));
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }
}
