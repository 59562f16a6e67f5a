//! Property-based tests for the pure movement engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{self, AccountSnapshot};
use super::error::LedgerError;
use super::movement::MovementKind;

/// Strategy to generate a valid positive amount (> 0) with cent precision.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a movement kind.
fn kind_strategy() -> impl Strategy<Value = MovementKind> {
    prop_oneof![Just(MovementKind::Deposito), Just(MovementKind::Retiro)]
}

fn snapshot(balance: Decimal) -> AccountSnapshot {
    AccountSnapshot {
        account_number: "225487".to_string(),
        balance,
        is_active: true,
    }
}

/// Replays a sequence of movements through the engine the way a store would:
/// each accepted movement advances the balance, each rejection leaves it as
/// is. Returns the final balance plus, per accepted movement, its signed
/// amount and the balance the store would have recorded.
fn replay(
    initial: Decimal,
    movements: &[(MovementKind, Decimal)],
) -> (Decimal, Vec<(Decimal, Decimal)>) {
    let mut balance = initial;
    let mut accepted = Vec::new();
    for &(kind, amount) in movements {
        if let Ok(next) = engine::apply(&snapshot(balance), kind, amount) {
            balance = next;
            accepted.push((kind.signed(amount), next));
        }
    }
    (balance, accepted)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A deposit always lands at exactly `balance + amount`, a withdrawal at
    /// `balance - amount`, with no rounding drift at cent precision.
    #[test]
    fn prop_apply_is_exact_signed_addition(
        initial in positive_amount(),
        kind in kind_strategy(),
        amount in positive_amount(),
    ) {
        // Seed high enough that a withdrawal never overdraws.
        let balance = initial + amount;
        let result = engine::apply(&snapshot(balance), kind, amount);
        prop_assert_eq!(result, Ok(balance + kind.signed(amount)));
    }

    /// Final balance after a replayed sequence equals the initial balance plus
    /// the signed sum of every accepted movement, and each stored balance is
    /// the running partial sum up to that movement.
    #[test]
    fn prop_balance_trajectory_is_running_sum(
        initial in positive_amount(),
        movements in prop::collection::vec((kind_strategy(), positive_amount()), 0..20),
    ) {
        let (final_balance, accepted) = replay(initial, &movements);

        let mut running = initial;
        for (step, (signed_amount, stored)) in accepted.iter().enumerate() {
            running += signed_amount;
            prop_assert_eq!(*stored, running, "partial sum broken at step {}", step);
            prop_assert!(running >= Decimal::ZERO);
        }
        prop_assert_eq!(final_balance, running);
    }

    /// Withdrawals are accepted exactly when `amount <= balance`: draining the
    /// full balance succeeds and lands at zero, one cent more is refused.
    #[test]
    fn prop_withdrawal_boundary(balance in positive_amount()) {
        let exact = engine::apply(&snapshot(balance), MovementKind::Retiro, balance);
        prop_assert_eq!(exact, Ok(Decimal::ZERO));

        let over = balance + Decimal::new(1, 2);
        let result = engine::apply(&snapshot(balance), MovementKind::Retiro, over);
        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientFunds { .. })),
            "overdraft should be refused, got: {:?}",
            result
        );
    }

    /// An inactive account refuses every movement, regardless of kind or
    /// amount, before any balance rule is consulted.
    #[test]
    fn prop_inactive_account_refuses_all(
        balance in positive_amount(),
        kind in kind_strategy(),
        amount in positive_amount(),
    ) {
        let mut account = snapshot(balance);
        account.is_active = false;
        let result = engine::apply(&account, kind, amount);
        prop_assert!(
            matches!(result, Err(LedgerError::AccountInactive(_))),
            "inactive account should refuse movements, got: {:?}",
            result
        );
    }

    /// Zero and negative amounts are rejected for both kinds.
    #[test]
    fn prop_non_positive_amount_rejected(
        balance in positive_amount(),
        kind in kind_strategy(),
        amount in positive_amount(),
    ) {
        for bad in [Decimal::ZERO, -amount] {
            let result = engine::apply(&snapshot(balance), kind, bad);
            prop_assert!(
                matches!(result, Err(LedgerError::NonPositiveAmount(_))),
                "non-positive amount should be rejected, got: {:?}",
                result
            );
        }
    }
}
