//! Movement kinds and their wire tokens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// The kind of a balance movement.
///
/// The two accepted wire tokens are `"Deposito"` and `"Retiro"`, matched
/// case-insensitively at the boundary. Anything else is rejected before it
/// reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Credit: the amount is added to the account balance.
    Deposito,
    /// Debit: the amount is subtracted from the account balance.
    Retiro,
}

impl MovementKind {
    /// Parses a wire token into a movement kind (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidMovementKind` for any unrecognized token.
    pub fn parse(token: &str) -> Result<Self, LedgerError> {
        if token.eq_ignore_ascii_case("Deposito") {
            Ok(Self::Deposito)
        } else if token.eq_ignore_ascii_case("Retiro") {
            Ok(Self::Retiro)
        } else {
            Err(LedgerError::InvalidMovementKind(token.to_string()))
        }
    }

    /// Returns the canonical wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposito => "Deposito",
            Self::Retiro => "Retiro",
        }
    }

    /// Returns the amount with the sign this kind applies to a balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposito => amount,
            Self::Retiro => -amount,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_accepts_both_tokens() {
        assert_eq!(MovementKind::parse("Deposito").unwrap(), MovementKind::Deposito);
        assert_eq!(MovementKind::parse("Retiro").unwrap(), MovementKind::Retiro);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(MovementKind::parse("deposito").unwrap(), MovementKind::Deposito);
        assert_eq!(MovementKind::parse("DEPOSITO").unwrap(), MovementKind::Deposito);
        assert_eq!(MovementKind::parse("retiro").unwrap(), MovementKind::Retiro);
        assert_eq!(MovementKind::parse("ReTiRo").unwrap(), MovementKind::Retiro);
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for token in ["", "Transferencia", "deposit", "withdrawal"] {
            assert!(matches!(
                MovementKind::parse(token),
                Err(LedgerError::InvalidMovementKind(_))
            ));
        }
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(MovementKind::Deposito.signed(dec!(100.00)), dec!(100.00));
        assert_eq!(MovementKind::Retiro.signed(dec!(100.00)), dec!(-100.00));
    }

    #[test]
    fn test_wire_token_round_trip() {
        for kind in [MovementKind::Deposito, MovementKind::Retiro] {
            assert_eq!(MovementKind::parse(kind.as_str()).unwrap(), kind);
        }
    }
}
