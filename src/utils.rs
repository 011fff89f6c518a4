//! Decimal parsing and formatting helpers for balance arithmetic.
//!
//! Balances and conversion amounts travel as decimal strings and are held as
//! [`Decimal`] values; binary floating point never touches a balance.

use crate::errors::SettlementError;
use rust_decimal::Decimal;

/// Minimum number of fractional digits for balances touched by a debit.
pub const DEBIT_SCALE: u32 = 8;

/// Parse a decimal amount string that must be strictly positive.
///
/// # Errors
///
/// Returns `SettlementError::InvalidAmount` if the string is not a plain
/// decimal number or is zero or negative
pub fn parse_positive_amount(value: &str) -> Result<Decimal, SettlementError> {
    let amount = parse_amount(value)?;
    if amount <= Decimal::ZERO {
        return Err(SettlementError::InvalidAmount {
            value: value.to_string(),
            reason: "amount must be greater than zero".to_string(),
        });
    }
    Ok(amount)
}

/// Parse a decimal amount string, accepting zero but not negative values.
///
/// # Errors
///
/// Returns `SettlementError::InvalidAmount` if the string is not a plain
/// decimal number or is negative
pub fn parse_non_negative_amount(value: &str) -> Result<Decimal, SettlementError> {
    let amount = parse_amount(value)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SettlementError::InvalidAmount {
            value: value.to_string(),
            reason: "amount must not be negative".to_string(),
        });
    }
    Ok(amount)
}

fn parse_amount(value: &str) -> Result<Decimal, SettlementError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SettlementError::InvalidAmount {
            value: value.to_string(),
            reason: "amount is empty".to_string(),
        });
    }

    // from_str_exact refuses inputs it would have to round
    Decimal::from_str_exact(trimmed).map_err(|e| SettlementError::InvalidAmount {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Pad to at least [`DEBIT_SCALE`] places without rounding, so `3` becomes
/// `3.00000000` while `0.000023456789123` keeps every digit.
pub fn widen_to_debit_scale(amount: Decimal) -> Decimal {
    let mut widened = amount;
    if widened.scale() < DEBIT_SCALE {
        widened.rescale(DEBIT_SCALE);
    }
    widened
}

/// Render an amount with at least eight fractional digits, e.g. `3.00000000`.
pub fn format_debit_amount(amount: Decimal) -> String {
    widen_to_debit_scale(amount).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("12").unwrap(), dec!(12));
        assert_eq!(parse_positive_amount(" 0.00000001 ").unwrap(), dec!(0.00000001));
        assert!(parse_positive_amount("0").is_err());
        assert!(parse_positive_amount("-1").is_err());
        assert!(parse_positive_amount("").is_err());
        assert!(parse_positive_amount("12 USD").is_err());
        assert!(parse_positive_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_non_negative_amount() {
        assert_eq!(parse_non_negative_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_non_negative_amount("-0").unwrap(), Decimal::ZERO);
        assert!(parse_non_negative_amount("-0.5").is_err());
    }

    #[test]
    fn test_debit_scale_formatting() {
        assert_eq!(format_debit_amount(dec!(3)), "3.00000000");
        assert_eq!(format_debit_amount(dec!(0.12345678)), "0.12345678");
        assert_eq!(format_debit_amount(dec!(-0.5)), "-0.50000000");
    }

    #[test]
    fn test_widening_never_drops_digits() {
        assert_eq!(widen_to_debit_scale(dec!(1.5)).scale(), DEBIT_SCALE);
        assert_eq!(widen_to_debit_scale(dec!(0.000023456789123)).scale(), 15);
        assert_eq!(widen_to_debit_scale(dec!(0.000023456789123)), dec!(0.000023456789123));
    }
}
