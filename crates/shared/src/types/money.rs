//! Minor-unit money conversion.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts enter the system as `rust_decimal::Decimal` values but are held
//! and compared in the smallest currency unit (cents) as `i64`, so balance
//! checks are exact integer equality with no accumulation error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places in the minor-unit representation.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors converting a decimal amount to minor units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinorUnitError {
    /// The amount has more fraction digits than the minor unit allows.
    #[error("Amount {0} is not representable in minor units (max {MINOR_UNIT_SCALE} decimal places)")]
    PrecisionLoss(Decimal),

    /// The amount is too large for a 64-bit minor-unit value.
    #[error("Amount {0} overflows the minor-unit range")]
    Overflow(Decimal),
}

/// Converts a decimal amount to minor units (e.g. 12.34 -> 1234).
///
/// # Errors
///
/// Returns an error if the amount carries sub-cent precision or does not
/// fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MinorUnitError> {
    let scaled = amount
        .checked_mul(Decimal::from(100_u32))
        .ok_or(MinorUnitError::Overflow(amount))?;

    if scaled != scaled.trunc() {
        return Err(MinorUnitError::PrecisionLoss(amount));
    }

    scaled.to_i64().ok_or(MinorUnitError::Overflow(amount))
}

/// Converts minor units back to a decimal amount (e.g. 1234 -> 12.34).
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(12.34), 1234)]
    #[case(dec!(100), 10000)]
    #[case(dec!(-5.5), -550)]
    #[case(dec!(0.01), 1)]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(to_minor_units(amount), Ok(expected));
    }

    #[test]
    fn test_sub_cent_precision_rejected() {
        assert_eq!(
            to_minor_units(dec!(0.001)),
            Err(MinorUnitError::PrecisionLoss(dec!(0.001)))
        );
    }

    #[test]
    fn test_trailing_zeros_accepted() {
        // 1.100 carries scale 3 but no sub-cent value
        assert_eq!(to_minor_units(dec!(1.100)), Ok(110));
    }

    #[test]
    fn test_roundtrip() {
        let amount = dec!(987.65);
        assert_eq!(from_minor_units(to_minor_units(amount).unwrap()), amount);
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(1234), dec!(12.34));
        assert_eq!(from_minor_units(-550), dec!(-5.50));
    }
}
