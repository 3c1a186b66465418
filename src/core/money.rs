//! Conversions between decimal amounts and the integer cents stored in the database.
//!
//! Amounts accept at most [`MAX_DIGITS`] digits in total, of which at most
//! [`DECIMAL_PLACES`] may follow the decimal point.

use crate::errors::ValidationErrors;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Maximum number of digits in a price or discount
pub const MAX_DIGITS: u32 = 7;
/// Number of digits after the decimal point
pub const DECIMAL_PLACES: u32 = 2;

/// Turns stored cents into a decimal with exactly two places (`1000` -> `10.00`).
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}

/// Turns a decimal with at most two places into cents.
///
/// Returns `None` when the value has more decimal places than can be stored
/// or does not fit in an `i64`.
#[must_use]
pub fn to_cents(value: Decimal) -> Option<i64> {
    let normalized = value.normalize();
    if normalized.scale() > DECIMAL_PLACES {
        return None;
    }

    let mut scaled = normalized;
    scaled.rescale(DECIMAL_PLACES);
    i64::try_from(scaled.mantissa()).ok()
}

/// Parses a decimal amount from user input such as a query parameter.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Validates an amount for `field` and returns it in cents.
///
/// Problems are recorded in `errors`; `None` is returned when the amount is invalid.
pub fn validate_amount(field: &str, value: Decimal, errors: &mut ValidationErrors) -> Option<i64> {
    let normalized = value.normalize();

    if normalized.is_sign_negative() && !normalized.is_zero() {
        errors.add(
            field,
            "min_value",
            "Ensure this value is greater than or equal to 0.",
        );
        return None;
    }

    if normalized.scale() > DECIMAL_PLACES {
        errors.add(
            field,
            "max_decimal_places",
            format!("Ensure that there are no more than {DECIMAL_PLACES} decimal places."),
        );
        return None;
    }

    let max_whole_digits = MAX_DIGITS - DECIMAL_PLACES;
    if whole_digits(normalized) > max_whole_digits {
        errors.add(
            field,
            "max_whole_digits",
            format!("Ensure that there are no more than {max_whole_digits} digits before the decimal point."),
        );
        return None;
    }

    to_cents(normalized)
}

fn whole_digits(value: Decimal) -> u32 {
    let whole = value.abs().trunc().normalize();
    if whole.is_zero() {
        return 0;
    }
    // The integer part of a decimal never has more than 29 digits
    u32::try_from(whole.to_string().len()).unwrap_or(u32::MAX)
}
