// src/common/validation.rs

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be empty"));
    }
    Ok(())
}

/// Largest amount (or hour count) any single field accepts: 1,000,000,000,000.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

pub fn max_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_AMOUNT {
        return Err(error("too_large", "must not exceed 1,000,000,000,000"));
    }
    Ok(())
}

pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(error("not_positive", "must be greater than zero"));
    }
    max_amount(value)
}

pub fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("negative", "must not be negative"));
    }
    max_amount(value)
}

/// A single-field failure, for rules that live outside a `Validate` derive.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error(code, message));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amounts_are_bounded_on_both_sides() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
        assert!(non_negative_amount(&MAX_AMOUNT).is_ok());
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());

        let too_large = Decimal::from_str("1000000000000.01").unwrap();
        assert_eq!(non_negative_amount(&too_large).unwrap_err().code, "too_large");
        assert_eq!(positive_amount(&too_large).unwrap_err().code, "too_large");
        assert_eq!(positive_amount(&Decimal::ZERO).unwrap_err().code, "not_positive");
    }
}
