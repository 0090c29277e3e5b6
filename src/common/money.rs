// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::{error::AppError, validation::field_error};

/// Advance share of the quote amount requested up front.
pub const ADVANCE_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);
/// IGV (sales tax) rate.
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals with comma thousands separators: `1234.5` -> `1,234.50`.
pub fn format_amount(value: Decimal) -> String {
    let fixed = format!("{:.2}", round2(value));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Validation failure for a computed amount that left the decimal range.
pub fn amount_overflow(field: &'static str) -> AppError {
    field_error(field, "overflow", "amount is out of range").into()
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Default payment-conditions text derived from the quote amount.
pub fn payment_conditions_text(monto: Decimal) -> Result<String, AppError> {
    let igv_raw = monto
        .checked_mul(IGV_RATE)
        .ok_or_else(|| amount_overflow("monto"))?;
    let advance = monto
        .checked_mul(ADVANCE_RATE)
        .ok_or_else(|| amount_overflow("monto"))?;
    let total_with_igv = monto
        .checked_add(igv_raw)
        .ok_or_else(|| amount_overflow("monto"))?;

    Ok(format!(
        "Monto total: S/. {}\n50% Adelanto: S/. {}\nIGV 18%: S/. {}\nTotal con IGV: S/. {}",
        format_amount(monto),
        format_amount(round2(advance)),
        format_amount(round2(igv_raw)),
        format_amount(round2(total_with_igv)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("90")), "90.00");
        assert_eq!(format_amount(dec("1234.5")), "1,234.50");
        assert_eq!(format_amount(dec("1234567.891")), "1,234,567.89");
        assert_eq!(format_amount(dec("-2500")), "-2,500.00");
    }

    #[test]
    fn conditions_for_five_hundred() {
        let text = payment_conditions_text(dec("500")).unwrap();
        assert!(text.contains("Monto total: S/. 500.00"));
        assert!(text.contains("50% Adelanto: S/. 250.00"));
        assert!(text.contains("IGV 18%: S/. 90.00"));
        assert!(text.contains("Total con IGV: S/. 590.00"));
    }

    #[test]
    fn conditions_report_overflow_instead_of_panicking() {
        assert!(matches!(
            payment_conditions_text(Decimal::MAX),
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
        assert_eq!(checked_sum([dec("1.5"), dec("2")]), Some(dec("3.5")));
    }

    #[test]
    fn half_cents_round_away_from_zero() {
        assert_eq!(round2(dec("0.125")), dec("0.13"));
    }
}
