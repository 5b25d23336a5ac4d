//! Monetary amounts. The currency minor unit is 1/1000, so presentation always
//! shows three fractional digits. Arithmetic stays exact in `Decimal` until then.

use rust_decimal::{Decimal, RoundingStrategy};

pub type Amount = Decimal;

pub const MINOR_UNIT_DIGITS: u32 = 3;

pub fn round_money(v: Amount) -> Amount {
    v.round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_amount(v: Amount) -> String {
    format!("{:.3}", round_money(v))
}

pub fn format_currency(currency: &str, v: Amount) -> String {
    format!("{} {}", currency, format_amount(v))
}

/// Parses user input such as `12.5` or `12.500`. Returns `None` for anything
/// that is not a plain decimal number.
pub fn parse_amount(input: &str) -> Option<Amount> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_three_digits() {
        assert_eq!(format_amount(Decimal::new(125, 1)), "12.500");
        assert_eq!(format_amount(Decimal::ZERO), "0.000");
        assert_eq!(format_amount(Decimal::new(-90, 0)), "-90.000");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(12345, 4)), "1.235");
        assert_eq!(format_amount(Decimal::new(-12345, 4)), "-1.235");
    }

    #[test]
    fn currency_label_prefix() {
        assert_eq!(format_currency("KWD", Decimal::new(24500, 3)), "KWD 24.500");
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(" 12.5 "), Some(Decimal::new(125, 1)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }
}
