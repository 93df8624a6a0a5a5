use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a locale-formatted monetary string into an exact decimal amount.
///
/// Accepts the spreadsheet's Brazilian format: optional `R$` prefix, `.` as
/// thousands separator, `,` as decimal separator. Empty cells and the dash
/// sentinels (`-`, `--`) mean zero. Malformed strings also parse to zero:
/// the caller is a best-effort sheet reader where one bad cell must not
/// abort a whole month's aggregation.
pub fn parse_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed == "-" || trimmed == "--" {
        return Decimal::ZERO;
    }

    let without_prefix = trimmed
        .strip_prefix("R$")
        .or_else(|| trimmed.strip_prefix("r$"))
        .unwrap_or(trimmed);

    let cleaned: String = without_prefix
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match Decimal::from_str(&cleaned) {
        Ok(value) => value.round_dp(2),
        Err(_) => Decimal::ZERO,
    }
}

/// Converts an exact amount to `f64` for JSON serialization.
///
/// This is the only sanctioned decimal-to-float conversion; everything
/// upstream stays in decimal space.
pub fn money_to_f64(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_brazilian_format() {
        assert_eq!(parse_amount("R$ 1.234,56"), dec!(1234.56));
        assert_eq!(parse_amount("1.234,56"), dec!(1234.56));
        assert_eq!(parse_amount("R$1.000.000,00"), dec!(1000000.00));
        assert_eq!(parse_amount("12,5"), dec!(12.5));
    }

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("--"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_amount("-1.234,56"), dec!(-1234.56));
        assert_eq!(parse_amount("R$ -50,00"), dec!(-50.00));
    }

    #[test]
    fn test_parse_malformed_is_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12,34,56"), Decimal::ZERO);
        assert_eq!(parse_amount("R$"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(parse_amount("10,999"), dec!(11.00));
    }

    #[test]
    fn test_money_to_f64() {
        assert!((money_to_f64(dec!(1234.56)) - 1234.56).abs() < f64::EPSILON);
        assert_eq!(money_to_f64(Decimal::ZERO), 0.0);
    }
}
