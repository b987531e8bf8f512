// src/domain/price.rs

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceError {
    #[error("empty price")]
    Empty,
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("price must be positive, got {0}")]
    NotPositive(f64),
}

/// Parses a displayed price such as `$1,234`, `$ 999.50 MXN` or `1,234`.
///
/// Currency symbols, letters, whitespace and `,` thousands separators are
/// dropped; `.` is the decimal point. The result must be a positive, finite
/// number.
pub fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| PriceError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(PriceError::NotPositive(value));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_symbols_and_separators() {
        let cases = [
            ("$1,234", 1234.0),
            ("$999", 999.0),
            ("1,234,567", 1_234_567.0),
            ("$ 12,345.50 MXN", 12_345.5),
            ("  US$ 80 ", 80.0),
            ("4\u{a0}599", 4599.0),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_price(raw), Ok(expected), "parsing {raw:?}");
        }
    }

    #[test]
    fn matches_the_digits_left_after_stripping() {
        for raw in ["$1,000", "$10,000,000", "$7", "$3,210.75"] {
            let stripped: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
            assert_eq!(parse_price(raw).unwrap(), stripped.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn rejects_empty_and_non_numeric() {
        assert_eq!(parse_price("   "), Err(PriceError::Empty));
        assert!(matches!(parse_price("Gratis"), Err(PriceError::NotANumber(_))));
        assert!(matches!(parse_price("1.2.3"), Err(PriceError::NotANumber(_))));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(parse_price("$0"), Err(PriceError::NotPositive(0.0)));
        assert_eq!(parse_price("-5"), Err(PriceError::NotPositive(-5.0)));
    }
}
