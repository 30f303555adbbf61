// Numeric cell parsing for rate sheet values
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Optional dollar sign, digits with optional thousands separators, optional fraction
    static ref AMOUNT: Regex =
        Regex::new(r"^\$?\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+)$").unwrap();
}

/// Parses a fee or multiplier cell such as `1250`, `$1,250.00` or `0.85`.
///
/// Returns `None` for anything else, including negative numbers, `NaN`
/// and `inf`, so a malformed cell can never flow into a calculation.
pub fn parse_amount(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let caps = AMOUNT.captures(cell)?;
    let digits: String = caps.get(1)?.as_str().chars().filter(|c| *c != ',').collect();
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_numbers() {
        assert_eq!(parse_amount("1250"), Some(1250.0));
        assert_eq!(parse_amount(" 0.85 "), Some(0.85));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("0"), Some(0.0));
    }

    #[test]
    fn test_parses_currency_formatting() {
        assert_eq!(parse_amount("$1,250.00"), Some(1250.0));
        assert_eq!(parse_amount("$ 12,345,678"), Some(12_345_678.0));
    }

    #[test]
    fn test_rejects_malformed_cells() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("1,25"), None);
        assert_eq!(parse_amount("12abc"), None);
    }
}
