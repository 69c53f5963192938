//! Locale-formatted field text parsing
//!
//! Catalog pages render prices like `"12 499 ₽"` (non-breaking thousands
//! separators, currency sign) and ratings like `"4,7"` (decimal comma).

use crate::shared::errors::ExtractError;

/// Parse a price string into whole currency units.
pub fn parse_price(raw: &str) -> Result<u64, ExtractError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{20bd}')
        .collect();

    if cleaned.is_empty() {
        return Err(ExtractError::Malformed {
            field: "price",
            raw: raw.to_string(),
        });
    }

    cleaned.parse::<u64>().map_err(|_| ExtractError::Malformed {
        field: "price",
        raw: raw.to_string(),
    })
}

/// Parse a rating string into a float in 0..=5.
pub fn parse_rating(raw: &str) -> Result<f64, ExtractError> {
    let normalized = raw.trim().replace(',', ".");

    let rating = normalized
        .parse::<f64>()
        .map_err(|_| ExtractError::Malformed {
            field: "rating",
            raw: raw.to_string(),
        })?;

    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(ExtractError::Malformed {
            field: "rating",
            raw: raw.to_string(),
        });
    }

    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_locale_formats() {
        assert_eq!(parse_price("12 499 \u{20bd}").unwrap(), 12_499);
        // non-breaking and narrow no-break separators
        assert_eq!(parse_price("1\u{a0}234\u{202f}567").unwrap(), 1_234_567);
        assert_eq!(parse_price("899\u{20bd}").unwrap(), 899);
        assert_eq!(parse_price("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("").is_err());
        assert!(parse_price("   ").is_err());
        assert!(parse_price("скидка").is_err());
        assert!(parse_price("12,99").is_err());
        assert!(parse_price("-5").is_err());
    }

    #[test]
    fn test_parse_rating_decimal_comma() {
        assert_eq!(parse_rating("4,7").unwrap(), 4.7);
        assert_eq!(parse_rating(" 4.5 ").unwrap(), 4.5);
        assert_eq!(parse_rating("5").unwrap(), 5.0);
        assert_eq!(parse_rating("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_rating_out_of_range() {
        assert!(parse_rating("5,1").is_err());
        assert!(parse_rating("-0.1").is_err());
        assert!(parse_rating("NaN").is_err());
        assert!(parse_rating("нет оценок").is_err());
    }
}
