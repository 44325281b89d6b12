//! Query argument validation.
//!
//! Every analytics query validates its raw arguments here before touching
//! the dataset. Side, product and extremum comparisons ignore case.

use advisor_core::{Extremum, Result, Side, ValidationError};
use advisor_dataset::Dataset;

/// Parse a bid/ask side token.
pub fn validate_side(token: &str) -> Result<Side> {
    Side::parse_query(token).ok_or_else(|| ValidationError::UnknownSide(token.to_string()).into())
}

/// Resolve a product name against the dataset, returning its stored spelling.
///
/// An exact match wins; otherwise the first product equal under lowercase
/// normalization is used.
pub fn validate_product<'a>(dataset: &'a Dataset, token: &str) -> Result<&'a str> {
    let products = dataset.unique_products();
    let token = token.trim();

    if let Some(exact) = products.get(token) {
        return Ok(exact.as_str());
    }

    let wanted = token.to_lowercase();
    products
        .iter()
        .find(|p| p.to_lowercase() == wanted)
        .map(String::as_str)
        .ok_or_else(|| ValidationError::UnknownProduct(token.to_string()).into())
}

/// Parse a positive whole number of ticks.
pub fn validate_tick_count(token: &str) -> Result<usize> {
    match token.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidTickCount(token.to_string()).into()),
    }
}

/// Parse a min/max token.
pub fn validate_extremum(token: &str) -> Result<Extremum> {
    Extremum::parse(token).ok_or_else(|| ValidationError::UnknownExtremum(token.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Error, Quote};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Quote::new(0.02, 1.0, "t1", "ETH/BTC", Side::Bid),
            Quote::new(5352.0, 1.0, "t1", "BTC/USDT", Side::Ask),
        ])
    }

    fn validation_error(err: Error) -> ValidationError {
        match err {
            Error::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_side() {
        assert_eq!(validate_side("bid").unwrap(), Side::Bid);
        assert_eq!(validate_side("ASK").unwrap(), Side::Ask);
        assert_eq!(
            validation_error(validate_side("unknown").unwrap_err()),
            ValidationError::UnknownSide("unknown".to_string())
        );
    }

    #[test]
    fn test_product_case_insensitive() {
        let dataset = dataset();
        assert_eq!(validate_product(&dataset, "ETH/BTC").unwrap(), "ETH/BTC");
        assert_eq!(validate_product(&dataset, "eth/btc").unwrap(), "ETH/BTC");
        assert_eq!(validate_product(&dataset, "Btc/Usdt").unwrap(), "BTC/USDT");
        assert_eq!(
            validation_error(validate_product(&dataset, "DOGE/BTC").unwrap_err()),
            ValidationError::UnknownProduct("DOGE/BTC".to_string())
        );
    }

    #[test]
    fn test_product_exact_spelling_preferred() {
        let dataset = Dataset::new(vec![
            Quote::new(1.0, 1.0, "t1", "abc", Side::Bid),
            Quote::new(1.0, 1.0, "t1", "ABC", Side::Bid),
        ]);
        assert_eq!(validate_product(&dataset, "abc").unwrap(), "abc");
        assert_eq!(validate_product(&dataset, "ABC").unwrap(), "ABC");
    }

    #[test]
    fn test_product_on_empty_dataset() {
        let dataset = Dataset::default();
        assert!(validate_product(&dataset, "ETH/BTC").unwrap_err().is_validation());
    }

    #[test]
    fn test_tick_count() {
        assert_eq!(validate_tick_count("10").unwrap(), 10);
        assert_eq!(validate_tick_count(" 3 ").unwrap(), 3);
        for bad in ["0", "-2", "abc", "1.5", ""] {
            assert_eq!(
                validation_error(validate_tick_count(bad).unwrap_err()),
                ValidationError::InvalidTickCount(bad.to_string())
            );
        }
    }

    #[test]
    fn test_extremum() {
        assert_eq!(validate_extremum("Max").unwrap(), Extremum::Max);
        assert_eq!(validate_extremum("min").unwrap(), Extremum::Min);
        assert!(validate_extremum("avg").unwrap_err().is_validation());
    }
}
