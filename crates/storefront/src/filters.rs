//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a price with the Bitcoin currency marker.
///
/// The value's own `Display` keeps the decimal exact; this only appends
/// the unit.
///
/// Usage in templates: `{{ item.price|btc }}`
#[askama::filter_fn]
pub fn btc(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{value} ₿"))
}

#[cfg(test)]
mod tests {
    use jwt_pizza_core::Price;

    #[test]
    fn test_btc_keeps_exact_decimal() {
        let total: Price = ["0.0038", "0.0042"]
            .iter()
            .map(|s| s.parse::<Price>().expect("price"))
            .sum();
        assert_eq!(format!("{total} ₿"), "0.008 ₿");
    }
}
