//! Custom Askama template filters and formatting helpers.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Format a rupee amount with two decimal places (e.g., "₹249.00").
///
/// View structs pre-format all money fields with this before handing them
/// to templates, so templates only ever see ready-made strings.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("₹{amount:.2}")
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_pads_decimals() {
        assert_eq!(format_money("100".parse().unwrap()), "₹100.00");
        assert_eq!(format_money("99.5".parse().unwrap()), "₹99.50");
    }

    #[test]
    fn test_format_money_keeps_exact_paise() {
        assert_eq!(format_money("1234.25".parse().unwrap()), "₹1234.25");
    }
}
