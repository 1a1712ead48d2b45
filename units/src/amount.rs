//! Fixed-point conversion between human display amounts and integer
//! base-unit amounts.
//!
//! Amounts are decimal strings end to end; nothing here touches floating
//! point except the positivity gate. Malformed input degrades to `"0"` and
//! is never surfaced as an error.

use num_bigint::BigUint;

/// Convert a display amount (`"1.5"`) into an integer base-unit string
/// (`"1500000"` at 6 decimals).
///
/// Thousands separators and surrounding whitespace are stripped. Fractional
/// digits beyond `decimals` are truncated, not rounded.
pub fn to_base_unit(display: &str, decimals: u8) -> String {
    let clean = display.replace(',', "");
    let clean = clean.trim();
    if !is_unsigned_decimal(clean) {
        return "0".into();
    }

    let (whole, frac) = clean.split_once('.').unwrap_or((clean, ""));

    let mut frac = frac.to_owned();
    frac.truncate(decimals as usize);
    while frac.len() < decimals as usize {
        frac.push('0');
    }

    let combined = format!("{whole}{frac}");
    let stripped = combined.trim_start_matches('0');
    if stripped.is_empty() {
        "0".into()
    } else {
        stripped.to_owned()
    }
}

/// Convert an integer base-unit string back into a display amount, dividing
/// by `10^decimals`. The fractional part is left-zero-padded to exactly
/// `decimals` digits.
///
/// Base units can exceed u128 for high-decimal tokens, hence `BigUint`.
pub fn to_display_unit(base: &str, decimals: u8) -> String {
    let Ok(value) = base.trim().parse::<BigUint>() else {
        return "0".into();
    };

    if decimals == 0 {
        return value.to_string();
    }

    let divisor = BigUint::from(10u32).pow(decimals as u32);
    let whole = &value / &divisor;
    let frac = &value % &divisor;

    format!(
        "{whole}.{frac:0>width$}",
        frac = frac.to_string(),
        width = decimals as usize
    )
}

/// Truncate a display amount to `places` fractional digits, zero-padding
/// shorter fractions. Truncation, never rounding.
pub fn fixed_decimals(display: &str, places: usize) -> String {
    let (whole, frac) = display.split_once('.').unwrap_or((display, ""));
    let whole = if whole.is_empty() { "0" } else { whole };

    if places == 0 {
        return whole.to_owned();
    }

    let mut frac = frac.to_owned();
    frac.truncate(places);
    while frac.len() < places {
        frac.push('0');
    }

    format!("{whole}.{frac}")
}

/// True when the string parses as a number greater than zero. This is the
/// gate for issuing a route fetch.
pub fn parses_positive(display: &str) -> bool {
    display.trim().parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
}

/// Non-negative decimal: digits with at most one dot, no sign, no exponent.
fn is_unsigned_decimal(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in s.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_unit_examples() {
        assert_eq!(to_base_unit("1.5", 6), "1500000");
        assert_eq!(to_base_unit("1,234.5", 6), "1234500000");
        assert_eq!(to_base_unit(" 2 ", 6), "2000000");
        assert_eq!(to_base_unit("0.000001", 6), "1");
    }

    #[test]
    fn base_unit_high_decimals() {
        // 24-decimal tokens exist; one smallest unit must survive the trip.
        let one_yocto = format!("0.{}1", "0".repeat(23));
        assert_eq!(to_base_unit(&one_yocto, 24), "1");
        assert_eq!(
            to_base_unit("1.5", 24),
            format!("15{}", "0".repeat(23))
        );
    }

    #[test]
    fn base_unit_truncates_excess_precision() {
        assert_eq!(to_base_unit("1.2345678", 6), "1234567");
    }

    #[test]
    fn base_unit_rejects_garbage() {
        assert_eq!(to_base_unit("", 6), "0");
        assert_eq!(to_base_unit("abc", 6), "0");
        assert_eq!(to_base_unit("1.2.3", 6), "0");
        assert_eq!(to_base_unit("-1", 6), "0");
        assert_eq!(to_base_unit(".", 6), "0");
    }

    #[test]
    fn display_unit_examples() {
        assert_eq!(to_display_unit("1500000", 6), "1.500000");
        assert_eq!(to_display_unit("1", 24), format!("0.{}1", "0".repeat(23)));
        assert_eq!(to_display_unit("0", 6), "0.000000");
    }

    #[test]
    fn display_unit_rejects_garbage() {
        assert_eq!(to_display_unit("", 6), "0");
        assert_eq!(to_display_unit("12x", 6), "0");
        assert_eq!(to_display_unit("-5", 6), "0");
    }

    #[test]
    fn round_trip_is_idempotent_within_declared_precision() {
        for s in ["0.5", "12.000001", "7", "1234.56"] {
            let base = to_base_unit(s, 6);
            let display = to_display_unit(&base, 6);
            assert_eq!(to_base_unit(&display, 6), base, "input {s}");
        }
    }

    #[test]
    fn fixed_decimals_truncates_and_pads() {
        assert_eq!(fixed_decimals("1.5", 6), "1.500000");
        assert_eq!(fixed_decimals("1.23456789", 6), "1.234567");
        assert_eq!(fixed_decimals("3", 6), "3.000000");
        assert_eq!(fixed_decimals("3", 0), "3");
    }

    #[test]
    fn positivity_gate() {
        assert!(parses_positive("0.1"));
        assert!(parses_positive(" 5 "));
        assert!(!parses_positive("0"));
        assert!(!parses_positive("0.0"));
        assert!(!parses_positive(""));
        assert!(!parses_positive("-3"));
        assert!(!parses_positive("abc"));
    }
}
