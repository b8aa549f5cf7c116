//! Conversions from base units into human readable token amounts.
//!
//! These values are for presentation only and must never feed back into a
//! decision about how much to fill.

use {
    crate::u256_ext::U256Ext,
    alloy::primitives::U256,
    bigdecimal::BigDecimal,
    num::{BigUint, Zero},
};

/// Shifts `amount` by `decimals` places, e.g. `1500` with 3 decimals is `1.5`.
pub fn to_display_units(amount: U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(amount.to_big_int(), i64::from(decimals))
}

/// Formats `amount` in display units, keeping at most `max_fraction_digits`
/// digits after the decimal point. Extra digits are truncated and trailing
/// zeros are dropped.
pub fn format_display_units(amount: U256, decimals: u8, max_fraction_digits: usize) -> String {
    let scale = BigUint::from(10u8).pow(u32::from(decimals));
    let amount = amount.to_big_uint();
    let integer = &amount / &scale;
    let fraction = &amount % &scale;

    if fraction.is_zero() || max_fraction_digits == 0 {
        return integer.to_string();
    }

    let mut digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    digits.truncate(max_fraction_digits);
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{digits}")
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::str::FromStr};

    #[test]
    fn shifts_by_decimals() {
        assert_eq!(
            to_display_units(U256::from(1500), 3),
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            to_display_units(U256::from(10).pow(U256::from(18)), 18),
            BigDecimal::from(1)
        );
        assert_eq!(to_display_units(U256::from(42), 0), BigDecimal::from(42));
    }

    #[test]
    fn formats_with_truncation() {
        assert_eq!(format_display_units(U256::from(1500), 3, 5), "1.5");
        assert_eq!(format_display_units(U256::from(1000), 3, 5), "1");
        assert_eq!(format_display_units(U256::from(5), 3, 5), "0.005");
        // 1.23456789 truncated, not rounded, to 5 digits.
        assert_eq!(format_display_units(U256::from(123_456_789), 8, 5), "1.23456");
        assert_eq!(format_display_units(U256::from(100_000_001), 8, 5), "1");
        assert_eq!(format_display_units(U256::from(7), 0, 5), "7");
        assert_eq!(format_display_units(U256::from(1234), 2, 0), "12");
    }

    #[test]
    fn formats_max_amount() {
        let formatted = format_display_units(U256::MAX, 18, 18);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457"));
        assert!(formatted.contains('.'));
    }
}
