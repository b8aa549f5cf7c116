//! Exact integer arithmetic on token quantities.
//!
//! Every amount is a [`U256`] in the token's smallest indivisible unit. Nothing
//! in here converts to floating point; display helpers in [`units`] are lossy
//! only in the sense that they truncate fraction digits for presentation.

pub mod serialization;
pub mod u256_ext;
pub mod units;

use alloy::primitives::U256;

/// Computes `amount * numerator / denominator` rounding towards zero.
///
/// Returns `None` for a zero denominator or when `amount * numerator` does
/// not fit into 256 bits. The exchange contract reverts in both cases.
///
/// Rounding down matches what the exchange contract does when it computes the
/// maker side of a partial fill and never hands out more than was signed for.
pub fn scale_by_ratio(amount: U256, numerator: U256, denominator: U256) -> Option<U256> {
    amount
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_by_ratio_floors() {
        assert_eq!(
            scale_by_ratio(U256::from(100), U256::from(1), U256::from(3)),
            Some(U256::from(33))
        );
        assert_eq!(
            scale_by_ratio(U256::from(100), U256::from(2), U256::from(3)),
            Some(U256::from(66))
        );
        assert_eq!(
            scale_by_ratio(U256::from(1), U256::from(1), U256::from(2)),
            Some(U256::ZERO)
        );
    }

    #[test]
    fn scale_by_ratio_exact() {
        assert_eq!(
            scale_by_ratio(U256::from(1000), U256::from(50), U256::from(100)),
            Some(U256::from(500))
        );
        assert_eq!(
            scale_by_ratio(U256::from(7), U256::from(9), U256::from(9)),
            Some(U256::from(7))
        );
    }

    #[test]
    fn scale_by_ratio_rejects_overflowing_product() {
        // The ratio is one but the product does not fit into 256 bits.
        assert_eq!(scale_by_ratio(U256::MAX, U256::MAX, U256::MAX), None);
        assert_eq!(
            scale_by_ratio(U256::MAX, U256::from(2), U256::from(2)),
            None
        );
        assert_eq!(
            scale_by_ratio(U256::MAX, U256::from(1), U256::from(2)),
            Some(U256::MAX >> 1)
        );
    }

    #[test]
    fn scale_by_ratio_errors() {
        assert_eq!(
            scale_by_ratio(U256::from(1), U256::from(1), U256::ZERO),
            None
        );
        assert_eq!(
            scale_by_ratio(U256::MAX, U256::from(2), U256::from(1)),
            None
        );
    }
}
