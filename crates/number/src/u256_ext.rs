//! Extension trait for converting U256 into arbitrary precision integers.

use {
    alloy::primitives::U256,
    num::{BigInt, BigUint},
};

/// Extension trait for U256 to add utility methods.
pub trait U256Ext {
    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Convert to BigUint.
    fn to_big_uint(&self) -> BigUint;
}

impl U256Ext for U256 {
    fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(num::bigint::Sign::Plus, self.to_big_uint())
    }

    fn to_big_uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.to_be_bytes::<32>().as_slice())
    }
}
