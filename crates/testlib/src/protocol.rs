//! Mainnet addresses of the 0x v1 protocol contracts.

use alloy::primitives::{Address, address};

/// Address for the exchange contract.
pub const EXCHANGE: Address = address!("12459c951127e0c374ff9105dda097662a027093");

/// Address of the exchange contract that was replaced by [`EXCHANGE`].
pub const DEPRECATED_EXCHANGE: Address = address!("b69e673309512a9d726f87304c6984054f87a93b");

