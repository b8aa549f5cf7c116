//! Mainnet addresses of commonly used tokens.

use alloy::primitives::{Address, address};

/// Address for the `ZRX` token.
pub const ZRX: Address = address!("e41d2489571d322189246dafa5ebde1f4699f498");

/// Address for the `WETH` token.
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

/// Address for the `DAI` token.
pub const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

/// Address for the `REP` token.
pub const REP: Address = address!("1985365e9f78359a9B6AD760e32412f4a445E862");
