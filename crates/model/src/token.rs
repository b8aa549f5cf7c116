use {
    alloy::primitives::{Address, U256},
    number::serialization::HexOrDecimalU256,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

/// Token metadata as embedded in an order document. This is whatever the
/// maker claims about the token and is not trusted beyond the address.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
}

/// A token known to the application along with the active user's cached
/// balance and allowance.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub icon_url: String,
    #[serde_as(as = "HexOrDecimalU256")]
    pub balance: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub allowance: U256,
}

impl Token {
    /// Creates a token from order metadata with a zero balance and allowance.
    pub fn from_order_token(token: OrderToken, icon_url: String) -> Self {
        Self {
            address: token.address,
            name: token.name,
            symbol: token.symbol,
            decimals: token.decimals,
            icon_url,
            balance: U256::ZERO,
            allowance: U256::ZERO,
        }
    }
}
