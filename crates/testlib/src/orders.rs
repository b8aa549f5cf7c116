//! Builder for correctly hashed and signed orders.

use {
    crate::{protocol, tokens},
    alloy::{
        primitives::{Address, B256, U256},
        signers::{SignerSync, local::PrivateKeySigner},
    },
    model::{
        Order,
        order::{Party, TakerAddress},
        signature::SignatureData,
        token::OrderToken,
    },
};

/// 2100-01-01T00:00:00Z
pub const FAR_FUTURE: u64 = 4_102_444_800;

/// Deterministic signer for the given key byte.
pub fn signer(key: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(key)).expect("valid private key")
}

pub fn zrx() -> OrderToken {
    OrderToken {
        name: "0x Protocol Token".to_string(),
        symbol: "ZRX".to_string(),
        decimals: 18,
        address: tokens::ZRX,
    }
}

pub fn weth() -> OrderToken {
    OrderToken {
        name: "Wrapped Ether".to_string(),
        symbol: "WETH".to_string(),
        decimals: 18,
        address: tokens::WETH,
    }
}

/// Builds an order selling 1000 ZRX for 500 WETH (in base units) on mainnet
/// which anyone can fill, signed by [`signer(1)`](signer).
pub struct OrderBuilder {
    order: Order,
    signer: PrivateKeySigner,
}

impl Default for OrderBuilder {
    fn default() -> Self {
        let signer = signer(1);
        Self {
            order: Order {
                maker: Party {
                    address: signer.address(),
                    token: zrx(),
                    amount: U256::from(1000),
                    fee_amount: U256::ZERO,
                },
                taker: Party {
                    address: TakerAddress::anyone(),
                    token: weth(),
                    amount: U256::from(500),
                    fee_amount: U256::ZERO,
                },
                fee_recipient: Address::ZERO,
                exchange_contract: protocol::EXCHANGE,
                network_id: 1,
                expiration: U256::from(FAR_FUTURE),
                salt: U256::from(1),
                signature: SignatureData::default(),
            },
            signer,
        }
    }
}

impl OrderBuilder {
    /// Signs the order with another key. The maker becomes the key's address.
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.order.maker.address = signer.address();
        self.signer = signer;
        self
    }

    /// Overrides the maker without changing the signing key, producing an
    /// order whose signature does not match its maker.
    pub fn with_maker(mut self, maker: Address) -> Self {
        self.order.maker.address = maker;
        self
    }

    pub fn with_taker(mut self, taker: Address) -> Self {
        self.order.taker.address = TakerAddress::only(taker);
        self
    }

    pub fn with_maker_token(mut self, token: OrderToken) -> Self {
        self.order.maker.token = token;
        self
    }

    pub fn with_taker_token(mut self, token: OrderToken) -> Self {
        self.order.taker.token = token;
        self
    }

    pub fn with_maker_amount(mut self, amount: U256) -> Self {
        self.order.maker.amount = amount;
        self
    }

    pub fn with_taker_amount(mut self, amount: U256) -> Self {
        self.order.taker.amount = amount;
        self
    }

    pub fn with_network_id(mut self, network_id: u64) -> Self {
        self.order.network_id = network_id;
        self
    }

    pub fn with_exchange_contract(mut self, exchange: Address) -> Self {
        self.order.exchange_contract = exchange;
        self
    }

    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.order.expiration = U256::from(expiration);
        self
    }

    pub fn with_salt(mut self, salt: U256) -> Self {
        self.order.salt = salt;
        self
    }

    /// Computes the hash and signs it.
    pub fn build(self) -> Order {
        let mut order = self.order;
        let hash = order.compute_hash();
        let signature = self
            .signer
            .sign_message_sync(hash.as_slice())
            .expect("signing never fails for local keys");
        order.signature = SignatureData::from_bytes(hash, &signature.as_bytes());
        order
    }

    /// Builds the order and serializes it like a user would paste it.
    pub fn build_json(self) -> String {
        serde_json::to_string_pretty(&self.build()).expect("orders serialize")
    }
}
