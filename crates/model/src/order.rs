//! Contains the signed order document and its canonical hash.

use {
    crate::{signature::SignatureData, token::OrderToken},
    alloy::primitives::{Address, B256, U256, keccak256},
    chrono::{DateTime, Utc},
    number::{scale_by_ratio, serialization::HexOrDecimalU256},
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    serde_with::serde_as,
    std::fmt::{self, Debug, Formatter},
    thiserror::Error,
};

/// The hash identifying an order, as computed by the exchange contract.
pub type OrderHash = B256;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("submitted order JSON is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("submitted order JSON is not a valid order: {}", .0.join(", "))]
    Schema(Vec<String>),
}

/// A signed offer by the maker to trade `maker.amount` of `maker.token` for
/// `taker.amount` of `taker.token`.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub maker: Party<Address>,
    pub taker: Party<TakerAddress>,
    pub fee_recipient: Address,
    pub exchange_contract: Address,
    pub network_id: u64,
    #[serde_as(as = "HexOrDecimalU256")]
    pub expiration: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub salt: U256,
    pub signature: SignatureData,
}

/// One side of an order.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party<A> {
    pub address: A,
    pub token: OrderToken,
    #[serde_as(as = "HexOrDecimalU256")]
    pub amount: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub fee_amount: U256,
}

/// The address allowed to fill an order. Orders that anyone may fill leave
/// it empty in the document; the zero address means the same thing.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct TakerAddress(Option<Address>);

impl TakerAddress {
    pub fn anyone() -> Self {
        Self(None)
    }

    pub fn only(address: Address) -> Self {
        if address.is_zero() {
            Self(None)
        } else {
            Self(Some(address))
        }
    }

    /// The taker the order is restricted to, if any.
    pub fn required(&self) -> Option<Address> {
        self.0
    }

    /// The address as it enters the order hash.
    pub fn for_hashing(&self) -> Address {
        self.0.unwrap_or(Address::ZERO)
    }
}

impl Debug for TakerAddress {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0 {
            Some(address) => write!(f, "{address}"),
            None => f.write_str("<anyone>"),
        }
    }
}

impl Serialize for TakerAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(address) => address.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for TakerAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Ok(Self::anyone());
        }
        let address = s
            .parse::<Address>()
            .map_err(|err| de::Error::custom(format!("invalid taker address {s:?}: {err}")))?;
        Ok(Self::only(address))
    }
}

/// What filling (part of) an order looks like given how much of it is
/// already unavailable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FillPreview {
    /// Taker amount that can still be filled.
    pub remaining_taker_amount: U256,
    /// Maker amount corresponding to the remaining taker amount.
    pub remaining_maker_amount: U256,
    /// Maker amount the taker receives for the requested fill amount.
    pub receive_amount: Option<U256>,
}

impl Order {
    /// Size of the tightly packed encoding the order hash is computed over.
    const PACKED_LEN: usize = 6 * 20 + 6 * 32;

    /// Parses an order document.
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(ParseError::MalformedJson)?;
        Self::from_value(value).map_err(|err| ParseError::Schema(vec![err.to_string()]))
    }

    /// Decodes an already parsed JSON document into an order.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Computes the order hash exactly like the exchange contract does:
    /// `keccak256(abi.encodePacked(...))` of the signed order fields.
    pub fn compute_hash(&self) -> OrderHash {
        let mut hash_data = [0u8; Self::PACKED_LEN];
        let addresses = [
            self.exchange_contract,
            self.maker.address,
            self.taker.address.for_hashing(),
            self.maker.token.address,
            self.taker.token.address,
            self.fee_recipient,
        ];
        for (i, address) in addresses.iter().enumerate() {
            hash_data[i * 20..(i + 1) * 20].copy_from_slice(address.as_slice());
        }
        let values = [
            self.maker.amount,
            self.taker.amount,
            self.maker.fee_amount,
            self.taker.fee_amount,
            self.expiration,
            self.salt,
        ];
        for (i, value) in values.iter().enumerate() {
            let offset = 120 + i * 32;
            hash_data[offset..offset + 32].copy_from_slice(&value.to_be_bytes::<32>());
        }
        keccak256(hash_data)
    }

    /// Whether the order can no longer be filled at `now` (unix seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        U256::from(now) >= self.expiration
    }

    /// The expiration as a date, if it is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(u64::try_from(self.expiration).ok()?).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    /// Taker amount that can still be filled given the amount already
    /// filled or cancelled on-chain.
    pub fn remaining_taker_amount(&self, unavailable: U256) -> U256 {
        self.taker.amount.saturating_sub(unavailable)
    }

    /// The maker amount exchanged for `taker_amount`, rounded down.
    pub fn maker_amount_for(&self, taker_amount: U256) -> Option<U256> {
        scale_by_ratio(taker_amount, self.maker.amount, self.taker.amount)
    }

    pub fn fill_preview(&self, unavailable: U256, fill_amount: Option<U256>) -> FillPreview {
        let remaining_taker_amount = self.remaining_taker_amount(unavailable);
        FillPreview {
            remaining_taker_amount,
            remaining_maker_amount: self
                .maker_amount_for(remaining_taker_amount)
                .unwrap_or_default(),
            receive_amount: fill_amount.and_then(|amount| self.maker_amount_for(amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::address,
        hex_literal::hex,
        serde_json::{Value, json},
    };

    fn document() -> Value {
        json!({
            "maker": {
                "address": "0x5409ed021d9299bf6814279a6a1411a7e866a631",
                "token": {
                    "name": "0x Protocol Token",
                    "symbol": "ZRX",
                    "decimals": 18,
                    "address": "0xe41d2489571d322189246dafa5ebde1f4699f498",
                },
                "amount": "1000000000000000000",
                "feeAmount": "0",
            },
            "taker": {
                "address": "",
                "token": {
                    "name": "Wrapped Ether",
                    "symbol": "WETH",
                    "decimals": 18,
                    "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                },
                "amount": "500000000000000000",
                "feeAmount": "0",
            },
            "feeRecipient": "0x0000000000000000000000000000000000000000",
            "exchangeContract": "0x12459c951127e0c374ff9105dda097662a027093",
            "networkId": 1,
            "expiration": "1700000000",
            "salt": "42",
            "signature": {
                "hash": "0xbc9a87968feb84201120715c14ddb38ddeaa7907cf269924a94b35fc6f83255b",
                "r": "0x0101010101010101010101010101010101010101010101010101010101010101",
                "s": "0x0202020202020202020202020202020202020202020202020202020202020202",
                "v": 27,
            },
        })
    }

    fn order() -> Order {
        Order::from_value(document()).unwrap()
    }

    #[test]
    fn deserializes_order_document() {
        let order = order();
        assert_eq!(
            order.maker.address,
            address!("5409ed021d9299bf6814279a6a1411a7e866a631")
        );
        assert_eq!(order.taker.address, TakerAddress::anyone());
        assert_eq!(order.maker.token.symbol, "ZRX");
        assert_eq!(order.maker.amount, U256::from(10).pow(U256::from(18)));
        assert_eq!(order.taker.amount, U256::from(5) * U256::from(10).pow(U256::from(17)));
        assert_eq!(order.network_id, 1);
        assert_eq!(order.expiration, U256::from(1_700_000_000u64));
        assert_eq!(order.salt, U256::from(42));
    }

    #[test]
    fn serializes_back_to_equivalent_document() {
        let serialized = serde_json::to_value(order()).unwrap();
        assert_eq!(serialized["taker"]["address"], json!(""));
        assert_eq!(serialized["salt"], json!("42"));
        assert_eq!(Order::from_value(serialized).unwrap(), order());
    }

    #[test]
    fn accepts_hex_and_integer_quantities() {
        let mut document = document();
        document["expiration"] = json!("0x6553f100");
        document["salt"] = json!(42);
        let order = Order::from_value(document).unwrap();
        assert_eq!(order.expiration, U256::from(1_700_000_000u64));
        assert_eq!(order.salt, U256::from(42));
        assert_eq!(order.compute_hash(), self::order().compute_hash());
    }

    #[test]
    fn computes_exchange_order_hash() {
        assert_eq!(
            order().compute_hash(),
            B256::new(hex!(
                "bc9a87968feb84201120715c14ddb38ddeaa7907cf269924a94b35fc6f83255b"
            ))
        );
    }

    #[test]
    fn hash_does_not_depend_on_document_field_order() {
        let reordered = r#"{
            "signature": {"v": 27, "s": "0x0202020202020202020202020202020202020202020202020202020202020202", "r": "0x0101010101010101010101010101010101010101010101010101010101010101", "hash": "0xbc9a87968feb84201120715c14ddb38ddeaa7907cf269924a94b35fc6f83255b"},
            "salt": "42",
            "networkId": 1,
            "expiration": "1700000000",
            "exchangeContract": "0x12459C951127e0c374FF9105DdA097662A027093",
            "feeRecipient": "0x0000000000000000000000000000000000000000",
            "taker": {"feeAmount": "0", "amount": "0x6f05b59d3b20000", "address": "", "token": {"address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "decimals": 18, "symbol": "WETH", "name": "Wrapped Ether"}},
            "maker": {"feeAmount": "0", "amount": "1000000000000000000", "token": {"address": "0xe41d2489571d322189246dafa5ebde1f4699f498", "decimals": 18, "symbol": "ZRX", "name": "0x Protocol Token"}, "address": "0x5409ed021d9299bf6814279a6a1411a7e866a631"}
        }"#;
        let reordered = Order::from_json(reordered).unwrap();
        assert_eq!(reordered, order());
        assert_eq!(reordered.compute_hash(), order().compute_hash());
    }

    #[test]
    fn token_metadata_is_not_part_of_the_hash() {
        let mut renamed = order();
        renamed.maker.token.name = "Something Else".to_string();
        renamed.maker.token.symbol = "ELSE".to_string();
        renamed.taker.token.decimals = 6;
        assert_eq!(renamed.compute_hash(), order().compute_hash());
    }

    #[test]
    fn every_signed_field_changes_the_hash() {
        let original = order().compute_hash();
        let other = Address::repeat_byte(0xaa);
        let modifications: Vec<Box<dyn Fn(&mut Order)>> = vec![
            Box::new(|o| o.exchange_contract = other),
            Box::new(|o| o.maker.address = other),
            Box::new(|o| o.taker.address = TakerAddress::only(other)),
            Box::new(|o| o.maker.token.address = other),
            Box::new(|o| o.taker.token.address = other),
            Box::new(|o| o.fee_recipient = other),
            Box::new(|o| o.maker.amount += U256::from(1)),
            Box::new(|o| o.taker.amount += U256::from(1)),
            Box::new(|o| o.maker.fee_amount = U256::from(1)),
            Box::new(|o| o.taker.fee_amount = U256::from(1)),
            Box::new(|o| o.expiration += U256::from(1)),
            Box::new(|o| o.salt = U256::from(43)),
        ];
        for modify in modifications {
            let mut modified = order();
            modify(&mut modified);
            assert_ne!(modified.compute_hash(), original);
        }
    }

    #[test]
    fn swapping_amounts_changes_the_hash() {
        let mut swapped = order();
        std::mem::swap(&mut swapped.maker.amount, &mut swapped.taker.amount);
        assert_ne!(swapped.compute_hash(), order().compute_hash());
    }

    #[test]
    fn zero_taker_address_means_anyone() {
        let mut document = document();
        document["taker"]["address"] = json!("0x0000000000000000000000000000000000000000");
        let order = Order::from_value(document).unwrap();
        assert_eq!(order.taker.address.required(), None);
        assert_eq!(order.compute_hash(), self::order().compute_hash());

        let mut document = self::document();
        document["taker"]["address"] = json!("0x00000000000000000000000000000000000000ff");
        let order = Order::from_value(document).unwrap();
        assert_eq!(
            order.taker.address.required(),
            Some(Address::with_last_byte(0xff))
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Order::from_json("{\"maker\": "),
            Err(ParseError::MalformedJson(_))
        ));
        assert!(matches!(
            Order::from_json("not json at all"),
            Err(ParseError::MalformedJson(_))
        ));
        assert!(matches!(
            Order::from_json("{}"),
            Err(ParseError::Schema(errors)) if errors.len() == 1
        ));

        for (path, value) in [
            ("salt", json!("-1")),
            ("networkId", json!("one")),
            ("exchangeContract", json!("0x1234")),
        ] {
            let mut document = document();
            document[path] = value;
            assert!(matches!(
                Order::from_json(&document.to_string()),
                Err(ParseError::Schema(_))
            ));
        }

        let mut document = document();
        document["taker"]["address"] = json!("not an address");
        assert!(Order::from_value(document).is_err());
    }

    #[test]
    fn expiration() {
        let order = order();
        assert!(!order.is_expired_at(1_699_999_999));
        assert!(order.is_expired_at(1_700_000_000));
        assert!(order.is_expired_at(1_800_000_000));
        assert_eq!(
            order.expires_at(),
            DateTime::from_timestamp(1_700_000_000, 0)
        );

        let mut far_future = order;
        far_future.expiration = U256::MAX;
        assert_eq!(far_future.expires_at(), None);
        assert!(!far_future.is_expired_at(u64::MAX));
    }

    #[test]
    fn fill_preview_rounds_down() {
        let mut order = order();
        order.maker.amount = U256::from(100);
        order.taker.amount = U256::from(3);

        let preview = order.fill_preview(U256::from(1), Some(U256::from(1)));
        assert_eq!(
            preview,
            FillPreview {
                remaining_taker_amount: U256::from(2),
                remaining_maker_amount: U256::from(66),
                receive_amount: Some(U256::from(33)),
            }
        );

        let preview = order.fill_preview(U256::from(5), None);
        assert_eq!(preview, FillPreview::default());
    }
}
