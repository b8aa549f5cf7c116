use {
    alloy::primitives::U256,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

/// Serialize [`U256`] as a decimal string and deserialize it from a decimal
/// string, a `0x` prefixed hex string or a JSON integer.
///
/// Order documents come out of javascript big number libraries, so all three
/// encodings show up in practice.
pub struct HexOrDecimalU256;

impl<'de> DeserializeAs<'de, U256> for HexOrDecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u256 encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.trim();
                if s.is_empty() || s == "0x" {
                    return Err(E::custom("empty string is not a u256"));
                }
                if let Some(hex) = s.strip_prefix("0x") {
                    U256::from_str_radix(hex, 16).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as hex u256: {err}"))
                    })
                } else {
                    U256::from_str_radix(s, 10).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as decimal u256: {err}"))
                    })
                }
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(U256::from(value))
            }
        }

        deserializer.deserialize_any(U256Visitor)
    }
}

impl SerializeAs<U256> for HexOrDecimalU256 {
    fn serialize_as<S: Serializer>(source: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde::{Deserialize, Serialize},
        serde_with::serde_as,
    };

    #[serde_as]
    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct Amount(#[serde_as(as = "HexOrDecimalU256")] U256);

    #[test]
    fn deserialization_from_json() {
        let result: Amount = serde_json::from_str(r#""0x10""#).expect("Valid U256");
        assert_eq!(result, Amount(U256::from(16)));

        let result: Amount = serde_json::from_str(r#""10""#).expect("Valid U256");
        assert_eq!(result, Amount(U256::from(10)));

        let result: Amount = serde_json::from_str("10").expect("Valid U256");
        assert_eq!(result, Amount(U256::from(10)));

        assert!(serde_json::from_str::<Amount>(r#""10e""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""0xx1""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""0AFF""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""""#).is_err());
        assert!(serde_json::from_str::<Amount>("-1").is_err());
        assert!(serde_json::from_str::<Amount>("1.5").is_err());
    }

    #[test]
    fn serialization() {
        let serialized = serde_json::to_string(&Amount(U256::from(10))).unwrap();
        assert_eq!(serialized, "\"10\"");
    }
}
