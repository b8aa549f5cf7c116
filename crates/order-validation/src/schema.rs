use {model::Order, serde::Deserialize, serde_json::Value};

/// Checks that a JSON document has the shape of an order.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait SchemaValidating: Send + Sync {
    /// Returns every structural problem of the document. Empty if it is a
    /// well formed order.
    fn validate(&self, document: &Value) -> Vec<String>;
}

/// Validates documents by decoding them into an [`Order`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeSchema;

impl SchemaValidating for SerdeSchema {
    fn validate(&self, document: &Value) -> Vec<String> {
        match Order::deserialize(document) {
            Ok(_) => Vec::new(),
            Err(err) => vec![err.to_string()],
        }
    }
}
