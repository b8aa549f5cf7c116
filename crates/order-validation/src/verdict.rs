use {
    alloy::primitives::{Address, U256},
    model::{Order, OrderHash},
    std::sync::Arc,
    thiserror::Error,
};

/// The result of validating the document in the order slot.
#[derive(Clone, Debug, Default)]
pub enum ValidationVerdict {
    /// No document was submitted.
    #[default]
    Empty,
    /// The latest document is still being validated.
    Pending,
    Rejected(Rejection),
    Accepted(Arc<AcceptedOrder>),
}

impl ValidationVerdict {
    pub fn accepted(&self) -> Option<&Arc<AcceptedOrder>> {
        match self {
            Self::Accepted(order) => Some(order),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Pending => "pending",
            Self::Rejected(rejection) => rejection.label(),
            Self::Accepted(_) => "accepted",
        }
    }
}

/// Why a document can not be filled. The display text is meant for users.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Rejection {
    #[error("Submitted order JSON is not valid JSON")]
    MalformedJson(String),
    #[error("Submitted order JSON is not a valid order")]
    Schema { errors: Vec<String> },
    #[error(
        "This order was made on another Ethereum network (id: {order}). Connect to this network \
         to fill."
    )]
    NetworkMismatch { order: u64, active: u64 },
    #[error("This order was made using a deprecated 0x Exchange contract.")]
    ContractMismatch { order: Address, active: Address },
    #[error("Order hash does not match supplied plaintext values")]
    HashMismatch {
        computed: OrderHash,
        supplied: OrderHash,
    },
    #[error("Order signature is invalid")]
    SignatureInvalid,
    #[error("Failed to load the order's state from the network, please refresh and try again")]
    ChainStateUnavailable(String),
}

impl Rejection {
    fn label(&self) -> &'static str {
        match self {
            Self::MalformedJson(_) => "malformed_json",
            Self::Schema { .. } => "schema",
            Self::NetworkMismatch { .. } => "network_mismatch",
            Self::ContractMismatch { .. } => "contract_mismatch",
            Self::HashMismatch { .. } => "hash_mismatch",
            Self::SignatureInvalid => "signature_invalid",
            Self::ChainStateUnavailable(_) => "chain_state_unavailable",
        }
    }
}

/// Chain state of an accepted order at the time it was validated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChainFacts {
    /// Taker amount already filled or cancelled.
    pub unavailable_amount: U256,
    /// Taker amount that can still be filled.
    pub remaining_fillable: U256,
    pub maker_token_registered: bool,
    pub taker_token_registered: bool,
}

/// An order that is well formed, belongs to the active network and exchange,
/// hashes to the hash it claims and is signed by its maker.
///
/// Only the pipeline creates these.
#[derive(Clone, Debug)]
pub struct AcceptedOrder {
    order: Order,
    hash: OrderHash,
    chain_facts: ChainFacts,
}

impl AcceptedOrder {
    pub(crate) fn new(order: Order, hash: OrderHash, chain_facts: ChainFacts) -> Self {
        Self {
            order,
            hash,
            chain_facts,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn hash(&self) -> OrderHash {
        self.hash
    }

    pub fn chain_facts(&self) -> &ChainFacts {
        &self.chain_facts
    }
}
