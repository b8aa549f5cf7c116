use {
    alloy::primitives::{Address, U256},
    order_validation::AcceptedOrder,
    std::sync::Arc,
    thiserror::Error,
};

/// A user's request to fill (part of) an accepted order.
#[derive(Clone, Debug)]
pub struct FillRequest {
    pub order: Arc<AcceptedOrder>,
    /// Taker amount to fill in base units.
    pub taker_amount: Option<U256>,
    /// The connected user that fills as taker.
    pub user: Option<Address>,
    /// Whether the user confirmed trading tokens missing from the on-chain
    /// token registry.
    pub unregistered_tokens_acknowledged: bool,
}

/// A precondition of filling that does not hold. Nothing was submitted.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PreflightError {
    #[error("You must connect a wallet to fill this order")]
    ConnectIdentity,
    #[error("This order contains tokens that are not in the token registry")]
    UnregisteredTokens,
    #[error("You must specify a fill amount")]
    FillAmountRequired,
    #[error("Insufficient {symbol} balance to fill this amount")]
    InsufficientBalance { symbol: String },
    #[error("Insufficient {symbol} allowance to fill this amount")]
    InsufficientAllowance { symbol: String },
    #[error("This order can only be filled by {required}")]
    TakerMismatch { required: Address },
    #[error("This order has expired")]
    Expired,
    #[error("This order has already been completely filled")]
    FullyFilled,
    #[error("Cannot fill more then remaining {display} {symbol}")]
    ExceedsRemaining {
        remaining: U256,
        /// The remaining amount in display units.
        display: String,
        symbol: String,
    },
    #[error("Maker no longer has a sufficient balance to complete this order")]
    MakerBalance,
    #[error("Maker does not have a high enough allowance set to complete this order")]
    MakerAllowance,
    #[error("Order signature is not valid")]
    SignatureInvalid,
    #[error("This order is already being filled")]
    FillInProgress,
    #[error("Failed to load the order's state from the network, please refresh and try again")]
    ChainStateUnavailable(String),
}

impl PreflightError {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::ConnectIdentity => "connect_identity",
            Self::UnregisteredTokens => "unregistered_tokens",
            Self::FillAmountRequired => "fill_amount_required",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InsufficientAllowance { .. } => "insufficient_allowance",
            Self::TakerMismatch { .. } => "taker_mismatch",
            Self::Expired => "expired",
            Self::FullyFilled => "fully_filled",
            Self::ExceedsRemaining { .. } => "exceeds_remaining",
            Self::MakerBalance => "maker_balance",
            Self::MakerAllowance => "maker_allowance",
            Self::SignatureInvalid => "signature_invalid",
            Self::FillInProgress => "fill_in_progress",
            Self::ChainStateUnavailable(_) => "chain_state_unavailable",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FillOutcome {
    Rejected(PreflightError),
    Filled {
        /// Taker amount the exchange filled.
        confirmed: U256,
        /// Taker amount of the order no longer available afterwards.
        unavailable: U256,
    },
    /// The user refused to sign the transaction.
    UserDeclined,
    /// The exchange refused the fill because the maker amount would be
    /// rounded by too much.
    RoundingError,
    Failed,
}

impl FillOutcome {
    /// What to tell the user, if anything.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Rejected(err) => Some(err.to_string()),
            Self::RoundingError => {
                Some("The rounding error was too large when filling this order".to_string())
            }
            Self::Failed => Some("Failed to fill order, please refresh and try again".to_string()),
            Self::Filled { .. } | Self::UserDeclined => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Rejected(err) => err.label(),
            Self::Filled { .. } => "filled",
            Self::UserDeclined => "user_declined",
            Self::RoundingError => "rounding_error",
            Self::Failed => "failed",
        }
    }
}
