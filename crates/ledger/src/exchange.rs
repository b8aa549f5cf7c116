use thiserror::Error;

/// Error codes the exchange contract emits in its `LogError` event when it
/// refuses a fill without reverting.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum ExchangeError {
    #[error("order has expired")]
    OrderExpired,
    #[error("order is fully filled or cancelled")]
    OrderFullyFilledOrCancelled,
    #[error("rounding error too large")]
    RoundingErrorTooLarge,
    #[error("insufficient balance or allowance")]
    InsufficientBalanceOrAllowance,
}

impl ExchangeError {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::OrderExpired),
            1 => Some(Self::OrderFullyFilledOrCancelled),
            2 => Some(Self::RoundingErrorTooLarge),
            3 => Some(Self::InsufficientBalanceOrAllowance),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::OrderExpired => 0,
            Self::OrderFullyFilledOrCancelled => 1,
            Self::RoundingErrorTooLarge => 2,
            Self::InsufficientBalanceOrAllowance => 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The user refused to sign the fill transaction.
    #[error("user declined the fill transaction")]
    UserDeclined,
    #[error("exchange refused the fill: {0}")]
    Contract(#[from] ExchangeError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
