//! Interfaces to everything outside of the engine: the chain (reads and fill
//! submissions), error reporting and the local token store. Also contains the
//! per-order fill accounting shared by validation and filling.

pub mod accounting;
pub mod exchange;
pub mod reporting;

pub use {
    accounting::FillAccounting,
    exchange::{ExchangeError, SubmitError},
    reporting::TracingReporter,
};
use {
    alloy::primitives::{Address, U256},
    anyhow::Result,
    model::{Order, OrderHash, token::Token},
};

/// Read access to the chain state an order depends on.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait LedgerReading: Send + Sync {
    /// Taker amount of the order that is already filled or cancelled
    /// according to the exchange contract.
    async fn cumulative_filled(&self, order: OrderHash) -> Result<U256>;

    /// The owner's token balance and the amount the exchange's token transfer
    /// proxy is allowed to move on their behalf.
    async fn balance_and_allowance(&self, owner: Address, token: Address) -> Result<(U256, U256)>;

    /// Whether the token is listed in the on-chain token registry.
    async fn is_token_registered(&self, token: Address) -> Result<bool>;

    /// Address of the exchange contract deployed on the active network.
    async fn active_contract_address(&self) -> Result<Address>;
}

/// Submits fills to the exchange contract.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait LedgerSubmitting: Send + Sync {
    /// Submits a fill of `taker_amount` and waits for it to be mined. Returns
    /// the taker amount the exchange actually filled.
    async fn submit_fill(&self, order: &Order, taker_amount: U256) -> Result<U256, SubmitError>;
}

/// Forwards unexpected errors to whoever keeps track of them.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait ErrorReporting: Send + Sync {
    fn report(&self, error: &anyhow::Error);
}

/// Persists tokens the user imported from orders.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait TokenStoring: Send + Sync {
    fn persist(&self, network_id: u64, token: &Token);
}
