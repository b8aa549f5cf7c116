//! In-memory implementations of the ledger collaborators.

use {
    crate::protocol,
    alloy::primitives::{Address, U256},
    anyhow::{Result, anyhow},
    ledger::{ErrorReporting, LedgerReading, LedgerSubmitting, SubmitError, TokenStoring},
    model::{Order, OrderHash, token::Token},
    std::{
        collections::{HashMap, HashSet, VecDeque},
        sync::Mutex,
    },
};

#[derive(Debug)]
struct State {
    exchange: Address,
    filled: HashMap<OrderHash, U256>,
    balances: HashMap<(Address, Address), (U256, U256)>,
    registered: HashSet<Address>,
    unavailable: bool,
    submissions: Vec<(OrderHash, U256)>,
    scripted: VecDeque<Result<U256, SubmitError>>,
}

/// A chain that executes fills in memory.
///
/// Fills succeed in full and are added to the order's cumulative filled
/// amount unless a different result was scripted with [`Self::script`].
#[derive(Debug)]
pub struct InMemoryLedger(Mutex<State>);

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self(Mutex::new(State {
            exchange: protocol::EXCHANGE,
            filled: Default::default(),
            balances: Default::default(),
            registered: Default::default(),
            unavailable: false,
            submissions: Default::default(),
            scripted: Default::default(),
        }))
    }
}

impl InMemoryLedger {
    pub fn set_exchange(&self, exchange: Address) {
        self.0.lock().unwrap().exchange = exchange;
    }

    pub fn set_filled(&self, order: OrderHash, filled: U256) {
        self.0.lock().unwrap().filled.insert(order, filled);
    }

    pub fn set_balance(&self, owner: Address, token: Address, balance: U256, allowance: U256) {
        self.0
            .lock()
            .unwrap()
            .balances
            .insert((owner, token), (balance, allowance));
    }

    pub fn register_token(&self, token: Address) {
        self.0.lock().unwrap().registered.insert(token);
    }

    /// Makes every read fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.0.lock().unwrap().unavailable = unavailable;
    }

    /// Result of the next submission instead of a successful full fill.
    pub fn script(&self, result: Result<U256, SubmitError>) {
        self.0.lock().unwrap().scripted.push_back(result);
    }

    /// All submissions so far as (order hash, taker amount).
    pub fn submissions(&self) -> Vec<(OrderHash, U256)> {
        self.0.lock().unwrap().submissions.clone()
    }

    fn read<T>(&self, read: impl FnOnce(&State) -> T) -> Result<T> {
        let state = self.0.lock().unwrap();
        if state.unavailable {
            return Err(anyhow!("ledger unavailable"));
        }
        Ok(read(&state))
    }
}

#[async_trait::async_trait]
impl LedgerReading for InMemoryLedger {
    async fn cumulative_filled(&self, order: OrderHash) -> Result<U256> {
        self.read(|state| state.filled.get(&order).copied().unwrap_or_default())
    }

    async fn balance_and_allowance(&self, owner: Address, token: Address) -> Result<(U256, U256)> {
        self.read(|state| {
            state
                .balances
                .get(&(owner, token))
                .copied()
                .unwrap_or_default()
        })
    }

    async fn is_token_registered(&self, token: Address) -> Result<bool> {
        self.read(|state| state.registered.contains(&token))
    }

    async fn active_contract_address(&self) -> Result<Address> {
        self.read(|state| state.exchange)
    }
}

#[async_trait::async_trait]
impl LedgerSubmitting for InMemoryLedger {
    async fn submit_fill(&self, order: &Order, taker_amount: U256) -> Result<U256, SubmitError> {
        let hash = order.compute_hash();
        let mut state = self.0.lock().unwrap();
        state.submissions.push((hash, taker_amount));
        let result = state.scripted.pop_front().unwrap_or(Ok(taker_amount));
        if let Ok(filled) = &result {
            *state.filled.entry(hash).or_default() += *filled;
        }
        result
    }
}

/// Keeps every reported error.
#[derive(Debug, Default)]
pub struct RecordingReporter(Mutex<Vec<String>>);

impl RecordingReporter {
    pub fn reported(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ErrorReporting for RecordingReporter {
    fn report(&self, error: &anyhow::Error) {
        self.0.lock().unwrap().push(format!("{error:#}"));
    }
}

/// Keeps every persisted token along with its network.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore(Mutex<Vec<(u64, Token)>>);

impl InMemoryTokenStore {
    pub fn persisted(&self) -> Vec<(u64, Token)> {
        self.0.lock().unwrap().clone()
    }
}

impl TokenStoring for InMemoryTokenStore {
    fn persist(&self, network_id: u64, token: &Token) {
        self.0.lock().unwrap().push((network_id, token.clone()));
    }
}
