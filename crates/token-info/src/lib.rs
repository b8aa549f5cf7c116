//! The tokens known to the application, keyed by address, with the active
//! user's cached balances and allowances.
//!
//! Orders can reference tokens the application has never seen. Those get
//! imported into the registry, with their name and symbol decorated when they
//! collide with a known token so that users can tell the two apart.

use {
    alloy::primitives::{Address, U256},
    anyhow::{Context as _, Result},
    futures::future::join_all,
    ledger::{LedgerReading, TokenStoring},
    model::token::{OrderToken, Token},
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    },
};

/// How tokens imported from orders are presented.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reconciliation {
    pub default_icon_url: String,
    /// Appended to the name of an imported token whose name is taken.
    pub imported_name_suffix: String,
    /// Wrapped around the symbol of an imported token whose symbol is taken.
    pub symbol_flourish: String,
}

impl Default for Reconciliation {
    fn default() -> Self {
        Self {
            default_icon_url: "/images/token_icons/default.png".to_string(),
            imported_name_suffix: " [Imported]".to_string(),
            symbol_flourish: "*".to_string(),
        }
    }
}

impl Reconciliation {
    fn decorate_name(&self, name: &str) -> String {
        format!("{name}{}", self.imported_name_suffix)
    }

    fn decorate_symbol(&self, symbol: &str) -> String {
        format!("{flourish}{symbol}{flourish}", flourish = self.symbol_flourish)
    }
}

pub struct TokenRegistry {
    network_id: u64,
    reconciliation: Reconciliation,
    store: Arc<dyn TokenStoring>,
    tokens: Mutex<HashMap<Address, Token>>,
    active_user: Mutex<Option<Address>>,
}

impl TokenRegistry {
    pub fn new(network_id: u64, reconciliation: Reconciliation, store: Arc<dyn TokenStoring>) -> Self {
        Self {
            network_id,
            reconciliation,
            store,
            tokens: Default::default(),
            active_user: Default::default(),
        }
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    /// Adds a trusted token, e.g. from the on-chain token registry or one the
    /// user added themselves. Replaces any token with the same address.
    pub fn insert(&self, token: Token) {
        self.tokens.lock().unwrap().insert(token.address, token);
    }

    pub fn get(&self, address: &Address) -> Option<Token> {
        self.tokens.lock().unwrap().get(address).cloned()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.tokens.lock().unwrap().contains_key(address)
    }

    pub fn active_user(&self) -> Option<Address> {
        *self.active_user.lock().unwrap()
    }

    /// Switches the user whose balances are cached. Balances cached for the
    /// previous user are reset.
    pub fn set_active_user(&self, user: Option<Address>) {
        let mut active_user = self.active_user.lock().unwrap();
        if *active_user == user {
            return;
        }
        *active_user = user;
        for token in self.tokens.lock().unwrap().values_mut() {
            token.balance = U256::ZERO;
            token.allowance = U256::ZERO;
        }
    }

    /// Caches a balance and allowance of the active user. Unknown tokens are
    /// ignored.
    pub fn update_balance(&self, token: &Address, balance: U256, allowance: U256) {
        if let Some(token) = self.tokens.lock().unwrap().get_mut(token) {
            token.balance = balance;
            token.allowance = allowance;
        }
    }

    /// Imports a token referenced by an order unless a token with the same
    /// address is already known, in which case the known metadata wins.
    ///
    /// Returns the imported token.
    pub fn add_if_unseen(&self, order_token: &OrderToken) -> Option<Token> {
        let token = {
            let mut tokens = self.tokens.lock().unwrap();
            if tokens.contains_key(&order_token.address) {
                return None;
            }

            let mut token = Token::from_order_token(
                order_token.clone(),
                self.reconciliation.default_icon_url.clone(),
            );
            if tokens.values().any(|known| known.name == order_token.name) {
                token.name = self.reconciliation.decorate_name(&order_token.name);
            }
            if tokens.values().any(|known| known.symbol == order_token.symbol) {
                token.symbol = self.reconciliation.decorate_symbol(&order_token.symbol);
            }
            tokens.insert(token.address, token.clone());
            token
        };

        tracing::info!(
            address = %token.address,
            name = %token.name,
            symbol = %token.symbol,
            "imported token from order"
        );
        self.store.persist(self.network_id, &token);
        Some(token)
    }

    /// Reloads the active user's balance and allowance of the given tokens.
    /// Does nothing without an active user.
    pub async fn refresh_balances(&self, ledger: &dyn LedgerReading, tokens: &[Address]) -> Result<()> {
        match self.fetch_balances(ledger, tokens).await {
            Some(balances) => self.apply_balances(balances),
            None => Ok(()),
        }
    }

    /// Reads the active user's balance and allowance of the given tokens
    /// without caching them. `None` without an active user.
    pub async fn fetch_balances(
        &self,
        ledger: &dyn LedgerReading,
        tokens: &[Address],
    ) -> Option<FetchedBalances> {
        let owner = self.active_user()?;
        let results = join_all(tokens.iter().map(|token| async move {
            let result = ledger
                .balance_and_allowance(owner, *token)
                .await
                .with_context(|| format!("balance and allowance of {owner} for {token}"));
            (*token, result)
        }))
        .await;
        Some(FetchedBalances { owner, results })
    }

    /// Caches balances read by [`Self::fetch_balances`]. Returns the first
    /// failed read, the successful ones are cached regardless.
    pub fn apply_balances(&self, balances: FetchedBalances) -> Result<()> {
        // The user may have changed while the balances were being fetched.
        if self.active_user() != Some(balances.owner) {
            return Ok(());
        }

        let mut failed = None;
        for (token, result) in balances.results {
            match result {
                Ok((balance, allowance)) => self.update_balance(&token, balance, allowance),
                Err(err) => {
                    tracing::warn!(?err, %token, "failed to refresh balance");
                    failed = failed.or(Some(err));
                }
            }
        }
        match failed {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Balances of one user as read from the ledger, not yet cached.
#[must_use]
#[derive(Debug)]
pub struct FetchedBalances {
    owner: Address,
    results: Vec<(Address, Result<(U256, U256)>)>,
}
