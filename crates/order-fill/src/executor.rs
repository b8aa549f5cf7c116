use {
    crate::{
        outcome::{FillOutcome, FillRequest, PreflightError},
        time,
    },
    alloy::primitives::{Address, U256},
    ledger::{
        ErrorReporting,
        ExchangeError,
        FillAccounting,
        LedgerReading,
        LedgerSubmitting,
        SubmitError,
    },
    model::{OrderHash, signature, token::OrderToken},
    number::units::format_display_units,
    order_validation::AcceptedOrder,
    std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    },
    token_info::TokenRegistry,
    tracing::instrument,
};

pub struct FillExecutor {
    ledger: Arc<dyn LedgerReading>,
    submitter: Arc<dyn LedgerSubmitting>,
    reporter: Arc<dyn ErrorReporting>,
    tokens: Arc<TokenRegistry>,
    accounting: Arc<FillAccounting>,
    in_flight: Mutex<HashSet<OrderHash>>,
}

/// Marks an order as being filled until dropped.
struct InFlight<'a> {
    orders: &'a Mutex<HashSet<OrderHash>>,
    order: OrderHash,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.orders.lock().unwrap().remove(&self.order);
    }
}

impl FillExecutor {
    pub fn new(
        ledger: Arc<dyn LedgerReading>,
        submitter: Arc<dyn LedgerSubmitting>,
        reporter: Arc<dyn ErrorReporting>,
        tokens: Arc<TokenRegistry>,
        accounting: Arc<FillAccounting>,
    ) -> Self {
        Self {
            ledger,
            submitter,
            reporter,
            tokens,
            accounting,
            in_flight: Default::default(),
        }
    }

    /// Fills the requested amount of the order if every precondition holds.
    ///
    /// Only one fill per order can be in progress at a time. Failed fills are
    /// never retried.
    #[instrument(skip_all, fields(order = %request.order.hash()))]
    pub async fn fill(&self, request: &FillRequest) -> FillOutcome {
        let outcome = match self.start(request.order.hash()) {
            Some(_in_flight) => match self.preflight(request).await {
                Ok(taker_amount) => self.submit(&request.order, taker_amount).await,
                Err(err) => {
                    tracing::debug!(?err, "fill precondition failed");
                    FillOutcome::Rejected(err)
                }
            },
            None => FillOutcome::Rejected(PreflightError::FillInProgress),
        };
        Metrics::get()
            .outcomes
            .with_label_values(&[outcome.label()])
            .inc();
        outcome
    }

    fn start(&self, order: OrderHash) -> Option<InFlight<'_>> {
        if !self.in_flight.lock().unwrap().insert(order) {
            return None;
        }
        Some(InFlight {
            orders: &self.in_flight,
            order,
        })
    }

    /// Checks the preconditions in order and returns the taker amount to fill
    /// once all of them hold.
    async fn preflight(&self, request: &FillRequest) -> Result<U256, PreflightError> {
        let accepted = &request.order;
        let order = accepted.order();
        let hash = accepted.hash();

        let user = request.user.ok_or(PreflightError::ConnectIdentity)?;

        let facts = accepted.chain_facts();
        if !(facts.maker_token_registered && facts.taker_token_registered)
            && !request.unregistered_tokens_acknowledged
        {
            return Err(PreflightError::UnregisteredTokens);
        }

        let taker_amount = request
            .taker_amount
            .filter(|amount| !amount.is_zero())
            .ok_or(PreflightError::FillAmountRequired)?;

        let ((balance, allowance), filled, (maker_balance, maker_allowance)) = futures::try_join!(
            self.ledger
                .balance_and_allowance(user, order.taker.token.address),
            self.ledger.cumulative_filled(hash),
            self.ledger
                .balance_and_allowance(order.maker.address, order.maker.token.address),
        )
        .map_err(|err| {
            tracing::warn!(?err, "failed to read fill state from the ledger");
            PreflightError::ChainStateUnavailable(format!("{err:#}"))
        })?;
        if self.tokens.active_user() == Some(user) {
            self.tokens
                .update_balance(&order.taker.token.address, balance, allowance);
        }

        if taker_amount > balance {
            return Err(PreflightError::InsufficientBalance {
                symbol: self.symbol(&order.taker.token),
            });
        }
        if taker_amount > allowance {
            return Err(PreflightError::InsufficientAllowance {
                symbol: self.symbol(&order.taker.token),
            });
        }

        if let Some(required) = order.taker.address.required()
            && required != user
        {
            return Err(PreflightError::TakerMismatch { required });
        }

        let now = u64::try_from(time::now().timestamp()).unwrap_or_default();
        if order.is_expired_at(now) {
            return Err(PreflightError::Expired);
        }

        let unavailable = self.accounting.observe_chain(hash, filled);
        let remaining = order.remaining_taker_amount(unavailable);
        if remaining.is_zero() {
            return Err(PreflightError::FullyFilled);
        }
        if taker_amount > remaining {
            return Err(PreflightError::ExceedsRemaining {
                remaining,
                display: format_display_units(
                    remaining,
                    order.taker.token.decimals,
                    usize::from(order.taker.token.decimals),
                ),
                symbol: self.symbol(&order.taker.token),
            });
        }

        // The exchange reverts when the product overflows, no balance covers that.
        let maker_amount = order.maker_amount_for(taker_amount).unwrap_or(U256::MAX);
        if maker_balance < maker_amount {
            return Err(PreflightError::MakerBalance);
        }
        if maker_allowance < maker_amount {
            return Err(PreflightError::MakerAllowance);
        }

        if !signature::verify(&hash, &order.signature, order.maker.address) {
            return Err(PreflightError::SignatureInvalid);
        }

        Ok(taker_amount)
    }

    async fn submit(&self, accepted: &AcceptedOrder, taker_amount: U256) -> FillOutcome {
        let order = accepted.order();
        let hash = accepted.hash();
        tracing::debug!(%taker_amount, "submitting fill");

        match self.submitter.submit_fill(order, taker_amount).await {
            Ok(confirmed) => {
                let unavailable = self.accounting.record_fill(hash, confirmed);
                tracing::info!(%confirmed, %unavailable, "filled order");
                let tokens = [order.maker.token.address, order.taker.token.address];
                if let Err(err) = self
                    .tokens
                    .refresh_balances(self.ledger.as_ref(), &tokens)
                    .await
                {
                    tracing::warn!(?err, "failed to refresh balances after fill");
                }
                FillOutcome::Filled {
                    confirmed,
                    unavailable,
                }
            }
            Err(SubmitError::UserDeclined) => {
                tracing::debug!("user declined fill");
                FillOutcome::UserDeclined
            }
            Err(err) => {
                let outcome = match err {
                    SubmitError::Contract(ExchangeError::RoundingErrorTooLarge) => {
                        FillOutcome::RoundingError
                    }
                    _ => FillOutcome::Failed,
                };
                self.reporter
                    .report(&anyhow::Error::from(err).context(format!("failed to fill order {hash}")));
                outcome
            }
        }
    }

    /// The symbol the user knows the token by.
    fn symbol(&self, token: &OrderToken) -> String {
        self.tokens
            .get(&token.address)
            .map(|known| known.symbol)
            .unwrap_or_else(|| token.symbol.clone())
    }
}

#[derive(prometheus_metric_storage::MetricStorage)]
#[metric(subsystem = "order_fill")]
struct Metrics {
    /// Outcomes of fill attempts.
    #[metric(labels("outcome"))]
    outcomes: prometheus::IntCounterVec,
}

impl Metrics {
    fn get() -> &'static Self {
        Metrics::instance(observe::metrics::get_storage_registry()).unwrap()
    }
}
