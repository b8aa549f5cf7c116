use {
    crate::{
        schema::{SchemaValidating, SerdeSchema},
        verdict::{AcceptedOrder, ChainFacts, Rejection, ValidationVerdict},
    },
    ledger::{FillAccounting, LedgerReading},
    model::{Order, signature},
    std::sync::{Arc, Mutex},
    token_info::TokenRegistry,
    tracing::instrument,
};

/// Validates the documents submitted into a single order slot.
///
/// Every submission supersedes the previous one. Validation awaits the chain
/// several times, so a run checks after every await whether a newer document
/// was submitted in the meantime and if so gives up without touching the
/// slot.
pub struct OrderPipeline {
    network_id: u64,
    schema: Arc<dyn SchemaValidating>,
    ledger: Arc<dyn LedgerReading>,
    tokens: Arc<TokenRegistry>,
    accounting: Arc<FillAccounting>,
    slot: Mutex<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    verdict: ValidationVerdict,
}

/// Why a validation run stopped early.
enum Stop {
    Rejected(Rejection),
    Superseded,
}

impl From<Rejection> for Stop {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl OrderPipeline {
    pub fn new(
        network_id: u64,
        ledger: Arc<dyn LedgerReading>,
        tokens: Arc<TokenRegistry>,
        accounting: Arc<FillAccounting>,
    ) -> Self {
        Self {
            network_id,
            schema: Arc::new(SerdeSchema),
            ledger,
            tokens,
            accounting,
            slot: Default::default(),
        }
    }

    pub fn with_schema(mut self, schema: Arc<dyn SchemaValidating>) -> Self {
        self.schema = schema;
        self
    }

    /// Validates an order that was handed to the application directly instead
    /// of being pasted by the user.
    pub async fn with_initial_order(self, order: &Order) -> Self {
        match serde_json::to_string(order) {
            Ok(document) => {
                self.submit(&document).await;
            }
            Err(err) => tracing::warn!(?err, "failed to serialize initial order"),
        }
        self
    }

    /// The verdict of the latest submitted document.
    pub fn verdict(&self) -> ValidationVerdict {
        self.slot.lock().unwrap().verdict.clone()
    }

    /// Empties the slot. Runs still in flight get discarded.
    pub fn clear(&self) {
        self.replace(ValidationVerdict::Empty);
    }

    /// Validates a document and stores the verdict in the slot.
    ///
    /// Returns `None` if another document was submitted before this one
    /// finished validating. Its verdict is discarded in that case.
    pub async fn submit(&self, document: &str) -> Option<ValidationVerdict> {
        if document.trim().is_empty() {
            self.replace(ValidationVerdict::Empty);
            return Some(ValidationVerdict::Empty);
        }

        let generation = self.replace(ValidationVerdict::Pending);
        let verdict = match self.validate(document, generation).await {
            Ok(order) => ValidationVerdict::Accepted(Arc::new(order)),
            Err(Stop::Rejected(rejection)) => ValidationVerdict::Rejected(rejection),
            Err(Stop::Superseded) => {
                Metrics::get().superseded.inc();
                tracing::debug!(generation, "discarding superseded validation");
                return None;
            }
        };
        self.finish(generation, verdict)
    }

    /// Starts a new generation with the given verdict and returns it.
    fn replace(&self, verdict: ValidationVerdict) -> u64 {
        let mut slot = self.slot.lock().unwrap();
        slot.generation += 1;
        slot.verdict = verdict;
        slot.generation
    }

    fn ensure_current(&self, generation: u64) -> Result<(), Stop> {
        if self.slot.lock().unwrap().generation == generation {
            Ok(())
        } else {
            Err(Stop::Superseded)
        }
    }

    fn finish(&self, generation: u64, verdict: ValidationVerdict) -> Option<ValidationVerdict> {
        let mut slot = self.slot.lock().unwrap();
        if slot.generation != generation {
            Metrics::get().superseded.inc();
            return None;
        }
        Metrics::get()
            .verdicts
            .with_label_values(&[verdict.label()])
            .inc();
        match &verdict {
            ValidationVerdict::Accepted(order) => tracing::info!(
                hash = %order.hash(),
                remaining = %order.chain_facts().remaining_fillable,
                "accepted order"
            ),
            ValidationVerdict::Rejected(rejection) => {
                tracing::warn!(?rejection, "rejected order document")
            }
            ValidationVerdict::Empty | ValidationVerdict::Pending => (),
        }
        slot.verdict = verdict.clone();
        Some(verdict)
    }

    #[instrument(skip(self, document))]
    async fn validate(&self, document: &str, generation: u64) -> Result<AcceptedOrder, Stop> {
        let document: serde_json::Value = serde_json::from_str(document)
            .map_err(|err| Rejection::MalformedJson(err.to_string()))?;

        let errors = self.schema.validate(&document);
        if !errors.is_empty() {
            tracing::debug!(?errors, "order document does not match schema");
            return Err(Rejection::Schema { errors }.into());
        }
        let order = Order::from_value(document).map_err(|err| Rejection::Schema {
            errors: vec![err.to_string()],
        })?;

        if order.network_id != self.network_id {
            return Err(Rejection::NetworkMismatch {
                order: order.network_id,
                active: self.network_id,
            }
            .into());
        }

        let active_exchange = self.ledger.active_contract_address().await;
        self.ensure_current(generation)?;
        let active_exchange = active_exchange.map_err(chain_state_unavailable)?;
        if order.exchange_contract != active_exchange {
            return Err(Rejection::ContractMismatch {
                order: order.exchange_contract,
                active: active_exchange,
            }
            .into());
        }

        let hash = order.compute_hash();
        if hash != order.signature.hash {
            return Err(Rejection::HashMismatch {
                computed: hash,
                supplied: order.signature.hash,
            }
            .into());
        }
        if !signature::verify(&hash, &order.signature, order.maker.address) {
            return Err(Rejection::SignatureInvalid.into());
        }
        tracing::debug!(%hash, "order is authentic");

        self.tokens.add_if_unseen(&order.maker.token);
        self.tokens.add_if_unseen(&order.taker.token);
        let tokens = [order.maker.token.address, order.taker.token.address];
        let balances = self
            .tokens
            .fetch_balances(self.ledger.as_ref(), &tokens)
            .await;
        self.ensure_current(generation)?;
        if let Some(Err(err)) = balances.map(|balances| self.tokens.apply_balances(balances)) {
            tracing::warn!(?err, "failed to refresh balances of order tokens");
        }

        let reads = futures::try_join!(
            self.ledger.cumulative_filled(hash),
            self.ledger.is_token_registered(order.maker.token.address),
            self.ledger.is_token_registered(order.taker.token.address),
        );
        self.ensure_current(generation)?;
        let (filled, maker_token_registered, taker_token_registered) =
            reads.map_err(chain_state_unavailable)?;

        let unavailable_amount = self.accounting.observe_chain(hash, filled);
        let chain_facts = ChainFacts {
            unavailable_amount,
            remaining_fillable: order.remaining_taker_amount(unavailable_amount),
            maker_token_registered,
            taker_token_registered,
        };
        Ok(AcceptedOrder::new(order, hash, chain_facts))
    }
}

fn chain_state_unavailable(err: anyhow::Error) -> Rejection {
    tracing::warn!(?err, "failed to read order state from the ledger");
    Rejection::ChainStateUnavailable(format!("{err:#}"))
}

#[derive(prometheus_metric_storage::MetricStorage)]
#[metric(subsystem = "order_validation")]
struct Metrics {
    /// Verdicts of completed validation runs.
    #[metric(labels("result"))]
    verdicts: prometheus::IntCounterVec,

    /// Validation runs discarded because a newer document was submitted.
    superseded: prometheus::IntCounter,
}

impl Metrics {
    fn get() -> &'static Self {
        Metrics::instance(observe::metrics::get_storage_registry()).unwrap()
    }
}
