//! Turns untrusted order documents into verdicts: an order is only accepted
//! once it is well formed, meant for the active network and exchange contract,
//! consistent with its hash and signed by its maker.

pub mod pipeline;
pub mod schema;
pub mod verdict;

pub use {
    pipeline::OrderPipeline,
    schema::{SchemaValidating, SerdeSchema},
    verdict::{AcceptedOrder, ChainFacts, Rejection, ValidationVerdict},
};
