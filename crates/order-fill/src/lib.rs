//! Fills accepted orders: checks every precondition the exchange contract
//! would otherwise fail on, submits the fill and classifies the result.

pub mod executor;
pub mod outcome;
mod time;

pub use {
    executor::FillExecutor,
    outcome::{FillOutcome, FillRequest, PreflightError},
};
