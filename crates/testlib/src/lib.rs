//! Fixtures shared by the tests of the engine crates.

pub mod ledger;
pub mod orders;
pub mod protocol;
pub mod tokens;
