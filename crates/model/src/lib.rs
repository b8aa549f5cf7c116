//! Contains the models that are shared between order validation and order
//! filling: the signed order document, its canonical hash and signature, and
//! the tokens it references.

pub mod order;
pub mod signature;
pub mod token;

pub use order::{Order, OrderHash, ParseError};
