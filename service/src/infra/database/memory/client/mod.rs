//! [`Memory`] client definitions.

mod non_tx;
mod tx;

#[cfg(doc)]
use super::Memory;

pub use self::{non_tx::NonTx, tx::Tx};
