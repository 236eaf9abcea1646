//! In-memory [`Database`] implementation.
//!
//! The durable store is an external concern of the engine, which only relies
//! on the abstract operations it issues. This module is the bundled
//! reference implementation of those operations: a process-local store with
//! entity-scoped locking and the same transactional surface a relational
//! backend would expose.

pub mod client;
mod impls;
pub mod storage;

use derive_more::{Deref, Display, Error as StdError};

#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{NonTx, Tx},
    storage::{Access, Storage},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new [`Memory`] database over an empty [`Storage`].
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::new())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory database [`Error`].
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint violation.
    #[display("unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}
