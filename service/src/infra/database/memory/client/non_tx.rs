//! [`NonTx`] client definitions.

use std::sync::Arc;

use crate::infra::database::memory::storage::{Access, Storage};

/// Non-transactional [`Memory`] client.
///
/// Every operation is individually visible the moment it returns.
///
/// [`Memory`]: crate::infra::Memory
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`Storage`] this client operates upon.
    storage: Arc<Storage>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over an empty [`Storage`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared [`Storage`] of this client.
    pub(in crate::infra::database::memory) fn shared_storage(
        &self,
    ) -> Arc<Storage> {
        Arc::clone(&self.storage)
    }
}

impl Access for NonTx {
    fn storage(&self) -> &Storage {
        &self.storage
    }
}
