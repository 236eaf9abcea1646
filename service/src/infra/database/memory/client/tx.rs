//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::infra::database::memory::storage::{Access, LockKey, Storage};

use super::NonTx;

/// Transactional [`Memory`] client.
///
/// Entity locks acquired through this client are parked in the transaction
/// and released on [`commit()`], or on drop of the last clone in case the
/// transaction is abandoned midway.
///
/// Acquiring the same entity lock twice within one transaction blocks
/// forever.
///
/// [`Memory`]: crate::infra::Memory
/// [`commit()`]: Tx::commit
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Storage`] this client operates upon.
    storage: Arc<Storage>,

    /// Entity locks held by this transaction.
    held: Arc<Mutex<Vec<OwnedMutexGuard<()>>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            storage: client.shared_storage(),
            held: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Acquires the entity lock for the provided [`LockKey`], parking it in
    /// this transaction.
    pub(in crate::infra::database::memory) async fn lock(&self, key: LockKey) {
        let guard = self.storage.lock(key).await;
        self.held.lock().await.push(guard);
    }

    /// Commits this [`Tx`] client, releasing every held entity lock.
    pub async fn commit(&self) {
        self.held.lock().await.clear();
    }
}

impl Access for Tx {
    fn storage(&self) -> &Storage {
        &self.storage
    }
}
