//! Storage primitives of the [`Memory`] database.

use std::{collections::HashMap, sync::Arc};

use common::Date;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::{
    booking, contract, offer, AvailabilityOverride, Booking, Contract, Offer,
};

#[cfg(doc)]
use super::Memory;

/// Tables and locks of a [`Memory`] database.
#[derive(Debug, Default)]
pub struct Storage {
    /// Stored [`Offer`]s.
    pub(super) offers: RwLock<HashMap<offer::Id, Offer>>,

    /// Stored [`Booking`]s.
    pub(super) bookings: RwLock<HashMap<booking::Id, Booking>>,

    /// Stored [`AvailabilityOverride`]s, one per calendar date at most.
    pub(super) overrides:
        RwLock<HashMap<(offer::Id, Date), AvailabilityOverride>>,

    /// Stored [`Contract`]s.
    pub(super) contracts: RwLock<HashMap<contract::Id, Contract>>,

    /// Registry of entity-scoped locks.
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl Storage {
    /// Acquires the entity lock for the provided [`LockKey`], waiting for
    /// its release in case some other transaction holds it.
    pub(super) async fn lock(&self, key: LockKey) -> OwnedMutexGuard<()> {
        let entry =
            Arc::clone(self.locks.lock().await.entry(key).or_default());
        entry.lock_owned().await
    }
}

/// Key of an entity-scoped lock inside a [`Storage`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(super) enum LockKey {
    /// Lock serializing every check-then-write touching one [`Offer`].
    Offer(offer::Id),

    /// Lock serializing state changes of one [`Booking`].
    Booking(booking::Id),

    /// Lock serializing state changes of one [`Contract`].
    Contract(contract::Id),
}

/// Access to the underlying [`Storage`] of a [`Memory`] client.
pub trait Access {
    /// Returns the [`Storage`] this client operates upon.
    fn storage(&self) -> &Storage;
}
