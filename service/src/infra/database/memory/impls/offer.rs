//! [`Offer`]-related [`Database`] implementations.

use std::collections::hash_map::Entry;

use common::operations::{By, Insert, Lock, Select};
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{
        database::{
            self,
            memory::{
                storage::{Access, LockKey},
                Memory, Tx,
            },
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Offer>, offer::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Offer>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.storage().offers.read().await.get(&id).cloned())
    }
}

impl<C> Database<Insert<Offer>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(offer): Insert<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        match self.storage().offers.write().await.entry(offer.id) {
            Entry::Occupied(_) => Err(tracerr::new!(database::Error::Memory(
                database::memory::Error::UniqueViolation("offers.id"),
            ))),
            Entry::Vacant(e) => {
                let _ = e.insert(offer);
                Ok(())
            }
        }
    }
}

impl Database<Lock<By<Offer, offer::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Offer, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.lock(LockKey::Offer(by.into_inner())).await;
        Ok(())
    }
}
