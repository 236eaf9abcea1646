//! [`Booking`]-related [`Database`] implementations.

use std::collections::hash_map::Entry;

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{booking, offer, Booking},
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
    read::booking::Confirmed,
};

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.storage().bookings.read().await.get(&id).cloned())
    }
}

impl<C> Database<Select<By<Vec<Confirmed<Booking>>, offer::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Confirmed<Booking>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Confirmed<Booking>>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let offer_id = by.into_inner();
        let mut confirmed = self
            .storage()
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.offer_id == offer_id && b.is_confirmed())
            .cloned()
            .collect::<Vec<_>>();
        confirmed.sort_unstable_by_key(|b| b.period.start());

        Ok(confirmed.into_iter().map(Confirmed).collect())
    }
}

impl<C> Database<Insert<Booking>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        match self.storage().bookings.write().await.entry(booking.id) {
            Entry::Occupied(_) => Err(tracerr::new!(database::Error::Memory(
                database::memory::Error::UniqueViolation("bookings.id"),
            ))),
            Entry::Vacant(e) => {
                let _ = e.insert(booking);
                Ok(())
            }
        }
    }
}

impl<C> Database<Update<Booking>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .storage()
            .bookings
            .write()
            .await
            .insert(booking.id, booking);
        Ok(())
    }
}

impl Database<Lock<By<Booking, booking::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.lock(LockKey::Booking(by.into_inner())).await;
        Ok(())
    }
}
