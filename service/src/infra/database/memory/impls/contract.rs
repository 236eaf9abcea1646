//! [`Contract`]-related [`Database`] implementations.

use std::collections::hash_map::Entry;

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{booking, contract, Contract},
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

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.storage().contracts.read().await.get(&id).cloned())
    }
}

impl<C> Database<Select<By<Option<Contract>, booking::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id = by.into_inner();
        Ok(self
            .storage()
            .contracts
            .read()
            .await
            .values()
            .find(|c| c.booking_id == booking_id)
            .cloned())
    }
}

impl<C> Database<Insert<Contract>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        use crate::infra::database::memory::Error as E;

        let mut contracts = self.storage().contracts.write().await;

        // `Booking` to `Contract` relation is strictly one-to-one.
        if contracts.values().any(|c| c.booking_id == contract.booking_id) {
            return Err(tracerr::new!(database::Error::Memory(
                E::UniqueViolation("contracts.booking_id"),
            )));
        }

        match contracts.entry(contract.id) {
            Entry::Occupied(_) => Err(tracerr::new!(database::Error::Memory(
                E::UniqueViolation("contracts.id"),
            ))),
            Entry::Vacant(e) => {
                let _ = e.insert(contract);
                Ok(())
            }
        }
    }
}

impl<C> Database<Update<Contract>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .storage()
            .contracts
            .write()
            .await
            .insert(contract.id, contract);
        Ok(())
    }
}

impl Database<Lock<By<Contract, contract::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.lock(LockKey::Contract(by.into_inner())).await;
        Ok(())
    }
}
