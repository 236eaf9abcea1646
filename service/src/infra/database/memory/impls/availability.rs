//! [`AvailabilityOverride`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Select, Upsert},
    DateRange,
};
use tracerr::Traced;

use crate::{
    domain::{offer, AvailabilityOverride},
    infra::{
        database::{
            self,
            memory::{storage::Access, Memory},
        },
        Database,
    },
};

impl<C> Database<Select<By<Vec<AvailabilityOverride>, (offer::Id, DateRange)>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = Vec<AvailabilityOverride>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<AvailabilityOverride>, (offer::Id, DateRange)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (offer_id, period) = by.into_inner();
        let mut overrides = self
            .storage()
            .overrides
            .read()
            .await
            .values()
            .filter(|o| o.offer_id == offer_id && period.contains(o.date))
            .cloned()
            .collect::<Vec<_>>();
        overrides.sort_unstable_by_key(|o| o.date);

        Ok(overrides)
    }
}

impl<C> Database<Upsert<Vec<AvailabilityOverride>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Upsert(overrides): Upsert<Vec<AvailabilityOverride>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut stored = self.storage().overrides.write().await;
        for o in overrides {
            let _ = stored.insert((o.offer_id, o.date), o);
        }
        Ok(())
    }
}

impl<C> Database<Delete<By<AvailabilityOverride, (offer::Id, DateRange)>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<AvailabilityOverride, (offer::Id, DateRange)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (offer_id, period) = by.into_inner();
        self.storage()
            .overrides
            .write()
            .await
            .retain(|(id, date), _| {
                *id != offer_id || !period.contains(*date)
            });
        Ok(())
    }
}
