//! [`BookedDates`] definition.

use std::collections::BTreeSet;

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{offer, Booking},
    infra::{database, Database},
    read::booking::Confirmed,
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Offer;

/// [`Query`] to resolve every [`Date`] covered by a still-confirmed
/// [`Booking`] of an [`Offer`].
///
/// Cancelled and completed bookings contribute nothing. An unknown
/// [`Offer`] simply has no booked dates.
#[derive(Clone, Copy, Debug)]
pub struct BookedDates {
    /// ID of the [`Offer`] to resolve booked dates of.
    pub offer_id: offer::Id,
}

impl<Db, Az, Nt> Query<BookedDates> for Service<Db, Az, Nt>
where
    Db: Database<
        Select<By<Vec<Confirmed<Booking>>, offer::Id>>,
        Ok = Vec<Confirmed<Booking>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = BTreeSet<Date>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        BookedDates { offer_id }: BookedDates,
    ) -> Result<Self::Ok, Self::Err> {
        let bookings = self
            .database()
            .execute(Select(By::<Vec<Confirmed<Booking>>, _>::new(offer_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(bookings
            .iter()
            .flat_map(|Confirmed(b)| b.period.days())
            .collect())
    }
}
