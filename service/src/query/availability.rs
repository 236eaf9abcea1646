//! [`CheckAvailability`] definition.

use common::{
    operations::{By, Select},
    Date, DateRange,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{offer, AvailabilityOverride, Booking, Offer},
    infra::{database, Database},
    read::{availability::Calendar, booking::Confirmed, Availability},
    Query, Service,
};

/// [`Query`] to resolve the [`Availability`] of an [`Offer`] over a period.
///
/// Read-only composition over confirmed [`Booking`]s and
/// [`AvailabilityOverride`]s: blocked dates are a regular result, not an
/// error, so the caller can offer the customer the remaining dates.
#[derive(Clone, Copy, Debug)]
pub struct CheckAvailability {
    /// ID of the [`Offer`] to check.
    pub offer_id: offer::Id,

    /// First day of the period to check.
    pub start: Date,

    /// Last day of the period to check, inclusive.
    pub end: Date,
}

impl<Db, Az, Nt> Query<CheckAvailability> for Service<Db, Az, Nt>
where
    Db: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Confirmed<Booking>>, offer::Id>>,
            Ok = Vec<Confirmed<Booking>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<AvailabilityOverride>, (offer::Id, DateRange)>>,
            Ok = Vec<AvailabilityOverride>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Availability;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: CheckAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckAvailability {
            offer_id,
            start,
            end,
        } = query;

        let period = DateRange::new(start, end)
            .ok_or(E::PeriodInvalid { start, end })
            .map_err(tracerr::wrap!())?;

        let offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;

        let bookings = self
            .database()
            .execute(Select(By::<Vec<Confirmed<Booking>>, _>::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let overrides = self
            .database()
            .execute(Select(By::<Vec<AvailabilityOverride>, _>::new((
                offer.id, period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let calendar = Calendar::new(&bookings, &overrides);
        let unavailable_dates = calendar.blocked_within(period);

        Ok(Availability {
            is_available: unavailable_dates.is_empty(),
            available_dates: calendar.available_within(period),
            unavailable_dates,
            price_per_day: offer.price_per_day,
        })
    }
}

/// Error of [`CheckAvailability`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),

    /// Requested period ends before it starts.
    #[display("period end {end} precedes its start {start}")]
    PeriodInvalid {
        /// Requested first day.
        start: Date,

        /// Requested last day.
        end: Date,
    },
}
