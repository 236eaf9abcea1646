//! [`CalculatePrice`] definition.

use common::{
    operations::{By, Select},
    Date, DateRange, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{database, Database},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Booking;

/// [`Query`] to compute the total price of renting an [`Offer`] for a
/// period, without creating any [`Booking`].
///
/// Deterministic: every inclusive day of the period is charged the per-day
/// price, and nothing else enters the total.
#[derive(Clone, Copy, Debug)]
pub struct CalculatePrice {
    /// ID of the [`Offer`] to price.
    pub offer_id: offer::Id,

    /// First day of the period to price.
    pub start: Date,

    /// Last day of the period to price, inclusive.
    pub end: Date,
}

impl<Db, Az, Nt> Query<CalculatePrice> for Service<Db, Az, Nt>
where
    Db: Database<
        Select<By<Option<Offer>, offer::Id>>,
        Ok = Option<Offer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Money;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: CalculatePrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CalculatePrice {
            offer_id,
            start,
            end,
        } = query;

        let period = DateRange::new(start, end)
            .ok_or(E::PeriodInvalid { start, end })
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?
            .price_for(period)
            .ok_or(E::OfferNotPriced(offer_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CalculatePrice`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),

    /// [`Offer`] has no per-day price to compute a total from.
    #[display("`Offer(id: {_0})` has no per-day price")]
    OfferNotPriced(#[error(not(source))] offer::Id),

    /// Requested period ends before it starts.
    #[display("period end {end} precedes its start {start}")]
    PeriodInvalid {
        /// Requested first day.
        start: Date,

        /// Requested last day.
        end: Date,
    },
}
