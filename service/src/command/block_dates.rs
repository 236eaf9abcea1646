//! [`Command`] for blocking dates of an [`Offer`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Upsert},
    Date, DateRange,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking, offer, user, AvailabilityOverride, Booking, Offer, Reason,
    },
    infra::{
        auth::{self, Authorizer, OwnsOffer},
        database, Database,
    },
    read::booking::{first_overlapping, Confirmed},
    Service,
};

use super::Command;

/// [`Command`] for blocking dates of an [`Offer`] on behalf of its provider.
///
/// Refuses to block any date already covered by a confirmed [`Booking`]: a
/// provider cannot retroactively invalidate an existing reservation. The
/// check and the writes share the per-[`Offer`] lock with
/// [`CreateBooking`], so neither can slip past the other.
///
/// [`CreateBooking`]: super::CreateBooking
#[derive(Clone, Debug)]
pub struct BlockDates {
    /// ID of the [`Offer`] to block dates of.
    pub offer_id: offer::Id,

    /// ID of the [`User`] initiating the block.
    ///
    /// Must be the provider owning the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub provider_id: user::Id,

    /// First day to block.
    pub start: Date,

    /// Last day to block, inclusive.
    pub end: Date,

    /// [`Reason`] of the block, if the provider gave one.
    pub reason: Option<Reason>,
}

impl<Db, Az, Nt> Command<BlockDates> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Offer, offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Confirmed<Booking>>, offer::Id>>,
            Ok = Vec<Confirmed<Booking>>,
            Err = Traced<database::Error>,
        > + Database<
            Upsert<Vec<AvailabilityOverride>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
    Az: Authorizer<OwnsOffer, Ok = bool, Err = Traced<auth::Error>>,
{
    type Ok = Vec<AvailabilityOverride>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: BlockDates) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let BlockDates {
            offer_id,
            provider_id,
            start,
            end,
            reason,
        } = cmd;

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

        let owns = self
            .authorizer()
            .execute(OwnsOffer {
                user_id: provider_id,
                offer_id: offer.id,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !owns {
            return Err(tracerr::new!(E::NotOwner {
                user_id: provider_id,
                offer_id: offer.id,
            }));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent bookings and blocks upon the same `Offer`.
        tx.execute(Lock(By::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let bookings = tx
            .execute(Select(By::<Vec<Confirmed<Booking>>, _>::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(booked) = first_overlapping(&bookings, period, None) {
            return Err(tracerr::new!(E::PeriodBooked {
                offer_id,
                booking_id: booked.id,
            }));
        }

        let overrides = period
            .days()
            .map(|date| AvailabilityOverride {
                offer_id: offer.id,
                date,
                is_available: false,
                reason: reason.clone(),
            })
            .collect::<Vec<_>>();

        tx.execute(Upsert(overrides.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(overrides)
    }
}

/// Error of [`BlockDates`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Authorizer`] error.
    #[display("`Authorizer` operation failed: {_0}")]
    #[from]
    Auth(auth::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not the provider of the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    #[display("`User(id: {user_id})` does not own `Offer(id: {offer_id})`")]
    NotOwner {
        /// ID of the acting [`User`].
        ///
        /// [`User`]: crate::domain::user
        user_id: user::Id,

        /// ID of the [`Offer`] in question.
        offer_id: offer::Id,
    },

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),

    /// Requested period overlaps an existing confirmed [`Booking`].
    #[display(
        "period of `Offer(id: {offer_id})` overlaps confirmed \
         `Booking(id: {booking_id})`"
    )]
    PeriodBooked {
        /// ID of the [`Offer`] in question.
        offer_id: offer::Id,

        /// ID of the conflicting [`Booking`].
        booking_id: booking::Id,
    },

    /// Requested period ends before it starts.
    #[display("period end {end} precedes its start {start}")]
    PeriodInvalid {
        /// Requested first day.
        start: Date,

        /// Requested last day.
        end: Date,
    },
}
