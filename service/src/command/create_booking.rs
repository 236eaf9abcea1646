//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Perform, Select, Transact, Transacted,
    },
    Date, DateRange, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, offer, user, AvailabilityOverride, Booking, Offer},
    infra::{
        database,
        notify::{self, Notifier},
        Database,
    },
    read::{availability::Calendar, booking::Confirmed},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`] of an [`Offer`].
///
/// The overlap and override checks run inside one transaction holding the
/// per-[`Offer`] lock together with the insert, so two rival requests for
/// the same dates can never both succeed.
#[derive(Clone, Copy, Debug)]
pub struct CreateBooking {
    /// ID of the [`Offer`] to book.
    pub offer_id: offer::Id,

    /// ID of the [`User`] booking the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub customer_id: user::Id,

    /// First day of the requested period.
    pub start: Date,

    /// Last day of the requested period, inclusive.
    pub end: Date,

    /// Whether the customer accepted the rental terms.
    pub terms_accepted: bool,

    /// Whether the customer acknowledged the withdrawal policy.
    pub withdrawal_acknowledged: bool,
}

impl<Db, Az, Nt> Command<CreateBooking> for Service<Db, Az, Nt>
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
            Select<By<Vec<AvailabilityOverride>, (offer::Id, DateRange)>>,
            Ok = Vec<AvailabilityOverride>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Nt: Notifier<
        Perform<notify::Event>,
        Ok = (),
        Err = Traced<notify::Error>,
    >,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            offer_id,
            customer_id,
            start,
            end,
            terms_accepted,
            withdrawal_acknowledged,
        } = cmd;

        let period = DateRange::new(start, end)
            .ok_or(E::PeriodInvalid { start, end })
            .map_err(tracerr::wrap!())?;
        let today = Date::today();
        if start < today {
            return Err(tracerr::new!(E::PeriodInPast { start, today }));
        }
        if !terms_accepted {
            return Err(tracerr::new!(E::TermsNotAccepted));
        }
        if !withdrawal_acknowledged {
            return Err(tracerr::new!(E::WithdrawalNotAcknowledged));
        }

        let offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;
        let total_price = offer
            .price_for(period)
            .ok_or(E::OfferNotPriced(offer_id))
            .map_err(tracerr::wrap!())?;

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
        let overrides = tx
            .execute(Select(By::<Vec<AvailabilityOverride>, _>::new((
                offer.id, period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let blocked =
            Calendar::new(&bookings, &overrides).blocked_within(period);
        if !blocked.is_empty() {
            return Err(tracerr::new!(E::DatesUnavailable {
                offer_id,
                dates: blocked.into_iter().collect(),
            }));
        }

        let booking = Booking {
            id: booking::Id::new(),
            offer_id: offer.id,
            customer_id,
            period,
            days_count: period.days_count(),
            total_price,
            terms_accepted,
            withdrawal_acknowledged,
            created_at: DateTime::now().coerce(),
            confirmed_at: DateTime::now().coerce(),
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Err(e) = self
            .notifier()
            .execute(Perform(notify::Event::BookingConfirmed {
                booking_id: booking.id,
                offer_id: offer.id,
            }))
            .await
        {
            log::warn!("failed to notify about confirmed `Booking`: {e}");
        }

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Requested dates are already booked or blocked.
    ///
    /// Conflict: the customer is expected to pick another period from the
    /// reported dates.
    #[display("dates {dates:?} of `Offer(id: {offer_id})` are unavailable")]
    DatesUnavailable {
        /// ID of the requested [`Offer`].
        offer_id: offer::Id,

        /// Requested dates being unavailable.
        dates: Vec<Date>,
    },

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

    /// Requested period starts in the past.
    #[display("period start {start} is before today ({today})")]
    PeriodInPast {
        /// Requested first day.
        start: Date,

        /// Current day the request was validated against.
        today: Date,
    },

    /// Customer did not accept the rental terms.
    #[display("rental terms are not accepted")]
    TermsNotAccepted,

    /// Customer did not acknowledge the withdrawal policy.
    #[display("withdrawal policy is not acknowledged")]
    WithdrawalNotAcknowledged,
}
