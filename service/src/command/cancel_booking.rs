//! [`Command`] for cancelling a [`Booking`].

use common::{
    operations::{
        By, Commit, Lock, Perform, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, offer, user, Booking, Offer, Reason},
    infra::{
        auth::{self, Authorizer, OwnsOffer},
        database,
        notify::{self, Notifier},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Booking`] on behalf of the [`Offer`]'s
/// provider.
///
/// A cancelled [`Booking`] stops blocking its period immediately: no
/// [`AvailabilityOverride`] is written, cancelled bookings are simply
/// excluded from every availability projection.
///
/// [`AvailabilityOverride`]: crate::domain::AvailabilityOverride
#[derive(Clone, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to cancel.
    pub booking_id: booking::Id,

    /// ID of the [`User`] initiating the cancellation.
    ///
    /// Must be the provider owning the booked [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub provider_id: user::Id,

    /// [`Reason`] of the cancellation, if the provider gave one.
    pub reason: Option<Reason>,
}

impl<Db, Az, Nt> Command<CancelBooking> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Offer, offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Az: Authorizer<OwnsOffer, Ok = bool, Err = Traced<auth::Error>>,
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
        cmd: CancelBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking {
            booking_id,
            provider_id,
            reason,
        } = cmd;

        let booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let owns = self
            .authorizer()
            .execute(OwnsOffer {
                user_id: provider_id,
                offer_id: booking.offer_id,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !owns {
            return Err(tracerr::new!(E::NotOwner {
                user_id: provider_id,
                offer_id: booking.offer_id,
            }));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Offer`.
        tx.execute(Lock(By::<Offer, _>::new(booking.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Avoid concurrent cancellations.
        tx.execute(Lock(By::<Booking, _>::new(booking.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        match booking.status() {
            booking::Status::Cancelled => {
                return Err(tracerr::new!(E::AlreadyCancelled(booking_id)));
            }
            booking::Status::Completed => {
                return Err(tracerr::new!(E::AlreadyCompleted(booking_id)));
            }
            booking::Status::Confirmed => {}
        }

        booking.cancelled_at = Some(DateTime::now().coerce());
        booking.cancellation_reason = reason;

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Err(e) = self
            .notifier()
            .execute(Perform(notify::Event::BookingCancelled {
                booking_id: booking.id,
                offer_id: booking.offer_id,
            }))
            .await
        {
            log::warn!("failed to notify about cancelled `Booking`: {e}");
        }

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is already cancelled.
    #[display("`Booking(id: {_0})` is already cancelled")]
    AlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] is already completed.
    #[display("`Booking(id: {_0})` is already completed")]
    AlreadyCompleted(#[error(not(source))] booking::Id),

    /// [`Authorizer`] error.
    #[display("`Authorizer` operation failed: {_0}")]
    #[from]
    Auth(auth::Error),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

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
}
