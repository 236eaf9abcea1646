//! [`Command`] for completing a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for completing a [`Booking`] whose rental period has passed.
///
/// Driven by an external scheduler: the engine accepts the transition and
/// guards its precondition, it never decides the moment on its own.
#[derive(Clone, Copy, Debug)]
pub struct CompleteBooking {
    /// ID of the [`Booking`] to complete.
    pub booking_id: booking::Id,
}

impl<Db, Az, Nt> Command<CompleteBooking> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteBooking { booking_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent state changes of the same `Booking`.
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
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

        booking.completed_at = Some(DateTime::now().coerce());

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CompleteBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is already cancelled.
    #[display("`Booking(id: {_0})` is already cancelled")]
    AlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] is already completed.
    #[display("`Booking(id: {_0})` is already completed")]
    AlreadyCompleted(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
