//! [`Command`] for generating a [`Contract`] from a [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, contract, offer, Booking, Contract, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for generating the [`Contract`] of a confirmed [`Booking`].
///
/// Strictly once per [`Booking`]: a second invocation reports the already
/// existing [`Contract`] as a conflict and writes nothing. The generated
/// [`Contract`] snapshots the [`Offer`] fields as they are right now and
/// never follows later edits.
#[derive(Clone, Copy, Debug)]
pub struct GenerateContract {
    /// ID of the [`Booking`] to generate the [`Contract`] from.
    pub booking_id: booking::Id,
}

impl<Db, Az, Nt> Command<GenerateContract> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, booking::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateContract { booking_id } = cmd;

        let booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.status() == booking::Status::Cancelled {
            return Err(tracerr::new!(E::BookingCancelled(booking_id)));
        }

        let offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(booking.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(booking.offer_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent generations for the same `Booking`.
        tx.execute(Lock(By::<Booking, _>::new(booking.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Some(existing) = tx
            .execute(Select(By::<Option<Contract>, _>::new(booking.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::AlreadyGenerated {
                booking_id,
                contract_id: existing.id,
            }));
        }

        let contract = Contract {
            id: contract::Id::new(),
            booking_id: booking.id,
            lessor_id: offer.owner_id,
            lessee_id: booking.customer_id,
            offer_title: offer.title.clone(),
            offer_description: offer.description.clone(),
            offer_kind: offer.kind,
            price_per_day: offer.price_per_day,
            deposit: offer.deposit,
            period: booking.period,
            days_count: booking.days_count,
            total_price: booking.total_price,
            created_at: DateTime::now().coerce(),
            signed_by_lessor_at: None,
            signed_by_lessee_at: None,
            activated_at: None,
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`GenerateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] for the [`Booking`] already exists.
    #[display(
        "`Booking(id: {booking_id})` already has \
         `Contract(id: {contract_id})`"
    )]
    AlreadyGenerated {
        /// ID of the [`Booking`] in question.
        booking_id: booking::Id,

        /// ID of the already existing [`Contract`].
        contract_id: contract::Id,
    },

    /// [`Booking`] is cancelled, so no [`Contract`] can be generated.
    #[display("`Booking(id: {_0})` is cancelled")]
    BookingCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] of the [`Booking`] does not exist anymore.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),
}
