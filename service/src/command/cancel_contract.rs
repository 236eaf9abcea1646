//! [`Command`] for cancelling a [`Contract`].

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
    domain::{contract, user, Contract, Reason},
    infra::{
        database,
        notify::{self, Notifier},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Contract`] as one of its parties.
///
/// Possible from any state except a completed one. Cancelling an already
/// cancelled [`Contract`] is an idempotent no-op. Cancelling a [`Contract`]
/// does not touch the underlying [`Booking`]: callers needing both perform
/// [`CancelBooking`] separately.
///
/// [`Booking`]: crate::domain::Booking
/// [`CancelBooking`]: super::CancelBooking
#[derive(Clone, Debug)]
pub struct CancelContract {
    /// ID of the [`Contract`] to cancel.
    pub contract_id: contract::Id,

    /// ID of the [`User`] initiating the cancellation.
    ///
    /// Must be the lessor or the lessee recorded on the [`Contract`].
    ///
    /// [`User`]: crate::domain::user
    pub user_id: user::Id,

    /// [`Reason`] of the cancellation.
    pub reason: Reason,
}

impl<Db, Az, Nt> Command<CancelContract> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Nt: Notifier<
        Perform<notify::Event>,
        Ok = (),
        Err = Traced<notify::Error>,
    >,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelContract {
            contract_id,
            user_id,
            reason,
        } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if contract.party_of(user_id).is_none() {
            return Err(tracerr::new!(E::NotParty {
                user_id,
                contract_id,
            }));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent state changes of the same `Contract`.
        tx.execute(Lock(By::<Contract, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        match contract.status() {
            contract::Status::Completed => {
                return Err(tracerr::new!(E::AlreadyCompleted(contract_id)));
            }
            contract::Status::Cancelled => {
                // Already cancelled, nothing left to do.
                tx.execute(Commit)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                return Ok(contract);
            }
            contract::Status::Draft
            | contract::Status::PartiallySigned
            | contract::Status::FullySigned
            | contract::Status::Active => {}
        }

        contract.cancelled_at = Some(DateTime::now().coerce());
        contract.cancellation_reason = Some(reason);

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Err(e) = self
            .notifier()
            .execute(Perform(notify::Event::ContractCancelled {
                contract_id: contract.id,
            }))
            .await
        {
            log::warn!("failed to notify about cancelled `Contract`: {e}");
        }

        Ok(contract)
    }
}

/// Error of [`CancelContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] is already completed.
    #[display("`Contract(id: {_0})` is already completed")]
    AlreadyCompleted(#[error(not(source))] contract::Id),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is neither the lessor nor the lessee of the [`Contract`].
    ///
    /// [`User`]: crate::domain::user
    #[display(
        "`User(id: {user_id})` is not a party of \
         `Contract(id: {contract_id})`"
    )]
    NotParty {
        /// ID of the acting [`User`].
        ///
        /// [`User`]: crate::domain::user
        user_id: user::Id,

        /// ID of the [`Contract`] in question.
        contract_id: contract::Id,
    },
}
