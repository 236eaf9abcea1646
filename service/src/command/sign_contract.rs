//! [`Command`] for signing a [`Contract`].

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
    domain::{contract, user, Contract},
    infra::{
        database,
        notify::{self, Notifier},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for signing a [`Contract`] as one of its parties.
///
/// Either party may sign first. Signing again as a party who already signed
/// is an idempotent no-op reporting the current [`Contract`] unchanged. The
/// resulting status is derived from which signature timestamps are set, not
/// from the signing order.
#[derive(Clone, Copy, Debug)]
pub struct SignContract {
    /// ID of the [`Contract`] to sign.
    pub contract_id: contract::Id,

    /// ID of the signing [`User`].
    ///
    /// Must be the lessor or the lessee recorded on the [`Contract`].
    ///
    /// [`User`]: crate::domain::user
    pub user_id: user::Id,
}

impl<Db, Az, Nt> Command<SignContract> for Service<Db, Az, Nt>
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
        cmd: SignContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignContract {
            contract_id,
            user_id,
        } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        let party = contract
            .party_of(user_id)
            .ok_or(E::NotParty {
                user_id,
                contract_id,
            })
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent signings of the same `Contract`.
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
            contract::Status::Cancelled => {
                return Err(tracerr::new!(E::AlreadyCancelled(contract_id)));
            }
            contract::Status::Completed => {
                return Err(tracerr::new!(E::AlreadyCompleted(contract_id)));
            }
            contract::Status::Draft
            | contract::Status::PartiallySigned
            | contract::Status::FullySigned
            | contract::Status::Active => {}
        }

        if contract.signed_at(party).is_some() {
            // Re-signing by the same party changes nothing.
            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            return Ok(contract);
        }

        *contract.signed_at_mut(party) = Some(DateTime::now().coerce());

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if contract.status() == contract::Status::FullySigned {
            if let Err(e) = self
                .notifier()
                .execute(Perform(notify::Event::ContractSigned {
                    contract_id: contract.id,
                }))
                .await
            {
                log::warn!(
                    "failed to notify about fully signed `Contract`: {e}",
                );
            }
        }

        Ok(contract)
    }
}

/// Error of [`SignContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] is already cancelled.
    #[display("`Contract(id: {_0})` is already cancelled")]
    AlreadyCancelled(#[error(not(source))] contract::Id),

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
