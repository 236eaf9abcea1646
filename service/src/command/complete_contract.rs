//! [`Command`] for completing a [`Contract`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for completing an active [`Contract`] once its rental period
/// has passed.
///
/// Driven by an external scheduler: the engine accepts the transition and
/// guards its precondition, it never decides the moment on its own.
#[derive(Clone, Copy, Debug)]
pub struct CompleteContract {
    /// ID of the [`Contract`] to complete.
    pub contract_id: contract::Id,
}

impl<Db, Az, Nt> Command<CompleteContract> for Service<Db, Az, Nt>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteContract { contract_id } = cmd;

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
        let status = contract.status();
        if status != contract::Status::Active {
            return Err(tracerr::new!(E::NotActive {
                contract_id,
                status,
            }));
        }

        contract.completed_at = Some(DateTime::now().coerce());

        tx.execute(Update(contract.clone()))
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

/// Error of [`CompleteContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] is not active.
    #[display(
        "`Contract(id: {contract_id})` cannot be completed \
         from `{status:?}` status"
    )]
    NotActive {
        /// ID of the [`Contract`] in question.
        contract_id: contract::Id,

        /// Current status of the [`Contract`].
        status: contract::Status,
    },
}
