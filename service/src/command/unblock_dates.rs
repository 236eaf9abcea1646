//! [`Command`] for unblocking dates of an [`Offer`].

use common::{
    operations::{By, Delete, Select},
    Date, DateRange,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{offer, user, AvailabilityOverride, Offer},
    infra::{
        auth::{self, Authorizer, OwnsOffer},
        database, Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for releasing previously blocked dates of an [`Offer`].
///
/// Idempotent: unblocking an already-available date is a no-op, not an
/// error.
#[derive(Clone, Copy, Debug)]
pub struct UnblockDates {
    /// ID of the [`Offer`] to unblock dates of.
    pub offer_id: offer::Id,

    /// ID of the [`User`] initiating the release.
    ///
    /// Must be the provider owning the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub provider_id: user::Id,

    /// First day to unblock.
    pub start: Date,

    /// Last day to unblock, inclusive.
    pub end: Date,
}

impl<Db, Az, Nt> Command<UnblockDates> for Service<Db, Az, Nt>
where
    Db: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<AvailabilityOverride, (offer::Id, DateRange)>>,
            Err = Traced<database::Error>,
        >,
    Az: Authorizer<OwnsOffer, Ok = bool, Err = Traced<auth::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UnblockDates,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnblockDates {
            offer_id,
            provider_id,
            start,
            end,
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

        self.database()
            .execute(Delete(By::<AvailabilityOverride, _>::new((
                offer.id, period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`UnblockDates`] [`Command`] execution.
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

    /// Requested period ends before it starts.
    #[display("period end {end} precedes its start {start}")]
    PeriodInvalid {
        /// Requested first day.
        start: Date,

        /// Requested last day.
        end: Date,
    },
}
