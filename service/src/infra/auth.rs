//! Authorization collaborator definitions.
//!
//! Listing ownership lives in the marketplace's listing system, outside this
//! engine, so commands acting on behalf of a provider ask an [`Authorizer`]
//! instead of trusting the caller.

use std::{collections::HashMap, sync::Arc};

use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::domain::{offer, user};
#[cfg(doc)]
use crate::domain::Offer;

/// Authorization collaborator of the engine.
pub use common::Handler as Authorizer;

/// Operation asking whether the [`User`] owns the [`Offer`].
///
/// [`User`]: crate::domain::user
#[derive(Clone, Copy, Debug)]
pub struct OwnsOffer {
    /// ID of the acting [`User`].
    ///
    /// [`User`]: crate::domain::user
    pub user_id: user::Id,

    /// ID of the [`Offer`] in question.
    pub offer_id: offer::Id,
}

/// [`Authorizer`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// The authorization collaborator cannot be reached.
    #[display("authorization collaborator is unreachable")]
    Unreachable,
}

/// In-memory [`Authorizer`] backed by an explicit ownership registry.
#[derive(Clone, Debug, Default)]
pub struct OwnerRegistry {
    /// Registered owner of each [`Offer`].
    owners: Arc<RwLock<HashMap<offer::Id, user::Id>>>,
}

impl OwnerRegistry {
    /// Creates a new empty [`OwnerRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provided [`User`] as the owner of the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub async fn grant(&self, offer_id: offer::Id, user_id: user::Id) {
        let _ = self.owners.write().await.insert(offer_id, user_id);
    }
}

impl Authorizer<OwnsOffer> for OwnerRegistry {
    type Ok = bool;
    type Err = Traced<Error>;

    async fn execute(&self, op: OwnsOffer) -> Result<Self::Ok, Self::Err> {
        Ok(self.owners.read().await.get(&op.offer_id)
            == Some(&op.user_id))
    }
}
