//! [`User`] identity references.
//!
//! Identity and authentication live outside this engine, so the only thing
//! it knows about a platform user is the [`Id`] other systems hand it:
//! customers placing bookings, providers owning offers, and the lessor and
//! lessee parties recorded on a rental contract.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ID of a platform user.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
