//! Domain definitions.

pub mod availability;
pub mod booking;
pub mod contract;
pub mod offer;
pub mod user;

use std::str::FromStr;

use derive_more::{AsRef, Display};

pub use self::{
    availability::AvailabilityOverride, booking::Booking, contract::Contract,
    offer::Offer,
};

/// Free-form human-provided reason accompanying a blocking or cancellation
/// decision.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`Reason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Checks whether the given `reason` is a valid [`Reason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 512
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}
