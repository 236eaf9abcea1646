//! [`AvailabilityOverride`] definitions.

use common::Date;

use crate::domain::{offer, Reason};
#[cfg(doc)]
use crate::domain::{Booking, Offer};

/// Provider decision about a single calendar [`Date`] of an [`Offer`].
///
/// An override with [`is_available`] set to `false` explicitly blocks the
/// date; absence of any override means the date is implicitly available
/// (subject to no overlapping [`Booking`]). Overrides are keyed by
/// `(offer_id, date)`: at most one exists per date.
///
/// [`is_available`]: AvailabilityOverride::is_available
#[derive(Clone, Debug)]
pub struct AvailabilityOverride {
    /// ID of the [`Offer`] this [`AvailabilityOverride`] applies to.
    pub offer_id: offer::Id,

    /// Calendar [`Date`] this [`AvailabilityOverride`] applies to.
    pub date: Date,

    /// Whether the [`date`] is available for booking.
    ///
    /// [`date`]: AvailabilityOverride::date
    pub is_available: bool,

    /// [`Reason`] the provider gave for the decision, if any.
    pub reason: Option<Reason>,
}

impl AvailabilityOverride {
    /// Returns whether this [`AvailabilityOverride`] blocks its [`date`].
    ///
    /// [`date`]: AvailabilityOverride::date
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        !self.is_available
    }
}
