//! Availability read model definitions.

use std::collections::BTreeSet;

use common::{Date, DateRange, Money};

use crate::domain::{AvailabilityOverride, Booking};
#[cfg(doc)]
use crate::domain::Offer;

use super::booking::Confirmed;

/// Blocked-dates projection of a single [`Offer`].
///
/// A date is blocked when it is covered by a confirmed [`Booking`] or
/// explicitly blocked by an [`AvailabilityOverride`]; every other date is
/// available. Cancelled bookings don't contribute by construction, as only
/// [`Confirmed`] ones enter this projection.
#[derive(Clone, Debug)]
pub struct Calendar {
    /// Every blocked [`Date`], from both sources.
    blocked: BTreeSet<Date>,
}

impl Calendar {
    /// Builds a [`Calendar`] from the confirmed [`Booking`]s and
    /// [`AvailabilityOverride`]s of one [`Offer`].
    pub fn new<'a>(
        bookings: impl IntoIterator<Item = &'a Confirmed<Booking>>,
        overrides: impl IntoIterator<Item = &'a AvailabilityOverride>,
    ) -> Self {
        let blocked = bookings
            .into_iter()
            .flat_map(|Confirmed(b)| b.period.days())
            .chain(
                overrides
                    .into_iter()
                    .filter(|o| o.is_blocking())
                    .map(|o| o.date),
            )
            .collect();

        Self { blocked }
    }

    /// Returns every blocked [`Date`] within the provided period.
    #[must_use]
    pub fn blocked_within(&self, period: DateRange) -> BTreeSet<Date> {
        period.days().filter(|d| self.blocked.contains(d)).collect()
    }

    /// Returns every available [`Date`] within the provided period.
    #[must_use]
    pub fn available_within(&self, period: DateRange) -> BTreeSet<Date> {
        period
            .days()
            .filter(|d| !self.blocked.contains(d))
            .collect()
    }

    /// Checks whether every [`Date`] of the provided period is available.
    #[must_use]
    pub fn is_free(&self, period: DateRange) -> bool {
        period.days().all(|d| !self.blocked.contains(&d))
    }
}

/// Availability of an [`Offer`] over a requested period.
#[derive(Clone, Debug)]
pub struct Availability {
    /// Whether every requested date is available for booking.
    pub is_available: bool,

    /// Requested dates open for booking.
    pub available_dates: BTreeSet<Date>,

    /// Requested dates already booked or explicitly blocked.
    pub unavailable_dates: BTreeSet<Date>,

    /// Per-day price of the [`Offer`], if it has one.
    pub price_per_day: Option<Money>,
}
