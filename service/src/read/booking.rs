//! [`Booking`] read model definition.

use common::DateRange;

use crate::domain::{booking, Booking};

/// Wrapper around [`Booking`] indicating that it [`is_confirmed()`].
///
/// [`is_confirmed()`]: Booking::is_confirmed
#[derive(Clone, Debug)]
pub struct Confirmed<T>(pub T);

/// Returns the first of the provided confirmed [`Booking`]s whose period
/// overlaps the given one, skipping the `exclude`d [`Booking`], if any.
///
/// Excluding a [`booking::Id`] supports cancel-and-recreate flows without
/// the replaced [`Booking`] conflicting with its own dates.
pub fn first_overlapping<'a>(
    bookings: impl IntoIterator<Item = &'a Confirmed<Booking>>,
    period: DateRange,
    exclude: Option<booking::Id>,
) -> Option<&'a Booking> {
    bookings
        .into_iter()
        .map(|Confirmed(b)| b)
        .filter(|b| exclude != Some(b.id))
        .find(|b| b.period.overlaps(&period))
}
