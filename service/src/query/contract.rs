//! [`Query`] collection related to a single [`Contract`].

use common::operations::By;

use crate::domain::{booking, contract, Contract};
#[cfg(doc)]
use crate::domain::Booking;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;

/// Queries a [`Contract`] by the [`booking::Id`] of its source [`Booking`].
///
/// At most one [`Contract`] exists per [`Booking`].
pub type ByBookingId = DatabaseQuery<By<Option<Contract>, booking::Id>>;
