//! [`Booking`] definitions.

use common::{unit, DateRange, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

use crate::domain::{offer, user, Reason};
#[cfg(doc)]
use crate::domain::Offer;

/// Confirmed reservation of an [`Offer`] for a [`DateRange`] by a customer.
///
/// Mutated exclusively through the engine's commands: once created, the only
/// state changes a [`Booking`] ever sees are cancellation and completion.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Offer`].
    pub offer_id: offer::Id,

    /// ID of the [`User`] who booked the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub customer_id: user::Id,

    /// Rented period, both bounds inclusive.
    pub period: DateRange,

    /// Number of calendar days covered by the [`period`].
    ///
    /// Derived from the [`period`] and cached on creation.
    ///
    /// [`period`]: Booking::period
    pub days_count: u32,

    /// Total price of this [`Booking`] for the whole [`period`].
    ///
    /// [`period`]: Booking::period
    pub total_price: Money,

    /// Whether the customer accepted the rental terms.
    pub terms_accepted: bool,

    /// Whether the customer acknowledged the withdrawal policy.
    pub withdrawal_acknowledged: bool,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was confirmed.
    pub confirmed_at: ConfirmationDateTime,

    /// [`DateTime`] when this [`Booking`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when this [`Booking`] was cancelled, if it was.
    pub cancelled_at: Option<CancellationDateTime>,

    /// [`Reason`] of the cancellation, if any was provided.
    pub cancellation_reason: Option<Reason>,
}

impl Booking {
    /// Returns [`Status`] of this [`Booking`].
    ///
    /// The status is derived from the lifecycle timestamps and is never
    /// stored on its own: a set [`cancelled_at`] always wins over a set
    /// [`completed_at`].
    ///
    /// [`cancelled_at`]: Booking::cancelled_at
    /// [`completed_at`]: Booking::completed_at
    #[must_use]
    pub fn status(&self) -> Status {
        use Status as S;

        if self.cancelled_at.is_some() {
            return S::Cancelled;
        }
        if self.completed_at.is_some() {
            return S::Completed;
        }

        S::Confirmed
    }

    /// Returns whether this [`Booking`] is still confirmed, meaning its
    /// [`period`] keeps blocking the booked [`Offer`].
    ///
    /// [`period`]: Booking::period
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status() == Status::Confirmed
    }
}

/// ID of a [`Booking`].
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

/// Status of a [`Booking`].
///
/// Derived from lifecycle timestamps via [`Booking::status()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Status {
    /// The [`Booking`] is confirmed and blocks its period.
    Confirmed = 1,

    /// The rental period has passed.
    Completed = 2,

    /// The [`Booking`] was cancelled and no longer blocks any date.
    Cancelled = 3,
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was confirmed.
pub type ConfirmationDateTime = DateTimeOf<(Booking, unit::Confirmation)>;

/// [`DateTime`] when a [`Booking`] was completed.
pub type CompletionDateTime = DateTimeOf<(Booking, unit::Completion)>;

/// [`DateTime`] when a [`Booking`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Booking, unit::Cancellation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateRange, DateTime, Money};

    use crate::domain::{offer, user};

    use super::{Booking, Status};

    fn booking() -> Booking {
        let period = DateRange::new(
            "2024-06-01".parse().unwrap(),
            "2024-06-05".parse().unwrap(),
        )
        .unwrap();

        Booking {
            id: super::Id::new(),
            offer_id: offer::Id::new(),
            customer_id: user::Id::new(),
            period,
            days_count: period.days_count(),
            total_price: Money {
                amount: 75.into(),
                currency: Currency::Eur,
            },
            terms_accepted: true,
            withdrawal_acknowledged: true,
            created_at: DateTime::now().coerce(),
            confirmed_at: DateTime::now().coerce(),
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn derives_status_from_timestamps() {
        let mut b = booking();
        assert_eq!(b.status(), Status::Confirmed);
        assert!(b.is_confirmed());

        b.completed_at = Some(DateTime::now().coerce());
        assert_eq!(b.status(), Status::Completed);
        assert!(!b.is_confirmed());
    }

    #[test]
    fn cancellation_wins_over_completion() {
        let mut b = booking();
        b.completed_at = Some(DateTime::now().coerce());
        b.cancelled_at = Some(DateTime::now().coerce());

        assert_eq!(b.status(), Status::Cancelled);
    }
}
