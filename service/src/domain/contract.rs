//! [`Contract`] definitions.

use common::{unit, DateRange, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

use crate::domain::{booking, offer, user, Reason};
#[cfg(doc)]
use crate::domain::{Booking, Offer};

/// Rental contract generated once per confirmed [`Booking`].
///
/// All the [`Offer`]-derived fields are a snapshot taken at generation time:
/// later edits of the source [`Offer`] never reach an existing [`Contract`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the source [`Booking`].
    ///
    /// Unique: a [`Booking`] has at most one [`Contract`], ever.
    pub booking_id: booking::Id,

    /// ID of the [`User`] providing the rented [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub lessor_id: user::Id,

    /// ID of the [`User`] renting the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub lessee_id: user::Id,

    /// [`offer::Title`] of the rented [`Offer`] at generation time.
    pub offer_title: offer::Title,

    /// [`offer::Description`] of the rented [`Offer`] at generation time.
    pub offer_description: offer::Description,

    /// [`offer::Kind`] of the rented [`Offer`].
    pub offer_kind: offer::Kind,

    /// Per-day price of the rented [`Offer`] at generation time.
    pub price_per_day: Option<Money>,

    /// Deposit of the rented [`Offer`] at generation time, if any.
    pub deposit: Option<Money>,

    /// Rented period, both bounds inclusive.
    pub period: DateRange,

    /// Number of calendar days covered by the [`period`].
    ///
    /// [`period`]: Contract::period
    pub days_count: u32,

    /// Total price of the rent for the whole [`period`].
    ///
    /// [`period`]: Contract::period
    pub total_price: Money,

    /// [`DateTime`] when this [`Contract`] was generated.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when the lessor signed this [`Contract`], if they did.
    pub signed_by_lessor_at: Option<SignatureDateTime>,

    /// [`DateTime`] when the lessee signed this [`Contract`], if they did.
    pub signed_by_lessee_at: Option<SignatureDateTime>,

    /// [`DateTime`] when this [`Contract`] became active, if it did.
    pub activated_at: Option<ActivationDateTime>,

    /// [`DateTime`] when this [`Contract`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when this [`Contract`] was cancelled, if it was.
    pub cancelled_at: Option<CancellationDateTime>,

    /// [`Reason`] of the cancellation, if any was provided.
    pub cancellation_reason: Option<Reason>,
}

impl Contract {
    /// Returns [`Status`] of this [`Contract`].
    ///
    /// The status is a pure function of the lifecycle timestamps, so no
    /// invalid combination of a stored status and signatures can exist, and
    /// it can only move forward as timestamps are only ever set, never
    /// cleared. Either party may sign first: a single signature of either
    /// kind is [`Status::PartiallySigned`].
    #[must_use]
    pub fn status(&self) -> Status {
        use Status as S;

        if self.cancelled_at.is_some() {
            return S::Cancelled;
        }
        if self.completed_at.is_some() {
            return S::Completed;
        }
        if self.activated_at.is_some() {
            return S::Active;
        }

        match (self.signed_by_lessor_at, self.signed_by_lessee_at) {
            (Some(_), Some(_)) => S::FullySigned,
            (Some(_), None) | (None, Some(_)) => S::PartiallySigned,
            (None, None) => S::Draft,
        }
    }

    /// Returns which [`Party`] the provided [`user::Id`] is on this
    /// [`Contract`].
    ///
    /// [`None`] is returned for a [`User`] being neither the lessor nor the
    /// lessee.
    ///
    /// [`User`]: crate::domain::user
    #[must_use]
    pub fn party_of(&self, user_id: user::Id) -> Option<Party> {
        if user_id == self.lessor_id {
            Some(Party::Lessor)
        } else if user_id == self.lessee_id {
            Some(Party::Lessee)
        } else {
            None
        }
    }

    /// Returns [`DateTime`] when the provided [`Party`] signed this
    /// [`Contract`], if they did.
    #[must_use]
    pub fn signed_at(&self, party: Party) -> Option<SignatureDateTime> {
        match party {
            Party::Lessor => self.signed_by_lessor_at,
            Party::Lessee => self.signed_by_lessee_at,
        }
    }

    /// Returns [`DateTime`] when the provided [`Party`] signed this
    /// [`Contract`], if they did.
    #[must_use]
    pub fn signed_at_mut(
        &mut self,
        party: Party,
    ) -> &mut Option<SignatureDateTime> {
        match party {
            Party::Lessor => &mut self.signed_by_lessor_at,
            Party::Lessee => &mut self.signed_by_lessee_at,
        }
    }
}

/// ID of a [`Contract`].
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

/// Role of a [`User`] on a [`Contract`].
///
/// [`User`]: crate::domain::user
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    /// The [`User`] providing the rented [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    Lessor,

    /// The [`User`] renting the [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    Lessee,
}

/// Status of a [`Contract`].
///
/// Derived from lifecycle timestamps via [`Contract::status()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Status {
    /// Generated, not signed by anyone yet.
    Draft = 1,

    /// Signed by exactly one [`Party`], in either order.
    PartiallySigned = 2,

    /// Signed by both parties.
    FullySigned = 3,

    /// The rental period has started.
    Active = 4,

    /// The rental period has passed.
    Completed = 5,

    /// The [`Contract`] was cancelled.
    Cancelled = 6,
}

/// Marker type indicating a [`Contract`] signature.
#[derive(Clone, Copy, Debug)]
pub struct Signature;

/// Marker type indicating a [`Contract`] activation.
#[derive(Clone, Copy, Debug)]
pub struct Activation;

/// [`DateTime`] when a [`Contract`] was generated.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was signed by one of its parties.
pub type SignatureDateTime = DateTimeOf<(Contract, Signature)>;

/// [`DateTime`] when a [`Contract`] became active.
pub type ActivationDateTime = DateTimeOf<(Contract, Activation)>;

/// [`DateTime`] when a [`Contract`] was completed.
pub type CompletionDateTime = DateTimeOf<(Contract, unit::Completion)>;

/// [`DateTime`] when a [`Contract`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Contract, unit::Cancellation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateRange, DateTime, Money};

    use crate::domain::{booking, offer, user};

    use super::{Contract, Party, Status};

    fn contract() -> Contract {
        let period = DateRange::new(
            "2024-06-01".parse().unwrap(),
            "2024-06-05".parse().unwrap(),
        )
        .unwrap();

        Contract {
            id: super::Id::new(),
            booking_id: booking::Id::new(),
            lessor_id: user::Id::new(),
            lessee_id: user::Id::new(),
            offer_title: offer::Title::new("Cargo bike").unwrap(),
            offer_description: offer::Description::new("Front-loader")
                .unwrap(),
            offer_kind: offer::Kind::Item,
            price_per_day: Some(Money {
                amount: 15.into(),
                currency: Currency::Eur,
            }),
            deposit: None,
            period,
            days_count: period.days_count(),
            total_price: Money {
                amount: 75.into(),
                currency: Currency::Eur,
            },
            created_at: DateTime::now().coerce(),
            signed_by_lessor_at: None,
            signed_by_lessee_at: None,
            activated_at: None,
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn advances_with_signatures_in_either_order() {
        let mut c = contract();
        assert_eq!(c.status(), Status::Draft);

        c.signed_by_lessor_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::PartiallySigned);
        c.signed_by_lessee_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::FullySigned);

        let mut c = contract();
        c.signed_by_lessee_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::PartiallySigned);
        c.signed_by_lessor_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::FullySigned);
    }

    #[test]
    fn activation_and_completion() {
        let mut c = contract();
        c.signed_by_lessor_at = Some(DateTime::now().coerce());
        c.signed_by_lessee_at = Some(DateTime::now().coerce());

        c.activated_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::Active);

        c.completed_at = Some(DateTime::now().coerce());
        assert_eq!(c.status(), Status::Completed);
    }

    #[test]
    fn cancellation_wins_over_everything_else() {
        let mut c = contract();
        c.signed_by_lessor_at = Some(DateTime::now().coerce());
        c.activated_at = Some(DateTime::now().coerce());
        c.cancelled_at = Some(DateTime::now().coerce());

        assert_eq!(c.status(), Status::Cancelled);
    }

    #[test]
    fn resolves_parties_by_id() {
        let c = contract();

        assert_eq!(c.party_of(c.lessor_id), Some(Party::Lessor));
        assert_eq!(c.party_of(c.lessee_id), Some(Party::Lessee));
        assert_eq!(c.party_of(user::Id::new()), None);
    }
}
