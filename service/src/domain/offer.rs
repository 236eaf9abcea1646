//! [`Offer`] definitions.

use common::{define_kind, unit, DateRange, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::Booking;

/// Rentable item or service listed by a provider.
///
/// [`Offer`]s are edited outside this engine and enter it as read-only
/// input: nothing here ever mutates one.
#[derive(Clone, Debug)]
pub struct Offer {
    /// ID of this [`Offer`].
    pub id: Id,

    /// ID of the [`User`] providing this [`Offer`].
    ///
    /// [`User`]: crate::domain::user
    pub owner_id: user::Id,

    /// [`Title`] of this [`Offer`].
    pub title: Title,

    /// [`Description`] of this [`Offer`].
    pub description: Description,

    /// [`Kind`] of this [`Offer`].
    pub kind: Kind,

    /// Price for renting this [`Offer`] for one calendar day.
    ///
    /// A bookable [`Offer`] carries at least one of the two prices.
    pub price_per_day: Option<Money>,

    /// Price for renting this [`Offer`] for one hour.
    pub price_per_hour: Option<Money>,

    /// Deposit to be paid at the beginning of the rent, if any.
    pub deposit: Option<Money>,

    /// [`DateTime`] when this [`Offer`] was created.
    pub created_at: CreationDateTime,
}

impl Offer {
    /// Checks whether this [`Offer`] can be booked at all.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.price_per_day.is_some() || self.price_per_hour.is_some()
    }

    /// Returns the total price of renting this [`Offer`] for the provided
    /// period.
    ///
    /// Every day of the period is charged, including both bounds.
    ///
    /// [`None`] is returned if this [`Offer`] has no per-day price: hourly
    /// rates are not applicable to whole-day [`Booking`]s and are never
    /// silently converted.
    #[must_use]
    pub fn price_for(&self, period: DateRange) -> Option<Money> {
        self.price_per_day.map(|rate| rate * period.days_count())
    }
}

/// ID of an [`Offer`].
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

/// Title of an [`Offer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of an [`Offer`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Kind of an [`Offer`]."]
    enum Kind {
        #[doc = "A physical item handed over for the rental period."]
        Item = 1,

        #[doc = "A service performed by the provider."]
        Service = 2,
    }
}

/// [`DateTime`] when an [`Offer`] was created.
pub type CreationDateTime = DateTimeOf<(Offer, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateRange, Money};

    use super::{Offer, Title};

    fn money(amount: u32) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Eur,
        }
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    fn offer(
        price_per_day: Option<Money>,
        price_per_hour: Option<Money>,
    ) -> Offer {
        Offer {
            id: super::Id::new(),
            owner_id: crate::domain::user::Id::new(),
            title: Title::new("Cargo bike").unwrap(),
            description: super::Description::new("Front-loader, 100kg")
                .unwrap(),
            kind: super::Kind::Item,
            price_per_day,
            price_per_hour,
            deposit: None,
            created_at: common::DateTime::now().coerce(),
        }
    }

    #[test]
    fn charges_every_inclusive_day() {
        let offer = offer(Some(money(20)), None);

        assert_eq!(
            offer.price_for(range("2024-01-01", "2024-01-03")),
            Some(money(60)),
        );
        assert_eq!(
            offer.price_for(range("2024-01-01", "2024-01-01")),
            Some(money(20)),
        );
    }

    #[test]
    fn refuses_to_price_hourly_only_offers() {
        let offer = offer(None, Some(money(5)));

        assert!(offer.is_bookable());
        assert_eq!(offer.price_for(range("2024-01-01", "2024-01-03")), None);
    }

    #[test]
    fn unpriced_offer_is_not_bookable() {
        assert!(!offer(None, None).is_bookable());
    }

    #[test]
    fn title_validation() {
        assert!(Title::new("Ladder").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" padded ").is_none());
    }
}
