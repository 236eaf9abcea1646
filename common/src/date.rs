//! Calendar date utilities.

use std::{fmt, str::FromStr};

/// Single calendar day, without any time-of-day component.
///
/// Booking periods and availability decisions are expressed in whole calendar
/// days, so this is the finest time granularity the domain knows about.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] representing the current calendar day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid calendar
    /// day.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .map(Self)
    }

    /// Returns the [`Date`] following this one.
    ///
    /// [`None`] is returned on the calendar upper bound.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl FromStr for Date {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or("invalid year")?;
        let month = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or("invalid month")?;
        let day = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or("invalid day")?;
        Self::from_calendar(year, month, day).ok_or("invalid `Date`")
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

/// Inclusive range of calendar days.
///
/// Both bounds are part of the range: a range starting and ending on the same
/// day covers exactly one day.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    /// First day of this [`DateRange`].
    start: Date,

    /// Last day of this [`DateRange`], inclusive.
    end: Date,
}

impl DateRange {
    /// Creates a new [`DateRange`] if `start` doesn't exceed `end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a new [`DateRange`] covering the single provided [`Date`].
    #[must_use]
    pub fn single(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the first day of this [`DateRange`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of this [`DateRange`], inclusive.
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns the number of calendar days covered by this [`DateRange`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn days_count(&self) -> u32 {
        let start = time::Date::from(self.start);
        let end = time::Date::from(self.end);
        let days = (end - start).whole_days();
        u32::try_from(days).expect("non-negative by invariant") + 1
    }

    /// Checks whether this [`DateRange`] shares at least one calendar day
    /// with the `other` one.
    ///
    /// Both bounds count: a range ending on some day does overlap with a
    /// range starting on that same day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Checks whether this [`DateRange`] covers the provided [`Date`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns an [`Iterator`] over every [`Date`] of this [`DateRange`], in
    /// calendar order.
    #[must_use]
    pub fn days(&self) -> Days {
        Days {
            cursor: Some(self.start),
            end: self.end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { start, end } = self;
        write!(f, "{start}..={end}")
    }
}

/// [`Iterator`] over the [`Date`]s of a [`DateRange`].
#[derive(Clone, Copy, Debug)]
pub struct Days {
    /// Next [`Date`] to be yielded, if any.
    cursor: Option<Date>,

    /// Last [`Date`] to be yielded, inclusive.
    end: Date,
}

impl Iterator for Days {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = (current < self.end).then(|| current.next()).flatten();
        Some(current)
    }
}
