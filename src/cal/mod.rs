//! Calendar values: dates, times of day, and date-times, plus the zone
//! offsets they are expressed in.

pub(crate) mod date;
pub(crate) mod datetime;
pub(crate) mod offset;
pub(crate) mod time;
#[cfg(feature = "serde")] pub(crate) mod serde;

use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc, Weekday};

use crate::instant::Instant;


/// The **date piece** trait is used for values that have date components
/// of years, months, and days.
pub trait DatePiece {

    /// The year, in absolute terms.
    /// This is in human-readable format, so the year 2014 actually has a
    /// year value of 2014, rather than 14 or 114 or anything like that.
    fn year(&self) -> i32;

    /// The month of the year.
    fn month(&self) -> Month;

    /// The day of the month, from 1 to 31.
    fn day(&self) -> u32;

    /// The day of the year, from 1 to 366.
    fn yearday(&self) -> u32;

    /// The day of the week.
    fn weekday(&self) -> Weekday;

    /// The ISO 8601 week-numbering year, and the week within it.
    fn iso_week(&self) -> (i32, u32);

    /// The year, month, and day, all at once.
    fn ymd(&self) -> (i32, Month, u32) {
        (self.year(), self.month(), self.day())
    }

    /// The number of years into the century.
    /// This is the same as the last two digits of the year.
    fn year_of_century(&self) -> i32 { self.year().rem_euclid(100) }
}


/// The **time piece** trait is used for values that have time components
/// of hours, minutes, and seconds.
pub trait TimePiece {

    /// The hour of the day.
    fn hour(&self) -> u32;

    /// The minute of the hour.
    fn minute(&self) -> u32;

    /// The second of the minute.
    fn second(&self) -> u32;

    /// The nanosecond of the second. Values of a billion or more belong to
    /// a leap second.
    fn nanosecond(&self) -> u32;

    /// The hour, minute, and second, all at once.
    fn clock(&self) -> (u32, u32, u32) {
        (self.hour(), self.minute(), self.second())
    }

    /// The millisecond of the second.
    fn millisecond(&self) -> u32 { self.nanosecond() / 1_000_000 }
}


/// The **timeline** trait gives values the set of comparisons every type in
/// this crate shares.
///
/// Values compare by the moment they stand for, so two values written in
/// different zones are equal when they name the same instant.
pub trait Timeline: Ord + Sized {

    /// Returns whether this value comes strictly after the other.
    fn after(&self, other: &Self) -> bool { self > other }

    /// Returns whether this value comes strictly before the other.
    fn before(&self, other: &Self) -> bool { self < other }

    /// Returns whether this value comes after, or is equal to, the other.
    fn after_or_equal(&self, other: &Self) -> bool { self >= other }

    /// Returns whether this value comes before, or is equal to, the other.
    fn before_or_equal(&self, other: &Self) -> bool { self <= other }

    /// Returns whether this value and the other name the same moment.
    fn equal(&self, other: &Self) -> bool { self == other }

    /// Returns whether this value lies within the exclusive range
    /// (`start`, `end`).
    fn between(&self, start: &Self, end: &Self) -> bool {
        self.after(start) && self.before(end)
    }

    /// Returns whether this value lies within the inclusive range
    /// [`start`, `end`].
    fn between_or_equal(&self, start: &Self, end: &Self) -> bool {
        self.after_or_equal(start) && self.before_or_equal(end)
    }
}


static MONTHS: &[Month] = &[
    Month::January,  Month::February,  Month::March,
    Month::April,    Month::May,       Month::June,
    Month::July,     Month::August,    Month::September,
    Month::October,  Month::November,  Month::December,
];

/// Turns a month number, from 1 to 12, as the delegate hands out, back
/// into a month.
pub(crate) fn month_from_one(month: u32) -> Month {
    MONTHS[(month as usize + 11) % 12]
}

/// Resolves a year, month, and day that may each be out of range the way a
/// wall calendar would: month 13 is January of the following year, day 0
/// is the last day of the previous month, day 32 of January is the 1st of
/// February, and so on.
///
/// Returns `None` when the result cannot be represented.
pub(crate) fn normalise_ymd(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = months.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
}


const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Midnight on the 1st of January 1970, as a wall-clock reading.
const EPOCH: NaiveDateTime = DateTime::<Utc>::UNIX_EPOCH.naive_utc();

/// Which way `round_local` moves a value that is not already a multiple of
/// the step.
#[derive(PartialEq, Debug, Copy, Clone)]
pub(crate) enum Rounding {
    Down,
    HalfUp,
}

/// Rounds an instant to a multiple of `step`, counted on its own wall
/// clock from midnight on the 1st of January 1970, so that steps that
/// divide a day line up with local midnight.
///
/// Steps of zero or less leave the instant alone. Returns `None` when the
/// result cannot be represented.
pub(crate) fn round_local(at: &Instant, step: TimeDelta, rounding: Rounding) -> Option<Instant> {
    if step <= TimeDelta::zero() {
        return Some(*at);
    }

    let step = nanos(step);
    let since = nanos(at.naive_local().signed_duration_since(EPOCH));

    let rem = since.rem_euclid(step);
    let mut rounded = since - rem;
    if rounding == Rounding::HalfUp && rem >= step - rem {
        rounded += step;
    }

    let seconds = i64::try_from(rounded.div_euclid(NANOS_PER_SECOND)).ok()?;
    let delta = TimeDelta::new(seconds, rounded.rem_euclid(NANOS_PER_SECOND) as u32)?;
    let local = EPOCH.checked_add_signed(delta)?;

    let offset: FixedOffset = *at.offset();
    offset.from_local_datetime(&local).single()
}

fn nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos())
}
