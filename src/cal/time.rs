//! Times of day with no calendar date.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::format::StrftimeItems;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike};

use crate::cal::offset::Offset;
use crate::cal::{round_local, Rounding, TimePiece, Timeline};
use crate::error::{Error, Kind};
use crate::instant::{self, Instant};
use crate::layout::{self, SqlFraction, SqlOffset, CLOCK_ITEMS, TIME_ITEMS, TIME_SHAPE, TIME_SQL_PARSE, TIME_SQL_SHAPE};
use crate::sql::{self, SqlValue};


const KIND: Kind = Kind::Time;

/// The date every time of day is pinned to: the 1st of January, year 0.
const REFERENCE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(0, 1, 1) {
    Some(date) => date,
    None       => panic!("year 0 is representable"),
};


/// A **time of day** is a clock reading in a zone, without a calendar
/// date.
///
/// Internally it is an instant whose local date is always the 1st of
/// January, year 0. Values compare by that instant, so two readings in
/// different zones are equal when they name the same moment on the pinned
/// date.
///
/// Changing the zone with `in_zone`, `local`, or `utc` converts the clock
/// reading to the new zone, then pins it again. A reading moved past
/// midnight is no longer equal to the one it came from: 23:00 UTC becomes
/// 01:00+02:00 on the pinned date, which is two hours earlier.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct TimeOfDay {
    at: Instant,
}

impl TimeOfDay {

    /// Creates a new time of day from its clock fields and a zone.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, TimePiece, Offset};
    ///
    /// let time = TimeOfDay::new(3, 4, 5, 0, Offset::utc()).unwrap();
    /// assert_eq!(time.clock(), (3, 4, 5));
    /// assert_eq!(time.to_string(), "03:04:05Z");
    ///
    /// assert!(TimeOfDay::new(24, 0, 0, 0, Offset::utc()).is_err());
    /// ```
    pub fn new(hour: u32, minute: u32, second: u32, nanos: u32, zone: Offset) -> Result<Self, Error> {
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .map(|clock| Self::pinned(clock, zone.fixed()))
            .ok_or(Error::out_of_range(KIND))
    }

    /// The current time of day, at full precision, in the local zone.
    pub fn now() -> Self {
        Self::from_instant(&instant::now())
    }

    /// Takes the clock reading and zone out of any moment, and discards
    /// its date. The zone is kept to the minute.
    pub fn from_instant<Tz: TimeZone>(when: &DateTime<Tz>) -> Self {
        let when = instant::minute_aligned(when.fixed_offset());
        Self::pinned(when.time(), *when.offset())
    }

    /// The UTC time of day of the given number of seconds and nanoseconds
    /// since the Unix epoch.
    pub fn from_unix(seconds: i64, nanos: u32) -> Result<Self, Error> {
        DateTime::from_timestamp(seconds, nanos)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    pub fn from_unix_millis(millis: i64) -> Result<Self, Error> {
        DateTime::from_timestamp_millis(millis)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    pub fn from_unix_micros(micros: i64) -> Result<Self, Error> {
        DateTime::from_timestamp_micros(micros)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    /// Parses a time of day in the canonical `HH:MM:SS±HH:MM` layout, with
    /// `Z` standing for UTC and an optional fraction of a second after the
    /// seconds. The zone is the one written in the input.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, TimePiece};
    ///
    /// let time = TimeOfDay::parse("03:04:05.5+01:00").unwrap();
    /// assert_eq!(time.clock(), (3, 4, 5));
    /// assert_eq!(time.millisecond(), 500);
    /// assert_eq!(time.offset().hours(), 1);
    /// ```
    pub fn parse(input: &str) -> Result<Self, Error> {
        TIME_SHAPE.check(KIND, input)?;
        let parsed = layout::parse(KIND, input, TIME_ITEMS.iter())?;
        Self::from_parsed(input, &parsed, None)
    }

    /// Parses a time of day in the canonical layout, then converts its
    /// clock reading to the given zone.
    pub fn parse_in(input: &str, zone: Offset) -> Result<Self, Error> {
        Ok(Self::parse(input)?.in_zone(zone))
    }

    /// Parses a time of day using a `strftime`-style layout. When the layout
    /// has no offset, the time is taken to be in UTC.
    pub fn parse_with_layout(layout: &str, input: &str) -> Result<Self, Error> {
        Self::parse_with_layout_in(layout, input, Offset::utc())
    }

    /// Parses a time of day using a `strftime`-style layout. When the layout
    /// has no offset, the time is taken to be in the given zone.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, TimePiece, Offset};
    ///
    /// let zone = Offset::of_hours_and_minutes(-7, 0).unwrap();
    /// let time = TimeOfDay::parse_with_layout_in("%I:%M %p", "03:04 PM", zone).unwrap();
    /// assert_eq!(time.clock(), (15, 4, 0));
    /// assert_eq!(time.offset(), zone);
    /// ```
    pub fn parse_with_layout_in(layout: &str, input: &str, zone: Offset) -> Result<Self, Error> {
        let items = layout::compile(layout)?;
        let parsed = layout::parse(KIND, input, items.iter())?;
        Self::from_parsed(input, &parsed, Some(zone.fixed()))
    }

    fn from_parsed(input: &str, parsed: &chrono::format::Parsed, zone: Option<FixedOffset>) -> Result<Self, Error> {
        let clock = layout::resolve(KIND, input, parsed.to_naive_time())?;
        let offset = layout::parsed_offset(KIND, parsed)?
            .or(zone)
            .ok_or(Error::out_of_range(KIND))?;

        Ok(Self::pinned(clock, offset))
    }

    /// Builds the value for a local clock reading on the pinned date.
    fn pinned(clock: NaiveTime, offset: FixedOffset) -> Self {
        // Offsets are under a day, well inside the range around year 0.
        let utc = REFERENCE_DATE.and_time(clock) - offset;
        Self { at: DateTime::from_naive_utc_and_offset(utc, offset) }
    }

    /// Adds a duration, which may be negative, to the clock reading. The
    /// result wraps around midnight.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, TimePiece, Offset, TimeDelta};
    ///
    /// let time = TimeOfDay::new(23, 30, 0, 0, Offset::utc()).unwrap();
    /// let later = time.add(TimeDelta::hours(1));
    /// assert_eq!(later.clock(), (0, 30, 0));
    /// ```
    pub fn add(&self, duration: TimeDelta) -> Self {
        let (clock, _) = self.at.time().overflowing_add_signed(duration);
        Self::pinned(clock, *self.at.offset())
    }

    /// The duration from the other time of day to this one.
    pub fn sub(&self, other: &Self) -> TimeDelta {
        self.at.signed_duration_since(other.at)
    }

    /// Rounds the clock reading to the nearest multiple of the given
    /// duration, with halves rounding up. Rounding past the last multiple
    /// of the day wraps around to midnight.
    ///
    /// A duration of zero or less returns the value unchanged.
    pub fn round(&self, duration: TimeDelta) -> Self {
        self.rounded(duration, Rounding::HalfUp)
    }

    /// Rounds the clock reading down to a multiple of the given duration.
    ///
    /// A duration of zero or less returns the value unchanged.
    pub fn truncate(&self, duration: TimeDelta) -> Self {
        self.rounded(duration, Rounding::Down)
    }

    fn rounded(&self, duration: TimeDelta, rounding: Rounding) -> Self {
        match round_local(&self.to_instant(), duration, rounding) {
            Some(rounded) => Self::from_instant(&rounded),
            None          => *self,
        }
    }

    /// The clock reading in another zone, on the pinned date.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, TimePiece, Offset};
    ///
    /// let zone = Offset::of_hours_and_minutes(2, 0).unwrap();
    /// let time = TimeOfDay::new(23, 0, 0, 0, Offset::utc()).unwrap().in_zone(zone);
    /// assert_eq!(time.clock(), (1, 0, 0));
    /// assert_eq!(TimeOfDay::parse("01:00:00+02:00").unwrap(), time);
    /// ```
    pub fn in_zone(&self, zone: Offset) -> Self {
        Self::from_instant(&self.at.with_timezone(&zone.fixed()))
    }

    /// The clock reading in the local zone, on the pinned date.
    pub fn local(&self) -> Self {
        self.in_zone(Offset::local_at(&self.at))
    }

    /// The clock reading in UTC, on the pinned date.
    pub fn utc(&self) -> Self {
        self.in_zone(Offset::utc())
    }

    /// The zone this time of day is written in.
    pub fn offset(&self) -> Offset {
        Offset::from(*self.at.offset())
    }

    /// Whether this is the zero value, midnight UTC.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// This clock reading on the 1st of January, year 0, in its own zone.
    pub fn to_instant(&self) -> Instant {
        self.at
    }

    /// Prints this time of day with a `strftime`-style layout. Calendar
    /// specifiers print the 1st of January, year 0.
    pub fn format(&self, layout: &str) -> Result<String, Error> {
        let mut buf = String::new();
        self.append_format(&mut buf, layout)?;
        Ok(buf)
    }

    pub fn append_format(&self, buf: &mut String, layout: &str) -> Result<(), Error> {
        layout::append(&self.to_instant(), layout, buf)
    }
}


// Binary encoding, which is the instant encoding of the pinned moment.
impl TimeOfDay {

    pub fn to_binary(&self) -> Vec<u8> {
        instant::encode(&self.at)
    }

    /// Decodes a time of day from its binary form. An encoded moment off
    /// the pinned date keeps its clock reading and zone.
    pub fn from_binary(data: &[u8]) -> Result<Self, Error> {
        instant::decode(KIND, data)
            .map(|at| Self::from_instant(&at))
            .map_err(Error::logged)
    }

    /// Overwrites this time of day with one decoded from its binary form.
    /// On failure the value is left as it was.
    pub fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        *self = Self::from_binary(data)?;
        Ok(())
    }
}


// Text encoding
impl TimeOfDay {

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn from_text(text: &str) -> Result<Self, Error> {
        Self::parse(text).map_err(Error::logged)
    }

    /// Overwrites this time of day with one decoded from its canonical
    /// text. On failure the value is left as it was.
    pub fn unmarshal_text(&mut self, text: &str) -> Result<(), Error> {
        *self = Self::from_text(text)?;
        Ok(())
    }
}


// SQL values
impl TimeOfDay {

    /// The value to hand a SQL driver: the time in the `HH:MM:SS.ffffff±HH`
    /// layout, with the fraction only present when there is one, and the
    /// minutes of the offset only present when there are some.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{TimeOfDay, Offset, SqlValue};
    ///
    /// let time = TimeOfDay::new(3, 4, 5, 0, Offset::utc()).unwrap();
    /// assert_eq!(time.to_sql(), SqlValue::Text("03:04:05+00".into()));
    /// ```
    pub fn to_sql(&self) -> SqlValue {
        let text = format!("{}{}{}",
            self.at.format_with_items(CLOCK_ITEMS.iter()),
            SqlFraction(self.at.nanosecond()),
            SqlOffset(*self.at.offset()));

        SqlValue::Text(text)
    }

    pub fn from_sql(value: &SqlValue) -> Result<Self, Error> {
        Self::scanned(value).map_err(Error::logged)
    }

    /// Overwrites this time of day with one read from a SQL column value:
    ///
    /// - integers and floats are Unix seconds, whose clock reading is
    ///   taken in UTC;
    /// - text and bytes are parsed with the SQL time layout;
    /// - timestamps give their clock reading, in their own zone;
    /// - NULL resets the value to midnight UTC.
    ///
    /// Anything else is an error, and leaves the value as it was.
    pub fn scan(&mut self, value: &SqlValue) -> Result<(), Error> {
        *self = Self::from_sql(value)?;
        Ok(())
    }

    fn scanned(value: &SqlValue) -> Result<Self, Error> {
        match *value {
            SqlValue::Null => {
                tracing::trace!(kind = %KIND, "null resets to the zero value");
                Ok(Self::default())
            }
            SqlValue::Int64(seconds)        => Self::from_unix(seconds, 0),
            SqlValue::Float64(seconds)      => Self::from_unix(sql::float_seconds(KIND, seconds)?, 0),
            SqlValue::Text(ref text)        => Self::parse_sql(text),
            SqlValue::Bytes(ref bytes)      => Self::parse_sql(sql::utf8(KIND, bytes)?),
            SqlValue::Timestamp(ref when)   => Ok(Self::from_instant(when)),
            SqlValue::Bool(_)               => Err(Error::ScanType { kind: KIND, found: value.kind_name() }),
        }
    }

    fn parse_sql(input: &str) -> Result<Self, Error> {
        TIME_SQL_SHAPE.check(KIND, input)?;
        let parsed = layout::parse(KIND, input, StrftimeItems::new(TIME_SQL_PARSE))?;
        Self::from_parsed(input, &parsed, None)
    }
}


impl TimePiece for TimeOfDay {
    fn hour(&self) -> u32 { self.at.hour() }
    fn minute(&self) -> u32 { self.at.minute() }
    fn second(&self) -> u32 { self.at.second() }
    fn nanosecond(&self) -> u32 { self.at.nanosecond() }
}

impl Timeline for TimeOfDay {}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::pinned(NaiveTime::MIN, Offset::utc().fixed())
    }
}

impl Add<TimeDelta> for TimeOfDay {
    type Output = Self;

    fn add(self, duration: TimeDelta) -> Self {
        TimeOfDay::add(&self, duration)
    }
}

impl Sub<TimeOfDay> for TimeOfDay {
    type Output = TimeDelta;

    fn sub(self, other: TimeOfDay) -> TimeDelta {
        TimeOfDay::sub(&self, &other)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.at.format_with_items(TIME_ITEMS.iter()))
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TimeOfDay({})", self)
    }
}
