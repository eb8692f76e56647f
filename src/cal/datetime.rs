//! Full date-times: a date, a clock reading, and a zone.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::format::StrftimeItems;
use chrono::{Datelike, FixedOffset, Local, Month, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, TimeZone, Timelike, Utc, Weekday};

use crate::cal::date::Date;
use crate::cal::offset::Offset;
use crate::cal::time::TimeOfDay;
use crate::cal::{month_from_one, normalise_ymd, round_local, DatePiece, Rounding, TimePiece, Timeline};
use crate::error::{Error, Kind};
use crate::instant::{self, Instant};
use crate::layout::{self, SqlFraction, SqlOffset, CLOCK_ITEMS, DATE_ITEMS, DATETIME_SQL_PARSE, DATETIME_SQL_SHAPE};
use crate::sql::{self, SqlValue};


const KIND: Kind = Kind::DateTime;


/// A **date-time** is an exact moment, written as a date and a clock
/// reading in a zone.
///
/// Nothing is pinned: this type carries everything its instant does, and
/// is the value that `Date` and `TimeOfDay` are projected out of.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct DateTime {
    at: Instant,
}

impl DateTime {

    /// Creates a new date-time from its fields and a zone.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, DatePiece, TimePiece, Month, Offset};
    ///
    /// let when = DateTime::new(2000, Month::January, 2, 3, 4, 5, 0, Offset::utc()).unwrap();
    /// assert_eq!(when.ymd(), (2000, Month::January, 2));
    /// assert_eq!(when.clock(), (3, 4, 5));
    /// assert_eq!(when.to_string(), "2000-01-02T03:04:05Z");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(year: i32, month: Month, day: u32, hour: u32, minute: u32, second: u32, nanos: u32, zone: Offset) -> Result<Self, Error> {
        let date = NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
            .ok_or(Error::out_of_range(KIND))?;
        let clock = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or(Error::out_of_range(KIND))?;

        Self::from_local(date.and_time(clock), zone.fixed())
    }

    /// The current moment, in the local zone.
    pub fn now() -> Self {
        Self::from_instant(&instant::now())
    }

    /// Wraps any moment, keeping its offset to the minute.
    pub fn from_instant<Tz: TimeZone>(when: &chrono::DateTime<Tz>) -> Self {
        Self { at: instant::minute_aligned(when.fixed_offset()) }
    }

    /// The moment the given number of seconds and nanoseconds after the
    /// Unix epoch, in the local zone.
    pub fn from_unix(seconds: i64, nanos: u32) -> Result<Self, Error> {
        chrono::DateTime::from_timestamp(seconds, nanos)
            .map(Self::local_from_utc)
            .ok_or(Error::out_of_range(KIND))
    }

    pub fn from_unix_millis(millis: i64) -> Result<Self, Error> {
        chrono::DateTime::from_timestamp_millis(millis)
            .map(Self::local_from_utc)
            .ok_or(Error::out_of_range(KIND))
    }

    pub fn from_unix_micros(micros: i64) -> Result<Self, Error> {
        chrono::DateTime::from_timestamp_micros(micros)
            .map(Self::local_from_utc)
            .ok_or(Error::out_of_range(KIND))
    }

    fn local_from_utc(utc: chrono::DateTime<Utc>) -> Self {
        Self::from_instant(&utc.with_timezone(&Local))
    }

    fn from_local(local: NaiveDateTime, offset: FixedOffset) -> Result<Self, Error> {
        offset.from_local_datetime(&local)
            .single()
            .map(|at| Self { at })
            .ok_or(Error::out_of_range(KIND))
    }

    /// Parses an RFC 3339 date-time, keeping the offset written in it.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, TimePiece};
    ///
    /// let when = DateTime::parse("2000-01-02T03:04:05.25-07:00").unwrap();
    /// assert_eq!(when.hour(), 3);
    /// assert_eq!(when.millisecond(), 250);
    /// assert_eq!(when.offset().hours(), -7);
    /// ```
    pub fn parse(input: &str) -> Result<Self, Error> {
        let at = layout::resolve(KIND, input, chrono::DateTime::parse_from_rfc3339(input))?;
        Ok(Self { at })
    }

    /// Parses an RFC 3339 date-time, then expresses it in the given zone.
    pub fn parse_in(input: &str, zone: Offset) -> Result<Self, Error> {
        Ok(Self::parse(input)?.in_zone(zone))
    }

    /// Parses a date-time using a `strftime`-style layout. When the layout
    /// has no offset, the date-time is taken to be in UTC.
    pub fn parse_with_layout(layout: &str, input: &str) -> Result<Self, Error> {
        Self::parse_with_layout_in(layout, input, Offset::utc())
    }

    /// Parses a date-time using a `strftime`-style layout. When the layout
    /// has no offset, the date-time is taken to be in the given zone. When
    /// it has no clock fields, the date-time is at midnight.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, DatePiece, TimePiece, Offset};
    ///
    /// let zone = Offset::of_hours_and_minutes(9, 0).unwrap();
    /// let when = DateTime::parse_with_layout_in("%d/%m/%Y", "02/01/2000", zone).unwrap();
    /// assert_eq!(when.day(), 2);
    /// assert_eq!(when.clock(), (0, 0, 0));
    /// assert_eq!(when.offset(), zone);
    /// ```
    pub fn parse_with_layout_in(layout: &str, input: &str, zone: Offset) -> Result<Self, Error> {
        let items = layout::compile(layout)?;
        let parsed = layout::parse(KIND, input, items.iter())?;
        let offset = layout::parsed_offset(KIND, &parsed)?.unwrap_or(zone.fixed());

        let local = if parsed.timestamp().is_none() && parsed.hour_mod_12().is_none() {
            layout::resolve(KIND, input, parsed.to_naive_date())?.and_time(NaiveTime::MIN)
        }
        else {
            layout::resolve(KIND, input, parsed.to_naive_datetime_with_offset(offset.local_minus_utc()))?
        };

        Self::from_local(local, offset)
    }

    /// Adds a duration, which may be negative.
    pub fn add(&self, duration: TimeDelta) -> Result<Self, Error> {
        self.at.checked_add_signed(duration)
            .map(|at| Self { at })
            .ok_or(Error::out_of_range(KIND))
    }

    /// Adds a number of years, months, and days to the local date, keeping
    /// the clock reading and zone. Overflowing days carry into the
    /// following month, as with `Date::add_date`.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, Month, Offset};
    ///
    /// let when = DateTime::new(2023, Month::January, 31, 12, 0, 0, 0, Offset::utc()).unwrap();
    /// let added = when.add_date(0, 1, 0).unwrap();
    /// assert_eq!(added.to_string(), "2023-03-03T12:00:00Z");
    /// ```
    pub fn add_date(&self, years: i32, months: i32, days: i32) -> Result<Self, Error> {
        let local = self.at.naive_local();
        let year = i64::from(local.year()) + i64::from(years);
        let month = i64::from(local.month()) + i64::from(months);
        let day = i64::from(local.day()) + i64::from(days);

        let date = normalise_ymd(year, month, day).ok_or(Error::out_of_range(KIND))?;
        Self::from_local(date.and_time(local.time()), *self.at.offset())
    }

    /// The duration from the other date-time to this one.
    pub fn sub(&self, other: &Self) -> TimeDelta {
        self.at.signed_duration_since(other.at)
    }

    /// Rounds to the nearest multiple of the given duration on the local
    /// clock, with halves rounding up.
    ///
    /// A duration of zero or less returns the value unchanged.
    pub fn round(&self, duration: TimeDelta) -> Result<Self, Error> {
        self.rounded(duration, Rounding::HalfUp)
    }

    /// Rounds down to a multiple of the given duration on the local clock.
    ///
    /// A duration of zero or less returns the value unchanged.
    pub fn truncate(&self, duration: TimeDelta) -> Result<Self, Error> {
        self.rounded(duration, Rounding::Down)
    }

    fn rounded(&self, duration: TimeDelta, rounding: Rounding) -> Result<Self, Error> {
        round_local(&self.at, duration, rounding)
            .map(|at| Self { at })
            .ok_or(Error::out_of_range(KIND))
    }

    /// The same moment, written in another zone.
    pub fn in_zone(&self, zone: Offset) -> Self {
        Self { at: self.at.with_timezone(&zone.fixed()) }
    }

    /// The same moment, written in the local zone.
    pub fn local(&self) -> Self {
        self.in_zone(Offset::local_at(&self.at))
    }

    /// The same moment, written in UTC.
    pub fn utc(&self) -> Self {
        self.in_zone(Offset::utc())
    }

    /// The zone this date-time is written in.
    pub fn offset(&self) -> Offset {
        Offset::from(*self.at.offset())
    }

    /// The local date, with the clock reading and zone dropped.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, Date, Month, Offset};
    ///
    /// let zone = Offset::of_hours_and_minutes(-5, 0).unwrap();
    /// let when = DateTime::new(2000, Month::January, 1, 23, 0, 0, 0, zone).unwrap();
    /// assert_eq!(when.to_date(), Date::new(2000, Month::January, 1).unwrap());
    /// ```
    pub fn to_date(&self) -> Date {
        Date::from_instant(&self.at)
    }

    /// The local clock reading and zone, with the date dropped.
    pub fn to_time(&self) -> TimeOfDay {
        TimeOfDay::from_instant(&self.at)
    }

    pub fn to_instant(&self) -> Instant {
        self.at
    }

    /// Whether this is the zero value, midnight UTC on the 1st of January,
    /// year 1.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    pub fn unix(&self) -> i64 {
        self.at.timestamp()
    }

    pub fn unix_millis(&self) -> i64 {
        self.at.timestamp_millis()
    }

    pub fn unix_micros(&self) -> i64 {
        self.at.timestamp_micros()
    }

    /// Nanoseconds from the Unix epoch, if they fit in an `i64`.
    pub fn unix_nanos(&self) -> Option<i64> {
        self.at.timestamp_nanos_opt()
    }

    pub fn format(&self, layout: &str) -> Result<String, Error> {
        let mut buf = String::new();
        self.append_format(&mut buf, layout)?;
        Ok(buf)
    }

    pub fn append_format(&self, buf: &mut String, layout: &str) -> Result<(), Error> {
        layout::append(&self.at, layout, buf)
    }
}


// Binary encoding
impl DateTime {

    pub fn to_binary(&self) -> Vec<u8> {
        instant::encode(&self.at)
    }

    pub fn from_binary(data: &[u8]) -> Result<Self, Error> {
        instant::decode(KIND, data)
            .map(|at| Self { at })
            .map_err(Error::logged)
    }

    pub fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        *self = Self::from_binary(data)?;
        Ok(())
    }
}


// Text encoding
impl DateTime {

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn from_text(text: &str) -> Result<Self, Error> {
        Self::parse(text).map_err(Error::logged)
    }

    pub fn unmarshal_text(&mut self, text: &str) -> Result<(), Error> {
        *self = Self::from_text(text)?;
        Ok(())
    }
}


// SQL values
impl DateTime {

    /// The value to hand a SQL driver: the date-time in the
    /// `YYYY-MM-DD HH:MM:SS±HH` layout, with a fraction of up to six
    /// digits after the seconds when there is one, and the minutes of the
    /// offset when there are some.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{DateTime, Month, Offset, SqlValue};
    ///
    /// let when = DateTime::new(2000, Month::January, 2, 3, 4, 5, 0, Offset::utc()).unwrap();
    /// assert_eq!(when.to_sql(), SqlValue::Text("2000-01-02 03:04:05+00".into()));
    /// ```
    pub fn to_sql(&self) -> SqlValue {
        let text = format!("{} {}{}{}",
            self.at.format_with_items(DATE_ITEMS.iter()),
            self.at.format_with_items(CLOCK_ITEMS.iter()),
            SqlFraction(self.at.nanosecond()),
            SqlOffset(*self.at.offset()));

        SqlValue::Text(text)
    }

    pub fn from_sql(value: &SqlValue) -> Result<Self, Error> {
        Self::scanned(value).map_err(Error::logged)
    }

    /// Overwrites this date-time with one read from a SQL column value:
    ///
    /// - integers and floats are Unix seconds, taken in UTC;
    /// - text and bytes are parsed with the SQL date-time layout;
    /// - timestamps are taken as they are, with the offset kept to the
    ///   minute;
    /// - NULL resets the value to the zero value.
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
            SqlValue::Int64(seconds)        => Self::utc_from_unix(seconds),
            SqlValue::Float64(seconds)      => Self::utc_from_unix(sql::float_seconds(KIND, seconds)?),
            SqlValue::Text(ref text)        => Self::parse_sql(text),
            SqlValue::Bytes(ref bytes)      => Self::parse_sql(sql::utf8(KIND, bytes)?),
            SqlValue::Timestamp(ref when)   => Ok(Self::from_instant(when)),
            SqlValue::Bool(_)               => Err(Error::ScanType { kind: KIND, found: value.kind_name() }),
        }
    }

    fn utc_from_unix(seconds: i64) -> Result<Self, Error> {
        chrono::DateTime::from_timestamp(seconds, 0)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    fn parse_sql(input: &str) -> Result<Self, Error> {
        DATETIME_SQL_SHAPE.check(KIND, input)?;
        let parsed = layout::parse(KIND, input, StrftimeItems::new(DATETIME_SQL_PARSE))?;
        let at = layout::resolve(KIND, input, parsed.to_datetime())?;
        Ok(Self { at })
    }
}


impl DatePiece for DateTime {
    fn year(&self) -> i32 { self.at.year() }
    fn month(&self) -> Month { month_from_one(self.at.month()) }
    fn day(&self) -> u32 { self.at.day() }
    fn yearday(&self) -> u32 { self.at.ordinal() }
    fn weekday(&self) -> Weekday { self.at.weekday() }

    fn iso_week(&self) -> (i32, u32) {
        let week = self.at.iso_week();
        (week.year(), week.week())
    }
}

impl TimePiece for DateTime {
    fn hour(&self) -> u32 { self.at.hour() }
    fn minute(&self) -> u32 { self.at.minute() }
    fn second(&self) -> u32 { self.at.second() }
    fn nanosecond(&self) -> u32 { self.at.nanosecond() }
}

impl Timeline for DateTime {}

impl Default for DateTime {
    fn default() -> Self {
        Self { at: Date::default().to_instant() }
    }
}

impl From<Instant> for DateTime {
    fn from(at: Instant) -> Self {
        Self::from_instant(&at)
    }
}

impl From<DateTime> for Instant {
    fn from(when: DateTime) -> Self {
        when.at
    }
}

impl Sub<DateTime> for DateTime {
    type Output = TimeDelta;

    fn sub(self, other: DateTime) -> TimeDelta {
        DateTime::sub(&self, &other)
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DateTime({})", self)
    }
}
