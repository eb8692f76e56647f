//! Calendar dates with no time of day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, Month, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::cal::{month_from_one, normalise_ymd, DatePiece, Timeline};
use crate::error::{Error, Kind};
use crate::instant::Instant;
use crate::layout::{self, DATE_ITEMS, DATE_SHAPE};
use crate::sql::{self, SqlValue};


const KIND: Kind = Kind::Date;

/// The date of the zero value: the 1st of January, year 1.
const ZERO: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(date) => date,
    None       => panic!("year 1 is representable"),
};

const YEAR_MASK: u32 = 0x3FFF;
const MONTH_MASK: u32 = 0xF;
const DAY_MASK: u32 = 0x1F;
const MONTH_SHIFT: u32 = 14;
const DAY_SHIFT: u32 = 18;


/// A **date** is a day on the calendar, without a time of day or a zone.
///
/// Internally the date is held as midnight UTC on that day, and every
/// operation keeps it there, so there is no clock reading to leak.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct Date {
    midnight: DateTime<Utc>,
}

impl Date {

    /// Creates a new date from a year, month, and day.
    ///
    /// Fails if the day does not exist in that month.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, DatePiece, Month};
    ///
    /// let date = Date::new(2024, Month::February, 29).unwrap();
    /// assert_eq!(date.day(), 29);
    ///
    /// assert!(Date::new(2023, Month::February, 29).is_err());
    /// ```
    pub fn new(year: i32, month: Month, day: u32) -> Result<Self, Error> {
        NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
            .map(Self::from_naive)
            .ok_or(Error::out_of_range(KIND))
    }

    /// Today’s date, in the local zone.
    pub fn today() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    /// Creates a date from a chrono calendar date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self { midnight: date.and_time(NaiveTime::MIN).and_utc() }
    }

    /// Takes the calendar date out of any moment, as seen in that moment’s
    /// own zone, and discards the rest.
    pub fn from_instant<Tz: TimeZone>(when: &DateTime<Tz>) -> Self {
        Self::from_naive(when.date_naive())
    }

    /// The date, in UTC, of the given number of seconds and nanoseconds
    /// since the Unix epoch.
    pub fn from_unix(seconds: i64, nanos: u32) -> Result<Self, Error> {
        DateTime::from_timestamp(seconds, nanos)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    /// The date, in UTC, of the given number of milliseconds since the Unix
    /// epoch.
    pub fn from_unix_millis(millis: i64) -> Result<Self, Error> {
        DateTime::from_timestamp_millis(millis)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    /// The date, in UTC, of the given number of microseconds since the Unix
    /// epoch.
    pub fn from_unix_micros(micros: i64) -> Result<Self, Error> {
        DateTime::from_timestamp_micros(micros)
            .map(|utc| Self::from_instant(&utc))
            .ok_or(Error::out_of_range(KIND))
    }

    /// Parses a date in the canonical `YYYY-MM-DD` layout.
    ///
    /// The layout is strict: every field must have exactly its full number
    /// of digits, and nothing may come before or after it. Years outside 0
    /// to 9999 are written with a sign and at least four digits, such as
    /// `+10000-01-02` or `-0001-12-31`.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, DatePiece, Month};
    ///
    /// let date = Date::parse("2000-01-02").unwrap();
    /// assert_eq!(date.ymd(), (2000, Month::January, 2));
    ///
    /// assert!(Date::parse("2000-1-2").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, Error> {
        DATE_SHAPE.check(KIND, input)?;
        let parsed = layout::parse(KIND, input, DATE_ITEMS.iter())?;
        let date = layout::resolve(KIND, input, parsed.to_naive_date())?;
        Ok(Self::from_naive(date))
    }

    /// Parses a date using a `strftime`-style layout.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, DatePiece};
    ///
    /// let date = Date::parse_with_layout("%d/%m/%Y", "02/01/2000").unwrap();
    /// assert_eq!(date.year(), 2000);
    /// ```
    pub fn parse_with_layout(layout: &str, input: &str) -> Result<Self, Error> {
        let items = layout::compile(layout)?;
        let parsed = layout::parse(KIND, input, items.iter())?;
        let date = layout::resolve(KIND, input, parsed.to_naive_date())?;
        Ok(Self::from_naive(date))
    }

    /// Adds a number of years, months, and days, any of which may be
    /// negative.
    ///
    /// Overflowing days carry into the following month, the way a wall
    /// calendar would count them: the 31st of January plus one month is
    /// the 2nd or 3rd of March. Use `add_months_no_overflow` to stay in
    /// the target month instead.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, Month};
    ///
    /// let date = Date::new(2023, Month::January, 31).unwrap();
    /// let added = date.add_date(0, 1, 0).unwrap();
    /// assert_eq!(added, Date::new(2023, Month::March, 3).unwrap());
    /// ```
    pub fn add_date(&self, years: i32, months: i32, days: i32) -> Result<Self, Error> {
        let year = i64::from(self.year()) + i64::from(years);
        let month = i64::from(self.month().number_from_month()) + i64::from(months);
        let day = i64::from(self.day()) + i64::from(days);

        normalise_ymd(year, month, day)
            .map(Self::from_naive)
            .ok_or(Error::out_of_range(KIND))
    }

    /// Adds a number of months, which may be negative, clamping the day to
    /// the end of the target month rather than spilling into the next.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, Month};
    ///
    /// let date = Date::new(2024, Month::January, 31).unwrap();
    /// let added = date.add_months_no_overflow(1).unwrap();
    /// assert_eq!(added, Date::new(2024, Month::February, 29).unwrap());
    /// ```
    pub fn add_months_no_overflow(&self, months: i32) -> Result<Self, Error> {
        let added = self.add_date(0, months, 0)?;

        if added.day() != self.day() {
            added.previous_month_last_day()
        }
        else {
            Ok(added)
        }
    }

    /// The last day of the month before this date’s month.
    pub fn previous_month_last_day(&self) -> Result<Self, Error> {
        let month = i64::from(self.month().number_from_month());

        normalise_ymd(i64::from(self.year()), month, 0)
            .map(Self::from_naive)
            .ok_or(Error::out_of_range(KIND))
    }

    /// Whether this is the zero value, the 1st of January, year 1.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// This date as a chrono calendar date.
    pub fn naive(&self) -> NaiveDate {
        self.midnight.date_naive()
    }

    /// Midnight UTC at the start of this date.
    pub fn to_instant(&self) -> Instant {
        self.midnight.fixed_offset()
    }

    /// Seconds from the Unix epoch to midnight UTC on this date.
    pub fn unix(&self) -> i64 {
        self.midnight.timestamp()
    }

    pub fn unix_millis(&self) -> i64 {
        self.midnight.timestamp_millis()
    }

    pub fn unix_micros(&self) -> i64 {
        self.midnight.timestamp_micros()
    }

    /// Nanoseconds from the Unix epoch, if they fit in an `i64`, which is
    /// only the case between the years 1677 and 2262.
    pub fn unix_nanos(&self) -> Option<i64> {
        self.midnight.timestamp_nanos_opt()
    }

    /// Prints this date with a `strftime`-style layout. Clock specifiers
    /// print midnight UTC.
    pub fn format(&self, layout: &str) -> Result<String, Error> {
        let mut buf = String::new();
        self.append_format(&mut buf, layout)?;
        Ok(buf)
    }

    /// Appends this date, printed with a `strftime`-style layout, to the
    /// end of a buffer.
    pub fn append_format(&self, buf: &mut String, layout: &str) -> Result<(), Error> {
        layout::append(&self.midnight, layout, buf)
    }
}


// Binary encoding
//
// Four bytes, little-endian. From the least significant bit: 14 bits of
// year, 4 bits of month, and 5 bits of day. Years outside 0 to 16383 lose
// their high bits.
impl Date {

    /// Packs this date into its four-byte binary form.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, Month};
    ///
    /// let date = Date::new(2000, Month::January, 2).unwrap();
    /// assert_eq!(Date::from_binary(&date.to_binary()).unwrap(), date);
    /// ```
    pub fn to_binary(&self) -> [u8; 4] {
        let year = self.year() as u32 & YEAR_MASK;
        let month = self.month().number_from_month();
        let packed = year | (month << MONTH_SHIFT) | (self.day() << DAY_SHIFT);
        packed.to_le_bytes()
    }

    /// Unpacks a date from its four-byte binary form. Fields out of range
    /// for the calendar carry over the way `add_date` does, so month 0 is
    /// December of the year before and the 30th of February is in March.
    /// Only a wrong number of bytes is an error.
    pub fn from_binary(data: &[u8]) -> Result<Self, Error> {
        Self::unpacked(data).map_err(Error::logged)
    }

    /// Overwrites this date with one unpacked from its binary form. On
    /// failure the date is left as it was.
    pub fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        *self = Self::from_binary(data)?;
        Ok(())
    }

    fn unpacked(data: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 4] = match data.try_into() {
            Ok(bytes) => bytes,
            Err(_)    => return Err(Error::ByteLength { kind: KIND, expected: 4, actual: data.len() }),
        };

        let packed = u32::from_le_bytes(bytes);
        let year  = packed & YEAR_MASK;
        let month = (packed >> MONTH_SHIFT) & MONTH_MASK;
        let day   = (packed >> DAY_SHIFT) & DAY_MASK;

        normalise_ymd(i64::from(year), i64::from(month), i64::from(day))
            .map(Self::from_naive)
            .ok_or(Error::out_of_range(KIND))
    }
}


// Text encoding
impl Date {

    /// The canonical `YYYY-MM-DD` text of this date.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Decodes a date from its canonical text.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        Self::parse(text).map_err(Error::logged)
    }

    /// Overwrites this date with one decoded from its canonical text. On
    /// failure the date is left as it was.
    pub fn unmarshal_text(&mut self, text: &str) -> Result<(), Error> {
        *self = Self::from_text(text)?;
        Ok(())
    }
}


// SQL values
impl Date {

    /// The value to hand a SQL driver: the canonical text.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, Month, SqlValue};
    ///
    /// let date = Date::new(2000, Month::January, 2).unwrap();
    /// assert_eq!(date.to_sql(), SqlValue::Text("2000-01-02".into()));
    /// ```
    pub fn to_sql(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }

    /// Reads a date out of a SQL column value. See `scan` for what is
    /// accepted.
    pub fn from_sql(value: &SqlValue) -> Result<Self, Error> {
        Self::scanned(value).map_err(Error::logged)
    }

    /// Overwrites this date with one read from a SQL column value:
    ///
    /// - integers and floats are Unix seconds, taken in UTC;
    /// - text and bytes are parsed with the canonical layout;
    /// - timestamps give their date, as seen in their own zone;
    /// - NULL resets the date to the zero value.
    ///
    /// Anything else is an error, and leaves the date as it was.
    ///
    /// ### Examples
    ///
    /// ```
    /// use datetime_parts::{Date, Month, SqlValue};
    ///
    /// let mut date = Date::default();
    /// date.scan(&SqlValue::Int64(946_771_200)).unwrap();
    /// assert_eq!(date, Date::new(2000, Month::January, 2).unwrap());
    /// ```
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
            SqlValue::Text(ref text)        => Self::parse(text),
            SqlValue::Bytes(ref bytes)      => Self::parse(sql::utf8(KIND, bytes)?),
            SqlValue::Timestamp(ref when)   => Ok(Self::from_instant(when)),
            SqlValue::Bool(_)               => Err(Error::ScanType { kind: KIND, found: value.kind_name() }),
        }
    }
}


impl DatePiece for Date {
    fn year(&self) -> i32 { self.midnight.year() }
    fn month(&self) -> Month { month_from_one(self.midnight.month()) }
    fn day(&self) -> u32 { self.midnight.day() }
    fn yearday(&self) -> u32 { self.midnight.ordinal() }
    fn weekday(&self) -> Weekday { self.midnight.weekday() }

    fn iso_week(&self) -> (i32, u32) {
        let week = self.midnight.iso_week();
        (week.year(), week.week())
    }
}

impl Timeline for Date {}

impl Default for Date {
    fn default() -> Self {
        Self::from_naive(ZERO)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.naive()
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.naive().format_with_items(DATE_ITEMS.iter()))
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Date({})", self)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn ymd(year: i32, month: Month, day: u32) -> Date {
        Date::new(year, month, day).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn invalid_day() {
            assert!(matches!(Date::new(2023, Month::April, 31), Err(Error::OutOfRange { kind: Kind::Date })));
        }

        #[test]
        fn zero() {
            let zero = Date::default();
            assert!(zero.is_zero());
            assert_eq!(zero.ymd(), (1, Month::January, 1));
        }

        #[test]
        fn unix_is_utc() {
            // 23:30 on the 1st, one hour behind UTC, is already the 2nd in UTC.
            let when = FixedOffset::west_opt(3600).unwrap()
                .with_ymd_and_hms(2000, 1, 1, 23, 30, 0).unwrap();
            let date = Date::from_unix(when.timestamp(), 0).unwrap();
            assert_eq!(date, ymd(2000, Month::January, 2));
        }

        #[test]
        fn instant_keeps_its_own_zone() {
            let when = FixedOffset::west_opt(3600).unwrap()
                .with_ymd_and_hms(2000, 1, 1, 23, 30, 0).unwrap();
            assert_eq!(Date::from_instant(&when), ymd(2000, Month::January, 1));
        }

        #[test]
        fn clock_is_discarded() {
            let when = Utc.with_ymd_and_hms(2000, 1, 2, 3, 4, 5).unwrap();
            let instant = Date::from_instant(&when).to_instant();
            assert_eq!((instant.hour(), instant.minute(), instant.second()), (0, 0, 0));
            assert_eq!(instant.nanosecond(), 0);
            assert_eq!(instant.offset().local_minus_utc(), 0);
        }

        #[test]
        fn millis_and_micros() {
            assert_eq!(Date::from_unix_millis(946_771_200_000).unwrap(), ymd(2000, Month::January, 2));
            assert_eq!(Date::from_unix_micros(946_771_199_999_999).unwrap(), ymd(2000, Month::January, 1));
        }

        #[test]
        fn out_of_range_unix() {
            assert!(Date::from_unix(i64::MAX, 0).is_err());
        }
    }

    mod accessors {
        use super::*;

        #[test]
        fn pieces() {
            let date = ymd(2000, Month::January, 2);
            assert_eq!(date.weekday(), Weekday::Sun);
            assert_eq!(date.yearday(), 2);
            assert_eq!(date.iso_week(), (1999, 52));
            assert_eq!(date.year_of_century(), 0);
        }

        #[test]
        fn unix() {
            let date = ymd(2000, Month::January, 2);
            assert_eq!(date.unix(), 946_771_200);
            assert_eq!(date.unix_millis(), 946_771_200_000);
            assert_eq!(date.unix_micros(), 946_771_200_000_000);
            assert_eq!(date.unix_nanos(), Some(946_771_200_000_000_000));
        }

        #[test]
        fn unix_nanos_overflow() {
            assert_eq!(ymd(3000, Month::January, 1).unix_nanos(), None);
        }

        #[test]
        fn debug() {
            assert_eq!(format!("{:?}", ymd(2000, Month::January, 2)), "Date(2000-01-02)");
        }

        #[test]
        fn format() {
            let date = ymd(2000, Month::January, 2);
            assert_eq!(date.format("%d.%m.%Y %H:%M").unwrap(), "02.01.2000 00:00");
        }

        #[test]
        fn append_format() {
            let mut buf = String::from("on ");
            ymd(2000, Month::January, 2).append_format(&mut buf, "%A").unwrap();
            assert_eq!(buf, "on Sunday");
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn canonical() {
            assert_eq!(Date::parse("2000-01-02").unwrap(), ymd(2000, Month::January, 2));
        }

        #[test]
        fn from_str() {
            let date: Date = "1999-12-31".parse().unwrap();
            assert_eq!(date, ymd(1999, Month::December, 31));
        }

        #[test]
        fn short_fields() {
            assert!(matches!(Date::parse("2000-1-2"), Err(Error::Shape { .. })));
        }

        #[test]
        fn trailing_clock() {
            assert!(Date::parse("2000-01-02T00:00:00Z").is_err());
        }

        #[test]
        fn impossible_day() {
            assert!(matches!(Date::parse("2000-02-30"), Err(Error::Parse { .. })));
        }

        #[test]
        fn layout() {
            let date = Date::parse_with_layout("%Y%m%d", "20000102").unwrap();
            assert_eq!(date, ymd(2000, Month::January, 2));
        }

        #[test]
        fn bad_layout() {
            assert!(matches!(Date::parse_with_layout("%Q", "x"), Err(Error::Layout { .. })));
        }

        #[test]
        fn five_digit_year() {
            let date = ymd(10_000, Month::January, 2);
            assert_eq!(date.to_text(), "+10000-01-02");
            assert_eq!(Date::from_text(&date.to_text()).unwrap(), date);
            assert_eq!(Date::from_sql(&date.to_sql()).unwrap(), date);
        }

        #[test]
        fn negative_year() {
            let date = ymd(-1, Month::December, 31);
            assert_eq!(date.to_text(), "-0001-12-31");
            assert_eq!(Date::parse("-0001-12-31").unwrap(), date);
        }

        #[test]
        fn signed_year_needs_four_digits() {
            assert!(matches!(Date::parse("+100-01-02"), Err(Error::Shape { .. })));
        }
    }

    mod binary {
        use super::*;

        #[test]
        fn packing() {
            let bytes = ymd(2000, Month::January, 2).to_binary();
            let packed = 2000 | 1 << 14 | 2 << 18;
            assert_eq!(bytes, u32::to_le_bytes(packed));
        }

        #[test]
        fn wrong_length() {
            let err = Date::from_binary(&[1, 2, 3]).unwrap_err();
            assert!(matches!(err, Error::ByteLength { expected: 4, actual: 3, .. }));
        }

        #[test]
        fn month_zero() {
            let bytes = (2000u32 | 2 << 18).to_le_bytes();
            assert_eq!(Date::from_binary(&bytes).unwrap(), ymd(1999, Month::December, 2));
        }

        #[test]
        fn month_fifteen() {
            let bytes = (2000u32 | 15 << 14 | 1 << 18).to_le_bytes();
            assert_eq!(Date::from_binary(&bytes).unwrap(), ymd(2001, Month::March, 1));
        }

        #[test]
        fn day_zero() {
            let bytes = (2000u32 | 3 << 14).to_le_bytes();
            assert_eq!(Date::from_binary(&bytes).unwrap(), ymd(2000, Month::February, 29));
        }

        #[test]
        fn wrapped_leap_day() {
            // 16484 wraps to 100, which is not a leap year.
            let date = ymd(16_484, Month::February, 29);
            assert_eq!(Date::from_binary(&date.to_binary()).unwrap(), ymd(100, Month::March, 1));
        }

        #[test]
        fn failed_unmarshal_keeps_value() {
            let mut date = ymd(2000, Month::January, 2);
            assert!(date.unmarshal_binary(&[]).is_err());
            assert_eq!(date, ymd(2000, Month::January, 2));
        }

        #[test]
        fn year_wraps() {
            let date = ymd(16_384 + 2000, Month::January, 2);
            assert_eq!(Date::from_binary(&date.to_binary()).unwrap(), ymd(2000, Month::January, 2));
        }
    }

    mod sql {
        use super::*;

        #[test]
        fn value() {
            assert_eq!(ymd(2000, Month::January, 2).to_sql(), SqlValue::from("2000-01-02"));
        }

        #[test]
        fn float() {
            assert_eq!(Date::from_sql(&SqlValue::Float64(946_771_200.5)).unwrap(), ymd(2000, Month::January, 2));
        }

        #[test]
        fn bytes() {
            assert_eq!(Date::from_sql(&SqlValue::from(&b"2000-01-02"[..])).unwrap(), ymd(2000, Month::January, 2));
        }

        #[test]
        fn null() {
            let mut date = ymd(2000, Month::January, 2);
            date.scan(&SqlValue::Null).unwrap();
            assert!(date.is_zero());
        }

        #[test]
        fn bool() {
            let err = Date::from_sql(&SqlValue::Bool(true)).unwrap_err();
            assert_eq!(err.to_string(), "failed to scan type 'bool' into date");
        }
    }
}
