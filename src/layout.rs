//! Text layouts, and the routines that read and write them.
//!
//! Each type has a **canonical** layout, used by its `Display`, text, and
//! JSON forms, and a **SQL** layout, used only by `to_sql` and `scan`:
//!
//! | Type      | Canonical                    | SQL                          |
//! |-----------|------------------------------|------------------------------|
//! | Date      | `YYYY-MM-DD`                 | `YYYY-MM-DD`                 |
//! | TimeOfDay | `HH:MM:SS±HH:MM` (`Z` = UTC) | `HH:MM:SS.ffffff±HH`         |
//! | DateTime  | RFC 3339                     | `YYYY-MM-DD HH:MM:SS±HH`     |
//!
//! Fractional seconds are only written when they are non-zero. The SQL
//! layouts carry at most six fractional digits, and write the minutes of
//! the offset only when there are some.
//!
//! The layouts that callers pass in themselves are `strftime`-style strings,
//! as understood by `chrono::format`.

use std::borrow::Borrow;
use std::fmt::{self, Write};

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::{Error, Kind};


/// The canonical date layout, as a `strftime` string.
pub const DATE: &str = "%Y-%m-%d";

/// A `strftime` string for the canonical time layout. Printing with it
/// writes `+00:00` where the canonical form writes `Z`.
pub const TIME: &str = "%H:%M:%S%.f%:z";

/// A `strftime` string for the canonical date-time layout. Printing with it
/// writes `+00:00` where the canonical form writes `Z`.
pub const DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Accepts the SQL time layout, with the minutes of the offset optional.
pub(crate) const TIME_SQL_PARSE: &str = "%H:%M:%S%.f%#z";

/// Accepts the SQL date-time layout, with the minutes of the offset optional.
pub(crate) const DATETIME_SQL_PARSE: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

pub(crate) const DATE_ITEMS: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Numeric::Day, Pad::Zero),
];

pub(crate) const TIME_ITEMS: &[Item<'static>] = &[
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Fixed(Fixed::Nanosecond),
    Item::Fixed(Fixed::TimezoneOffsetColonZ),
];

/// The clock part of the SQL layouts; the fraction and offset are written
/// by `SqlFraction` and `SqlOffset`.
pub(crate) const CLOCK_ITEMS: &[Item<'static>] = &[
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Second, Pad::Zero),
];


/// The fixed-width front of a layout.
///
/// The delegate parser accepts numbers with fewer digits than the layout
/// asks for, and skips whitespace in front of them, so inputs are checked
/// against this first. In the pattern, a letter stands for one ASCII digit
/// and anything else stands for itself.
///
/// Shapes that start with a year also take the forms years outside 0 to
/// 9999 are written in: a sign, then four or more digits.
#[derive(PartialEq, Debug, Copy, Clone)]
pub(crate) struct Shape {
    pub(crate) name: &'static str,
    pattern: &'static str,
    exact: bool,
    signed_year: bool,
}

pub(crate) const DATE_SHAPE: Shape = Shape {
    name: "YYYY-MM-DD",
    pattern: "YYYY-MM-DD",
    exact: true,
    signed_year: true,
};

pub(crate) const TIME_SHAPE: Shape = Shape {
    name: "HH:MM:SS±HH:MM",
    pattern: "HH:MM:SS",
    exact: false,
    signed_year: false,
};

pub(crate) const TIME_SQL_SHAPE: Shape = Shape {
    name: "HH:MM:SS.ffffff±HH",
    pattern: "HH:MM:SS",
    exact: false,
    signed_year: false,
};

pub(crate) const DATETIME_SQL_SHAPE: Shape = Shape {
    name: "YYYY-MM-DD HH:MM:SS±HH",
    pattern: "YYYY-MM-DD HH:MM:SS",
    exact: false,
    signed_year: true,
};

impl Shape {

    /// Returns whether the input starts with (or, for exact shapes, is)
    /// something shaped like this pattern.
    pub(crate) fn fits(&self, input: &str) -> bool {
        let input = if self.signed_year { unsigned_year(input) } else { input };
        let input = input.as_bytes();
        let pattern = self.pattern.as_bytes();

        if input.len() < pattern.len() || (self.exact && input.len() != pattern.len()) {
            return false;
        }

        pattern.iter().zip(input).all(|(p, c)| {
            if p.is_ascii_alphabetic() { c.is_ascii_digit() }
                                  else { p == c }
        })
    }

    pub(crate) fn check(&self, kind: Kind, input: &str) -> Result<(), Error> {
        if self.fits(input) {
            Ok(())
        }
        else {
            Err(Error::Shape { kind, input: input.to_owned(), layout: self.name })
        }
    }
}


/// Drops the sign and any digits past the last four of a signed year, so
/// that what is left lines up with a four-digit pattern. Anything else is
/// returned as it is.
fn unsigned_year(input: &str) -> &str {
    let digits = match input.as_bytes().first() {
        Some(b'+') | Some(b'-') => input[1 ..].bytes().take_while(u8::is_ascii_digit).count(),
        _                       => return input,
    };

    if digits >= 4 { &input[1 + digits - 4 ..] }
              else { input }
}


/// Runs the delegate parser over the input, returning the fields it found.
pub(crate) fn parse<'a, I, B>(kind: Kind, input: &str, items: I) -> Result<Parsed, Error>
where I: Iterator<Item=B>,
      B: Borrow<Item<'a>>,
{
    let mut parsed = Parsed::new();
    resolve(kind, input, format::parse(&mut parsed, input, items))?;
    Ok(parsed)
}

/// Attaches the input to a failure from the delegate parser, including one
/// found while resolving the fields it parsed.
pub(crate) fn resolve<T>(kind: Kind, input: &str, result: format::ParseResult<T>) -> Result<T, Error> {
    result.map_err(|source| Error::Parse { kind, input: input.to_owned(), source })
}

/// Turns the parsed offset, if there was one, into a fixed offset of whole
/// minutes.
pub(crate) fn parsed_offset(kind: Kind, parsed: &Parsed) -> Result<Option<FixedOffset>, Error> {
    match parsed.offset() {
        Some(seconds) if seconds % 60 != 0  => Err(Error::out_of_range(kind)),
        Some(seconds)                       => FixedOffset::east_opt(seconds).map(Some).ok_or(Error::out_of_range(kind)),
        None                                => Ok(None),
    }
}

/// Breaks a caller-supplied layout into items, rejecting unknown specifiers.
pub(crate) fn compile(layout: &str) -> Result<Vec<Item<'_>>, Error> {
    let items: Vec<Item<'_>> = StrftimeItems::new(layout).collect();

    if items.iter().any(|item| matches!(item, Item::Error)) {
        Err(Error::Layout { layout: layout.to_owned() })
    }
    else {
        Ok(items)
    }
}

/// Appends the given moment, printed with a caller-supplied layout.
pub(crate) fn append<Tz>(when: &DateTime<Tz>, layout: &str, buf: &mut String) -> Result<(), Error>
where Tz: TimeZone,
      Tz::Offset: fmt::Display,
{
    let items = compile(layout)?;

    // Parse-only specifiers compile, but refuse to print.
    write!(buf, "{}", when.format_with_items(items.iter()))
        .map_err(|_| Error::Layout { layout: layout.to_owned() })
}


/// Writes the fractional part of a second at microsecond precision, with
/// trailing zeroes removed, and nothing at all for a whole second.
#[derive(PartialEq, Debug, Copy, Clone)]
pub(crate) struct SqlFraction(pub(crate) u32);

impl fmt::Display for SqlFraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // leap seconds are stored as nanoseconds past 1_000_000_000
        let mut micros = self.0 % 1_000_000_000 / 1_000;
        if micros == 0 {
            return Ok(());
        }

        let mut width = 6;
        while micros % 10 == 0 {
            micros /= 10;
            width -= 1;
        }

        write!(f, ".{:0width$}", micros, width = width)
    }
}


/// Writes an offset as `±HH`, or `±HH:MM` when it has minutes.
#[derive(PartialEq, Debug, Copy, Clone)]
pub(crate) struct SqlOffset(pub(crate) FixedOffset);

impl fmt::Display for SqlOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let seconds = self.0.local_minus_utc();
        let sign = if seconds < 0 { '-' } else { '+' };
        let seconds = seconds.abs();

        write!(f, "{}{:02}", sign, seconds / 3600)?;

        let minutes = seconds / 60 % 60;
        if minutes != 0 {
            write!(f, ":{:02}", minutes)?;
        }

        Ok(())
    }
}
