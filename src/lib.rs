#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
//#![warn(missing_docs)]

#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused_qualifications)]
#![warn(unused_results)]

//! Date-only, time-only, and date-time values that cannot leak the half of
//! a moment they leave out.
//!
//! - A `Date` has a year, month, and day, and nothing else.
//! - A `TimeOfDay` has a clock reading and a zone, and nothing else.
//! - A `DateTime` has everything, and projects out the other two.
//!
//! Each type reads and writes itself as packed binary, canonical text,
//! JSON, and SQL column values.
//!
//! # Examples
//!
//! ```
//! use datetime_parts::{Date, DateTime, TimeOfDay, Month, Offset, SqlValue};
//!
//! let date = Date::parse("2000-01-02").unwrap();
//! let time = TimeOfDay::parse("03:04:05Z").unwrap();
//! let when = DateTime::parse("2000-01-02T03:04:05Z").unwrap();
//!
//! assert_eq!(when.to_date(), date);
//! assert_eq!(when.to_time(), time);
//!
//! let mut scanned = Date::default();
//! scanned.scan(&SqlValue::Int64(946_771_200)).unwrap();
//! assert_eq!(scanned, Date::new(2000, Month::January, 2).unwrap());
//! assert_eq!(time.to_sql(), SqlValue::Text("03:04:05+00".into()));
//! ```

mod cal;
mod error;
pub mod instant;
pub mod layout;
pub mod sql;

pub use cal::date::Date;
pub use cal::datetime::DateTime;
pub use cal::offset::Offset;
pub use cal::time::TimeOfDay;
pub use cal::{DatePiece, TimePiece, Timeline};
pub use error::{Error, Kind, OffsetError};
pub use instant::Instant;
pub use sql::SqlValue;

pub use chrono::{Month, TimeDelta, Weekday};
