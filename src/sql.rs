//! Values that travel to and from SQL drivers.
//!
//! Every type in this crate writes itself as `SqlValue::Text` through its
//! `to_sql` method, and reads itself back through `scan` (in place) or
//! `from_sql` (by value). What each type accepts is listed on its `scan`.

use std::fmt;

use crate::error::{Error, Kind};
use crate::instant::Instant;


/// A single column value, as a SQL driver hands it over.
#[derive(PartialEq, Debug, Clone)]
pub enum SqlValue {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(Instant),
}

impl SqlValue {

    /// The name of this kind of value, as reported in scan errors.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            SqlValue::Null          => "null",
            SqlValue::Int64(_)      => "i64",
            SqlValue::Float64(_)    => "f64",
            SqlValue::Bool(_)       => "bool",
            SqlValue::Text(_)       => "string",
            SqlValue::Bytes(_)      => "bytes",
            SqlValue::Timestamp(_)  => "timestamp",
        }
    }

    /// Returns the text of this value, if it holds any.
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            SqlValue::Text(ref text) => Some(text),
            _                        => None,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == SqlValue::Null
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SqlValue::Null              => f.write_str("NULL"),
            SqlValue::Int64(v)          => write!(f, "{}", v),
            SqlValue::Float64(v)        => write!(f, "{}", v),
            SqlValue::Bool(v)           => write!(f, "{}", v),
            SqlValue::Text(ref v)       => write!(f, "{:?}", v),
            SqlValue::Bytes(ref v)      => write!(f, "{:?}", String::from_utf8_lossy(v)),
            SqlValue::Timestamp(ref v)  => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float64(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        SqlValue::Bytes(v.to_vec())
    }
}

impl From<Instant> for SqlValue {
    fn from(v: Instant) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T> From<Option<T>> for SqlValue where SqlValue: From<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => SqlValue::from(v),
            None    => SqlValue::Null,
        }
    }
}


/// Reads a floating-point column as whole Unix seconds, dropping any
/// fraction the way an integer cast would.
pub(crate) fn float_seconds(kind: Kind, seconds: f64) -> Result<i64, Error> {
    if seconds.is_finite() && seconds >= i64::MIN as f64 && seconds < i64::MAX as f64 {
        Ok(seconds as i64)
    }
    else {
        Err(Error::out_of_range(kind))
    }
}

/// Reads a byte column as text.
pub(crate) fn utf8(kind: Kind, bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|_| Error::Utf8 { kind })
}
