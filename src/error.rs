//! Errors produced while building, decoding, or scanning values.

use std::fmt;

use thiserror::Error;


/// Which of the three value types an error happened while producing.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Kind {
    Date,
    Time,
    DateTime,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Kind::Date      => f.write_str("date"),
            Kind::Time      => f.write_str("time"),
            Kind::DateTime  => f.write_str("datetime"),
        }
    }
}


/// Everything that can go wrong in this crate.
///
/// Every fallible operation returns this type: nothing here panics on
/// malformed input.
#[derive(Error, Debug)]
pub enum Error {

    /// The input did not match the layout it was parsed against.
    #[error("failed to parse {kind} ({input:?}): {source}")]
    Parse {
        kind: Kind,
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The input is not shaped like a fixed-width layout, such as a month
    /// written with one digit, or leading whitespace.
    #[error("failed to parse {kind} ({input:?}): does not match layout {layout:?}")]
    Shape {
        kind: Kind,
        input: String,
        layout: &'static str,
    },

    /// A caller-supplied layout string contains an unknown specifier.
    #[error("invalid layout {layout:?}")]
    Layout {
        layout: String,
    },

    /// A binary encoding had the wrong number of bytes.
    #[error("failed to unmarshal {kind}, incorrect number of bytes: expected {expected}, got {actual}")]
    ByteLength {
        kind: Kind,
        expected: usize,
        actual: usize,
    },

    /// A binary instant was written with a version this crate does not know.
    #[error("failed to unmarshal {kind}, unsupported version {version}")]
    Version {
        kind: Kind,
        version: u8,
    },

    /// A component or an arithmetic result fell outside the valid range.
    #[error("{kind} field out of range")]
    OutOfRange {
        kind: Kind,
    },

    /// A SQL value of a kind that cannot hold this type.
    #[error("failed to scan type '{found}' into {kind}")]
    ScanType {
        kind: Kind,
        found: &'static str,
    },

    /// A SQL byte column that is not UTF-8 text.
    #[error("failed to scan {kind}: bytes are not valid UTF-8")]
    Utf8 {
        kind: Kind,
    },

    /// A JSON document that is not a quoted string in the expected layout.
    #[cfg(feature = "serde")]
    #[error("failed to unmarshal {kind}: {source}")]
    Json {
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    /// An invalid zone offset.
    #[error("invalid offset: {0}")]
    Offset(#[from] OffsetError),
}

impl Error {

    /// The value type that was being produced, if the error is tied to one.
    pub fn kind(&self) -> Option<Kind> {
        match *self {
            Error::Parse { kind, .. }
            | Error::Shape { kind, .. }
            | Error::ByteLength { kind, .. }
            | Error::Version { kind, .. }
            | Error::OutOfRange { kind }
            | Error::ScanType { kind, .. }
            | Error::Utf8 { kind }          => Some(kind),
            #[cfg(feature = "serde")]
            Error::Json { kind, .. }        => Some(kind),
            Error::Layout { .. }
            | Error::Offset(_)              => None,
        }
    }

    pub(crate) fn out_of_range(kind: Kind) -> Self {
        Error::OutOfRange { kind }
    }

    /// Records a rejected decode or scan before handing the error back.
    pub(crate) fn logged(self) -> Self {
        tracing::debug!(kind = ?self.kind(), reason = %self, "rejected input");
        self
    }
}


/// Reasons an offset cannot be built from its components.
#[derive(Error, PartialEq, Eq, Debug, Copy, Clone)]
pub enum OffsetError {
    #[error("offset field out of range")]
    OutOfRange,

    #[error("sign mismatch")]
    SignMismatch,

    #[error("offset is not a whole number of minutes")]
    SubMinute,
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(Kind::Date.to_string(), "date");
        assert_eq!(Kind::Time.to_string(), "time");
        assert_eq!(Kind::DateTime.to_string(), "datetime");
    }

    #[test]
    fn scan_type_message() {
        let err = Error::ScanType { kind: Kind::Date, found: "bool" };
        assert_eq!(err.to_string(), "failed to scan type 'bool' into date");
        assert_eq!(err.kind(), Some(Kind::Date));
    }

    #[test]
    fn byte_length_message() {
        let err = Error::ByteLength { kind: Kind::Date, expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "failed to unmarshal date, incorrect number of bytes: expected 4, got 3");
    }

    #[test]
    fn offset_has_no_kind() {
        let err = Error::from(OffsetError::SignMismatch);
        assert_eq!(err.kind(), None);
        assert_eq!(err.to_string(), "invalid offset: sign mismatch");
    }

    #[test]
    fn sub_minute_message() {
        let err = Error::from(OffsetError::SubMinute);
        assert_eq!(err.to_string(), "invalid offset: offset is not a whole number of minutes");
    }
}
