//! Exact points on a timeline, and their binary encoding.
//!
//! An **instant** is the full moment-in-time value that every type in this
//! crate is layered on: a calendar date, a clock reading, and the fixed UTC
//! offset the two are expressed in. Offsets are kept to whole minutes.
//!
//! The binary encoding is versioned. Both versions start with a version
//! byte, then the number of seconds since midnight UTC on the 1st of
//! January of year 1 (big-endian `i64`), then the nanosecond of that second
//! (big-endian `i32`), then the offset in minutes (big-endian `i16`):
//!
//! - **Version 1** is the usual form. An offset of `-1` minutes stands for
//!   UTC.
//! - **Version 2** is only written for a real offset of `-1` minutes, and
//!   is followed by one more byte for the seconds of the offset, which has
//!   to be zero. Its minutes field is always taken literally.

use chrono::{DateTime, FixedOffset, Local};

use crate::error::{Error, Kind};


/// The moment-in-time value every type in this crate wraps.
pub type Instant = DateTime<FixedOffset>;

const VERSION_MINUTES: u8 = 1;
const VERSION_SECONDS: u8 = 2;

const LEN_MINUTES: usize = 1 + 8 + 4 + 2;
const LEN_SECONDS: usize = LEN_MINUTES + 1;

/// The minutes value that version 1 uses to mean UTC.
const UTC_MARKER: i16 = -1;

/// Number of seconds between **midnight, 1st January, year 1** and the
/// Unix epoch.
const UNIX_TO_INTERNAL: i64 = (1969 * 365 + 1969 / 4 - 1969 / 100 + 1969 / 400) * 86_400;


/// Returns the current moment, expressed in the local zone.
pub(crate) fn now() -> Instant {
    Local::now().fixed_offset()
}

/// Drops any seconds an offset has past its last whole minute.
pub(crate) fn whole_minutes(offset: FixedOffset) -> FixedOffset {
    let seconds = offset.local_minus_utc();
    FixedOffset::east_opt(seconds - seconds % 60).unwrap_or(offset)
}

/// The same moment, written in its offset with the leftover seconds
/// dropped.
pub(crate) fn minute_aligned(at: Instant) -> Instant {
    at.with_timezone(&whole_minutes(*at.offset()))
}

/// Encodes an instant into its binary form. An offset with leftover
/// seconds is written without them; the moment itself is kept.
pub fn encode(instant: &Instant) -> Vec<u8> {
    let instant = minute_aligned(*instant);
    let offset = instant.offset().local_minus_utc();
    let seconds = instant.timestamp() + UNIX_TO_INTERNAL;
    let nanos = instant.timestamp_subsec_nanos() as i32;
    let minutes = (offset / 60) as i16;

    // A real offset of minus one minute would read back as UTC in version 1.
    let (version, minutes) =
        if offset == 0                  { (VERSION_MINUTES, UTC_MARKER) }
        else if minutes == UTC_MARKER   { (VERSION_SECONDS, minutes) }
        else                            { (VERSION_MINUTES, minutes) };

    let mut buf = Vec::with_capacity(LEN_SECONDS);
    buf.push(version);
    buf.extend_from_slice(&seconds.to_be_bytes());
    buf.extend_from_slice(&nanos.to_be_bytes());
    buf.extend_from_slice(&minutes.to_be_bytes());

    if version == VERSION_SECONDS {
        buf.push(0);
    }

    buf
}

/// Decodes an instant from its binary form. The `kind` names the value
/// being decoded, for error reporting.
pub fn decode(kind: Kind, data: &[u8]) -> Result<Instant, Error> {
    let version = match data.first() {
        Some(v) => *v,
        None    => return Err(Error::ByteLength { kind, expected: LEN_MINUTES, actual: 0 }),
    };

    let expected = match version {
        VERSION_MINUTES => LEN_MINUTES,
        VERSION_SECONDS => LEN_SECONDS,
        _               => return Err(Error::Version { kind, version }),
    };

    if data.len() != expected {
        return Err(Error::ByteLength { kind, expected, actual: data.len() });
    }

    let seconds = i64::from_be_bytes(array(&data[1 .. 9]));
    let nanos   = i32::from_be_bytes(array(&data[9 .. 13]));
    let minutes = i16::from_be_bytes(array(&data[13 .. 15]));

    let offset = match version {
        VERSION_MINUTES if minutes == UTC_MARKER => 0,
        VERSION_MINUTES     => i32::from(minutes) * 60,
        _ if data[15] == 0  => i32::from(minutes) * 60,
        _                   => return Err(Error::out_of_range(kind)),
    };

    let offset = FixedOffset::east_opt(offset)
        .ok_or(Error::out_of_range(kind))?;

    let nanos = u32::try_from(nanos)
        .map_err(|_| Error::out_of_range(kind))?;

    let utc = seconds.checked_sub(UNIX_TO_INTERNAL)
        .and_then(|s| DateTime::from_timestamp(s, nanos))
        .ok_or(Error::out_of_range(kind))?;

    Ok(utc.with_timezone(&offset))
}

/// Copies a slice whose length has already been checked into an array.
fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(bytes);
    out
}
