//! Fixed offsets from UTC, which act as the zone of times and date-times.

use std::fmt;

use chrono::{FixedOffset, Local, Offset as _, TimeZone};

use crate::error::OffsetError;
use crate::instant::{self, Instant};


/// An **offset** is a fixed distance from UTC, in whole minutes.
///
/// Every text layout writes offsets to the minute, so an offset with
/// leftover seconds could not be read back. Offsets taken from chrono
/// values or the local zone drop those seconds instead.
///
/// There is no time zone database behind it: a value that should follow a
/// zone’s daylight-saving rules has to be given the offset in force at the
/// moment it describes, which `Offset::local_at` does for the local zone.
#[derive(PartialEq, Eq, Hash, Copy, Clone)]
pub struct Offset {
    fixed: FixedOffset,
}

impl Offset {

    pub fn utc() -> Self {
        Self { fixed: chrono::Utc.fix() }
    }

    /// Creates an offset of the given number of seconds east of UTC, which
    /// has to be a whole number of minutes.
    pub fn of_seconds(seconds: i32) -> Result<Self, OffsetError> {
        match FixedOffset::east_opt(seconds) {
            None                            => Err(OffsetError::OutOfRange),
            Some(_) if seconds % 60 != 0    => Err(OffsetError::SubMinute),
            Some(fixed)                     => Ok(Self { fixed }),
        }
    }

    /// Creates an offset of the given hours and minutes east of UTC. Both
    /// have to carry the same sign.
    pub fn of_hours_and_minutes(hours: i8, minutes: i8) -> Result<Self, OffsetError> {
        if (hours.is_positive() && minutes.is_negative())
        || (hours.is_negative() && minutes.is_positive()) {
            Err(OffsetError::SignMismatch)
        }
        else if hours <= -24 || hours >= 24 || minutes <= -60 || minutes >= 60 {
            Err(OffsetError::OutOfRange)
        }
        else {
            let hours = i32::from(hours);
            let minutes = i32::from(minutes);
            Self::of_seconds(hours * (60 * 60) + minutes * 60)
        }
    }

    /// The offset the local zone had in force at the given moment.
    pub fn local_at(instant: &Instant) -> Self {
        let fixed = Local.offset_from_utc_datetime(&instant.naive_utc()).fix();
        Self { fixed: instant::whole_minutes(fixed) }
    }

    pub fn is_utc(self) -> bool {
        self.total_seconds() == 0
    }

    pub fn is_negative(self) -> bool {
        self.total_seconds() < 0
    }

    pub fn total_seconds(self) -> i32 {
        self.fixed.local_minus_utc()
    }

    pub fn hours(self) -> i8 {
        (self.total_seconds() / 60 / 60) as i8
    }

    pub fn minutes(self) -> i8 {
        (self.total_seconds() / 60 % 60) as i8
    }

    pub fn fixed(self) -> FixedOffset {
        self.fixed
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::utc()
    }
}

/// Drops any seconds left over after the last whole minute.
impl From<FixedOffset> for Offset {
    fn from(fixed: FixedOffset) -> Self {
        Self { fixed: instant::whole_minutes(fixed) }
    }
}

impl From<Offset> for FixedOffset {
    fn from(offset: Offset) -> Self {
        offset.fixed
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_utc() {
            return f.write_str("Z");
        }

        let sign = if self.is_negative() { '-' } else { '+' };
        write!(f, "{}{:02}:{:02}", sign, self.hours().abs(), self.minutes().abs())
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Offset({})", self)
    }
}


#[cfg(test)]
mod test {
    use super::Offset;
    use crate::error::OffsetError;

    #[test]
    fn fixed_seconds() {
        assert!(Offset::of_seconds(1260).is_ok());
    }

    #[test]
    fn fixed_seconds_between_minutes() {
        assert_eq!(Offset::of_seconds(1234), Err(OffsetError::SubMinute));
        assert_eq!(Offset::of_seconds(-1521), Err(OffsetError::SubMinute));
    }

    #[test]
    fn from_fixed_drops_seconds() {
        let fixed = chrono::FixedOffset::west_opt(25 * 60 + 21).unwrap();
        assert_eq!(Offset::from(fixed).total_seconds(), -25 * 60);
    }

    #[test]
    fn fixed_seconds_err() {
        assert_eq!(Offset::of_seconds(100_000), Err(OffsetError::OutOfRange));
    }

    #[test]
    fn fixed_hm() {
        assert!(Offset::of_hours_and_minutes(5, 30).is_ok());
    }

    #[test]
    fn fixed_hm_negative() {
        let offset = Offset::of_hours_and_minutes(-3, -45).unwrap();
        assert_eq!(offset.total_seconds(), -(3 * 3600 + 45 * 60));
        assert!(offset.is_negative());
    }

    #[test]
    fn fixed_hm_err() {
        assert_eq!(Offset::of_hours_and_minutes(8, 60), Err(OffsetError::OutOfRange));
    }

    #[test]
    fn fixed_hm_signs() {
        assert_eq!(Offset::of_hours_and_minutes(-4, 30), Err(OffsetError::SignMismatch));
    }

    #[test]
    fn fixed_hm_signs_zero() {
        assert!(Offset::of_hours_and_minutes(4, 0).is_ok());
    }

    #[test]
    fn debug_zulu() {
        let offset = Offset::utc();
        let debugged = format!("{:?}", offset);
        assert_eq!(debugged, "Offset(Z)");
    }

    #[test]
    fn debug_offset() {
        let offset = Offset::of_seconds(-25 * 60).unwrap();
        let debugged = format!("{:?}", offset);
        assert_eq!(debugged, "Offset(-00:25)");
    }

    #[test]
    fn display_whole_hours() {
        let offset = Offset::of_hours_and_minutes(-7, 0).unwrap();
        assert_eq!(offset.to_string(), "-07:00");
    }

    #[test]
    fn local_is_whole_minutes() {
        let instant = chrono::DateTime::from_timestamp(946_771_200, 0).unwrap().fixed_offset();
        let offset = Offset::local_at(&instant);
        assert!(offset.total_seconds().abs() < 86_400);
        assert_eq!(offset.total_seconds() % 60, 0);
    }
}
