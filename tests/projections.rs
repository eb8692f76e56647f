use chrono::{Datelike, FixedOffset, TimeZone, Timelike, Utc};

use datetime_parts::{Date, DateTime, TimeOfDay};
use datetime_parts::{DatePiece, TimePiece, Month, Offset, Weekday};


fn zone(hours: i8, minutes: i8) -> Offset {
    Offset::of_hours_and_minutes(hours, minutes).unwrap()
}


#[test]
fn date_from_instant_has_no_clock() {
    let when = FixedOffset::east_opt(3 * 3600).unwrap()
        .with_ymd_and_hms(2015, 6, 26, 17, 45, 12).unwrap();
    let instant = Date::from_instant(&when).to_instant();

    assert_eq!((instant.hour(), instant.minute(), instant.second(), instant.nanosecond()), (0, 0, 0, 0));
    assert_eq!(instant.offset().local_minus_utc(), 0);
    assert_eq!((instant.year(), instant.month(), instant.day()), (2015, 6, 26));
}

#[test]
fn time_from_instant_has_no_date() {
    let when = Utc.with_ymd_and_hms(2015, 6, 26, 17, 45, 12).unwrap();
    let instant = TimeOfDay::from_instant(&when).to_instant();

    assert_eq!((instant.year(), instant.month(), instant.day()), (0, 1, 1));
    assert_eq!((instant.hour(), instant.minute(), instant.second()), (17, 45, 12));
}

#[test]
fn time_in_another_zone_still_pins_the_date() {
    let time = TimeOfDay::new(2, 0, 0, 0, Offset::utc()).unwrap().in_zone(zone(-5, 0));
    let instant = time.to_instant();

    assert_eq!((instant.year(), instant.month(), instant.day()), (0, 1, 1));
    assert_eq!(instant.hour(), 21);
}

#[test]
fn datetime_to_date() {
    let when = DateTime::new(2015, Month::June, 26, 17, 45, 12, 0, zone(3, 0)).unwrap();
    let date = when.to_date();

    assert_eq!(date.ymd(), (2015, Month::June, 26));
    assert_eq!(date.weekday(), Weekday::Fri);
}

#[test]
fn datetime_to_time() {
    let when = DateTime::new(2015, Month::June, 26, 17, 45, 12, 345, zone(3, 0)).unwrap();
    let time = when.to_time();

    assert_eq!(time.clock(), (17, 45, 12));
    assert_eq!(time.nanosecond(), 345);
    assert_eq!(time.offset(), zone(3, 0));
}

#[test]
fn date_from_unix_goes_through_utc() {
    // 01:30 UTC on the 2nd is still the 1st in any zone west of UTC.
    let date = Date::from_unix(946_776_600, 0).unwrap();
    assert_eq!(date, Date::new(2000, Month::January, 2).unwrap());
}

#[test]
fn time_from_unix_goes_through_utc() {
    let time = TimeOfDay::from_unix(946_776_600, 0).unwrap();
    assert_eq!(time.clock(), (1, 30, 0));
    assert!(time.offset().is_utc());
}

#[test]
fn datetime_from_unix_is_the_same_moment() {
    let when = DateTime::from_unix(946_776_600, 0).unwrap();
    assert_eq!(when.unix(), 946_776_600);
    assert_eq!(when.utc().hour(), 1);
}

#[test]
fn datetime_to_instant_is_itself() {
    let when = DateTime::new(2015, Month::June, 26, 17, 45, 12, 0, zone(3, 0)).unwrap();
    assert_eq!(DateTime::from(when.to_instant()), when);
    assert_eq!(DateTime::from_instant(&when.to_instant()).offset(), zone(3, 0));
}

#[test]
fn now_agrees() {
    let date = Date::today();
    let time = TimeOfDay::now();
    let when = DateTime::now();

    assert!(!date.is_zero());
    assert!(when.year() >= date.year() - 1);
    assert!(time.hour() < 24);
}
