#![cfg(feature = "serde")]

use datetime_parts::{Date, DateTime, TimeOfDay, Month, Offset, TimePiece};
use serde::{Deserialize, Serialize};


#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Shift {
    day: Date,
    starts: TimeOfDay,
    logged: DateTime,
}

fn shift() -> Shift {
    Shift {
        day: Date::new(2000, Month::January, 2).unwrap(),
        starts: TimeOfDay::new(9, 30, 0, 0, Offset::utc()).unwrap(),
        logged: DateTime::new(2000, Month::January, 2, 9, 31, 15, 0, Offset::utc()).unwrap(),
    }
}


#[test]
fn struct_fields_are_strings() {
    let json = serde_json::to_value(shift()).unwrap();
    assert_eq!(json, serde_json::json!({
        "day": "2000-01-02",
        "starts": "09:30:00Z",
        "logged": "2000-01-02T09:31:15Z",
    }));
}

#[test]
fn struct_round_trip() {
    let text = serde_json::to_string(&shift()).unwrap();
    let back: Shift = serde_json::from_str(&text).unwrap();
    assert_eq!(back, shift());
}

#[test]
fn struct_rejects_bad_field() {
    let text = r#"{"day":"2000-1-2","starts":"09:30:00Z","logged":"2000-01-02T09:31:15Z"}"#;
    assert!(serde_json::from_str::<Shift>(text).is_err());
}

#[test]
fn date_helpers() {
    let date = Date::from_json(r#""2000-01-02""#).unwrap();
    assert_eq!(date.to_json().unwrap(), r#""2000-01-02""#);
}

#[test]
fn time_keeps_offset() {
    let time = TimeOfDay::from_json(r#""09:30:00+05:30""#).unwrap();
    assert_eq!(time.offset(), Offset::of_hours_and_minutes(5, 30).unwrap());
    assert_eq!(time.hour(), 9);
}

#[test]
fn datetime_rejects_null() {
    assert!(DateTime::from_json("null").is_err());
}

#[test]
fn unmarshal_keeps_value_on_failure() {
    let mut date = Date::new(2000, Month::January, 2).unwrap();
    assert!(date.unmarshal_json(r#""2000-02-30""#).is_err());
    assert_eq!(date, Date::new(2000, Month::January, 2).unwrap());
}
