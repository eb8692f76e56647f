use datetime_parts::{Date, Error, Kind, Month};


fn ymd(year: i32, month: Month, day: u32) -> Date {
    Date::new(year, month, day).unwrap()
}


#[test]
fn four_bytes_little_endian() {
    let bytes = ymd(2000, Month::January, 2).to_binary();

    // 2000 | 1 << 14 | 2 << 18
    assert_eq!(bytes, [0xD0, 0x47, 0x08, 0x00]);
}

#[test]
fn decodes() {
    let date = Date::from_binary(&[0xD0, 0x47, 0x08, 0x00]).unwrap();
    assert_eq!(date, ymd(2000, Month::January, 2));
}

#[test]
fn highest_year() {
    let date = ymd(16_383, Month::December, 31);
    assert_eq!(Date::from_binary(&date.to_binary()).unwrap(), date);
}

#[test]
fn year_zero() {
    let date = ymd(0, Month::February, 29);
    assert_eq!(Date::from_binary(&date.to_binary()).unwrap(), date);
}

#[test]
fn high_bits_ignored() {
    let mut bytes = ymd(2000, Month::January, 2).to_binary();
    bytes[3] |= 0x80;
    assert_eq!(Date::from_binary(&bytes).unwrap(), ymd(2000, Month::January, 2));
}

#[test]
fn too_short() {
    match Date::from_binary(&[0xD0, 0x47, 0x08]) {
        Err(Error::ByteLength { kind, expected, actual }) => {
            assert_eq!(kind, Kind::Date);
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn too_long() {
    assert!(matches!(Date::from_binary(&[0; 5]), Err(Error::ByteLength { actual: 5, .. })));
}

#[test]
fn impossible_day_carries() {
    // 2023, February, 30
    let packed: u32 = 2023 | (2 << 14) | (30 << 18);
    assert_eq!(Date::from_binary(&packed.to_le_bytes()).unwrap(), ymd(2023, Month::March, 2));
}

#[test]
fn thirteenth_month_carries() {
    let packed: u32 = 1999 | (13 << 14) | (31 << 18);
    assert_eq!(Date::from_binary(&packed.to_le_bytes()).unwrap(), ymd(2000, Month::January, 31));
}

#[test]
fn all_zero_bits() {
    // Year 0, month 0, day 0 is the 30th of November, year -1.
    assert_eq!(Date::from_binary(&[0; 4]).unwrap(), ymd(-1, Month::November, 30));
}

#[test]
fn unmarshal_overwrites() {
    let mut date = Date::default();
    date.unmarshal_binary(&ymd(1999, Month::December, 31).to_binary()).unwrap();
    assert_eq!(date, ymd(1999, Month::December, 31));
}

#[test]
fn error_message() {
    let err = Date::from_binary(&[]).unwrap_err();
    assert_eq!(err.to_string(), "failed to unmarshal date, incorrect number of bytes: expected 4, got 0");
}
