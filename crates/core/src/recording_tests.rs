// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    first = { "rec_0.bin", 0 },
    multi_digit = { "rec_12.bin", 12 },
    leading_zero = { "rec_007.bin", 7 },
    other_extension = { "rec_3.dat", 3 },
)]
fn parses_valid_names(name: &str, expected: u32) {
    assert_eq!(parse_recording_name(name), Ok(expected));
}

#[parameterized(
    extra_underscore = { "rec_1_2.bin" },
    extra_dot = { "rec_1.tar.gz" },
    no_extension = { "rec_1" },
    no_index = { "rec_.bin" },
    negative = { "rec_-1.bin" },
    trailing_text = { "rec_1a.bin" },
    overflow = { "rec_99999999999.bin" },
)]
fn rejects_malformed_names(name: &str) {
    assert!(matches!(
        parse_recording_name(name),
        Err(CoordinateError::Unparseable(_))
    ));
}

#[test]
fn recording_prefix_detection() {
    assert!(is_recording_name("rec_1.bin"));
    assert!(is_recording_name("rec_junk"));
    assert!(!is_recording_name("notes.txt"));
    assert!(!is_recording_name("products"));
}

#[test]
fn recording_state_point_fits_schema() {
    let sp = recording_state_point("a", 2);
    assert!(crate::CoordinateSchema::recording().validate(&sp).is_ok());
    assert_eq!(sp.get(RECORDING_INDEX).and_then(|v| v.as_int()), Some(2));
}
