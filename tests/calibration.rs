#![allow(missing_docs)]
//! Host-level tests for the duty-calibration table and lookup.

use soft_analog::Error;
use soft_analog::calibration::{CALIBRATION_POINTS, Calibration, CalibrationTable};
use soft_analog::soft_pwm::MAX_DUTY;

const LED: [u16; CALIBRATION_POINTS] = [
    0, 30, 58, 84, 108, 130, 150, 168, 184, 198, 211, 222, 231, 239, 246, 252, 256,
];

fn identity_samples() -> [u16; CALIBRATION_POINTS] {
    let mut samples = [0u16; CALIBRATION_POINTS];
    for (index, sample) in samples.iter_mut().enumerate() {
        *sample = index as u16 * 16;
    }
    samples
}

#[test]
fn linear_is_identity_everywhere() {
    let calibration = Calibration::Linear;
    for raw in 0..MAX_DUTY {
        assert_eq!(calibration.apply(raw), raw);
    }
}

#[test]
fn table_passes_boundaries_through() {
    let calibration = Calibration::Table(CalibrationTable::led_response());
    assert_eq!(calibration.apply(0), 0);
    assert_eq!(calibration.apply(MAX_DUTY - 1), MAX_DUTY - 1);
}

#[test]
fn table_is_monotone_and_in_range() {
    let calibration = Calibration::Table(CalibrationTable::led_response());
    let mut previous = 0;
    for raw in 0..MAX_DUTY {
        let corrected = calibration.apply(raw);
        assert!(corrected < MAX_DUTY, "apply({raw}) = {corrected} out of range");
        assert!(
            corrected >= previous,
            "apply({raw}) = {corrected} dropped below {previous}"
        );
        previous = corrected;
    }
}

#[test]
fn interpolation_matches_hand_computation() {
    let calibration = Calibration::Table(CalibrationTable::led_response());
    // 128 falls between samples 108 (index 4) and 130 (index 5):
    // 4*16 + (128-108)*16/22 = 64 + 14 = 78
    assert_eq!(calibration.apply(128), 78);
    // 16 falls between samples 0 and 30: 0 + 16*16/30 = 8
    assert_eq!(calibration.apply(16), 8);
}

#[test]
fn identity_shaped_table_is_identity() {
    let table = CalibrationTable::new(identity_samples()).unwrap();
    let calibration = Calibration::Table(table);
    for raw in 0..MAX_DUTY {
        assert_eq!(calibration.apply(raw), raw);
    }
}

#[test]
fn custom_led_samples_validate() {
    assert!(CalibrationTable::new(LED).is_ok());
}

#[test]
fn rejects_bad_endpoints() {
    let mut samples = identity_samples();
    samples[0] = 1;
    assert!(matches!(
        CalibrationTable::new(samples),
        Err(Error::CalibrationEndpoints)
    ));

    let mut samples = identity_samples();
    samples[CALIBRATION_POINTS - 1] = MAX_DUTY - 1;
    assert!(matches!(
        CalibrationTable::new(samples),
        Err(Error::CalibrationEndpoints)
    ));
}

#[test]
fn rejects_non_monotonic_table() {
    let mut samples = identity_samples();
    samples[7] = samples[6]; // plateau
    assert!(matches!(
        CalibrationTable::new(samples),
        Err(Error::CalibrationNotMonotonic { index: 7 })
    ));

    let mut samples = identity_samples();
    samples[3] = samples[4] + 1; // dip at the following sample
    assert!(matches!(
        CalibrationTable::new(samples),
        Err(Error::CalibrationNotMonotonic { index: 4 })
    ));
}
