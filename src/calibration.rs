//! Duty-cycle calibration for non-linear loads.
//!
//! A bare duty ramp looks wrong on most real loads: LED luminance, for
//! example, rises steeply at low duty and saturates near the top, so a
//! linear sweep appears to jump to full brightness early. A
//! [`CalibrationTable`] records the measured response at
//! [`CALIBRATION_POINTS`] evenly spaced duty values, and
//! [`Calibration::apply`] inverts it with piecewise-linear interpolation so
//! the *requested* value behaves linearly.
//!
//! Calibration is a runtime choice on the engine: pass
//! [`Calibration::Linear`] (the default) for raw pass-through, or
//! [`Calibration::Table`] with a measured table.
//!
//! # Example
//!
//! ```rust
//! use soft_analog::calibration::{Calibration, CalibrationTable};
//!
//! let calibration = Calibration::Table(CalibrationTable::led_response());
//! assert_eq!(calibration.apply(0), 0); // endpoints pass through
//! assert_eq!(calibration.apply(255), 255);
//! assert!(calibration.apply(128) < 128); // midrange is pulled down
//! ```

use crate::soft_pwm::MAX_DUTY;
use crate::{Error, Result};

/// Number of samples in a [`CalibrationTable`], covering `0..=MAX_DUTY` in
/// equal steps.
pub const CALIBRATION_POINTS: usize = 17;

/// Duty-value distance between adjacent table samples.
const STEP: u16 = MAX_DUTY / (CALIBRATION_POINTS as u16 - 1);

/// Measured-style LED luminance response: steep at low duty, saturating near
/// full duty. Inverting it yields a perceptually even fade.
const LED_RESPONSE: [u16; CALIBRATION_POINTS] = [
    0, 30, 58, 84, 108, 130, 150, 168, 184, 198, 211, 222, 231, 239, 246, 252, 256,
];

/// How requested duty values map to emitted duty values.
///
/// See the [module documentation](self) for background and an example.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Calibration {
    /// No correction; requested values are emitted unchanged.
    #[default]
    Linear,
    /// Piecewise-linear correction against a measured response table.
    Table(CalibrationTable),
}

impl Calibration {
    /// Correct a raw duty value in `0..MAX_DUTY`.
    ///
    /// The boundary values `0` and `MAX_DUTY - 1` always pass through
    /// unchanged, so "off" stays off and "full" stays full regardless of the
    /// table.
    #[must_use]
    pub fn apply(&self, raw: u16) -> u16 {
        match self {
            Self::Linear => raw,
            Self::Table(table) => table.correct(raw),
        }
    }
}

/// A validated, strictly increasing response table spanning `0..=MAX_DUTY`.
///
/// Construct with [`CalibrationTable::new`] (validated once, per the
/// fail-at-initialization policy) or use the [`led_response`](Self::led_response)
/// preset. See the [module documentation](self) for an example.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct CalibrationTable {
    samples: [u16; CALIBRATION_POINTS],
}

impl CalibrationTable {
    /// Create a table from measured response samples.
    ///
    /// `samples[i]` is the observed response at duty `i * 16`. The table must
    /// start at `0`, end at `MAX_DUTY`, and be strictly increasing;
    /// interpolation against anything else is meaningless, so malformed
    /// tables are rejected here rather than checked per lookup.
    ///
    /// # Errors
    ///
    /// [`Error::CalibrationEndpoints`] if the first sample is not `0` or the
    /// last is not `MAX_DUTY`; [`Error::CalibrationNotMonotonic`] at the first
    /// sample that fails to increase.
    pub fn new(samples: [u16; CALIBRATION_POINTS]) -> Result<Self> {
        if samples[0] != 0 || samples[CALIBRATION_POINTS - 1] != MAX_DUTY {
            return Err(Error::CalibrationEndpoints);
        }
        for index in 1..CALIBRATION_POINTS {
            if samples[index] <= samples[index - 1] {
                return Err(Error::CalibrationNotMonotonic { index });
            }
        }
        Ok(Self { samples })
    }

    /// A typical LED luminance curve, usable without measuring your own.
    #[must_use]
    pub const fn led_response() -> Self {
        Self {
            samples: LED_RESPONSE,
        }
    }

    /// Invert the response table for one raw duty value.
    ///
    /// Finds the first sample exceeding `raw` and interpolates linearly
    /// within the preceding interval. Boundary inputs bypass the table so the
    /// search never needs an out-of-range neighbor.
    fn correct(&self, raw: u16) -> u16 {
        if raw == 0 || raw == MAX_DUTY - 1 {
            return raw;
        }
        debug_assert!(raw < MAX_DUTY);
        let mut upper = 1;
        // Terminates: the last sample is MAX_DUTY, strictly above any raw.
        while self.samples[upper] <= raw {
            upper += 1;
        }
        let lower = upper - 1;
        let span = self.samples[upper] - self.samples[lower];
        lower as u16 * STEP + (raw - self.samples[lower]) * STEP / span
    }
}
