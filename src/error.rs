//! Crate-wide error and result types.

use crate::soft_pwm::MAX_DUTY;

/// Result type with this crate's [`Error`] as the default error.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced at initialization time.
///
/// Steady-state paths (`request`, `on_tick`) never return errors; capacity
/// exhaustion is reported through
/// [`RequestOutcome`](crate::soft_pwm::RequestOutcome) and the dropped-request
/// counter instead.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The requested tick rate is not a whole number of microseconds, so the
    /// periodic timer cannot honor it exactly.
    #[display("tick rate of {requested_hz} Hz is not achievable by the timer")]
    TickRate {
        /// The rate that was requested, in Hz.
        requested_hz: u32,
    },

    /// A calibration table does not start at `0` and end at `MAX_DUTY`.
    #[display("calibration table must span 0..={}", MAX_DUTY)]
    CalibrationEndpoints,

    /// A calibration table is not strictly increasing.
    #[display("calibration table is not strictly increasing at sample {index}")]
    CalibrationNotMonotonic {
        /// Index of the first sample that fails the monotonicity check.
        index: usize,
    },

    /// The pin bank has no room for another pin.
    #[display("pin bank is full")]
    PinBankFull,

    /// A pin id was added to a pin bank twice.
    #[display("pin {pin} is already in the bank")]
    DuplicatePin {
        /// The duplicated pin id.
        pin: u8,
    },

    /// An embassy task could not be spawned.
    #[display("task spawn failed")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}
