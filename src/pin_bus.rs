//! The digital I/O seam between the PWM engine and pin hardware.
//!
//! The engine addresses pins by small integer ids and drives them through the
//! [`PinBus`] trait, so the same engine runs against real GPIO
//! (`OutputBank`, available on hardware builds) and against a recording
//! double in host tests.

/// Logical pin identifier, matching GPIO numbering on the Pico.
pub type PinId = u8;

/// Logical output level of a pin.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Level {
    /// Driven low.
    Low,
    /// Driven high.
    High,
}

impl Level {
    /// The opposite level.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Digital output operations the engine needs from the platform.
///
/// Both methods must be non-blocking and infallible: [`set_level`](Self::set_level)
/// is called from tick (interrupt) context with a hard time budget. Requests
/// for a pin id the bus does not know must be ignored, not panicked on.
pub trait PinBus {
    /// Configure `pin` as a digital output. Called once when a slot binds.
    fn configure_output(&mut self, pin: PinId);

    /// Drive `pin` to `level`.
    fn set_level(&mut self, pin: PinId, level: Level);
}

#[cfg(not(feature = "host"))]
mod bank {
    use embassy_rp::Peri;
    use embassy_rp::gpio::Output;
    use heapless::Vec;

    use super::{Level, PinBus, PinId};
    use crate::{Error, Result};

    impl From<Level> for embassy_rp::gpio::Level {
        fn from(level: Level) -> Self {
            match level {
                Level::Low => Self::Low,
                Level::High => Self::High,
            }
        }
    }

    /// A fixed-capacity [`PinBus`] over `embassy_rp` GPIO outputs.
    ///
    /// Register each pin once with [`add`](Self::add), then hand the bank to
    /// [`SoftPwm::new`](crate::soft_pwm::SoftPwm::new). Lookup is a bounded
    /// linear scan; with the handful of pins a bank holds, that stays well
    /// inside the tick budget and has no worst-case surprises.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut bank: OutputBank<'static, 4> = OutputBank::new();
    /// bank.add(2, p.PIN_2)?;
    /// bank.add(3, p.PIN_3)?;
    /// ```
    pub struct OutputBank<'d, const N: usize> {
        pins: Vec<(PinId, Output<'d>), N>,
    }

    impl<'d, const N: usize> OutputBank<'d, N> {
        /// Create an empty bank.
        #[must_use]
        pub const fn new() -> Self {
            Self { pins: Vec::new() }
        }

        /// Register `pin` under `id`, configured as an output driven low.
        ///
        /// # Errors
        ///
        /// [`Error::DuplicatePin`] if `id` is already registered;
        /// [`Error::PinBankFull`] if all `N` entries are taken.
        pub fn add<P: embassy_rp::gpio::Pin>(&mut self, id: PinId, pin: Peri<'d, P>) -> Result<()> {
            if self.pins.iter().any(|(existing, _)| *existing == id) {
                return Err(Error::DuplicatePin { pin: id });
            }
            let output = Output::new(pin, embassy_rp::gpio::Level::Low);
            self.pins
                .push((id, output))
                .map_err(|_| Error::PinBankFull)?;
            Ok(())
        }
    }

    impl<'d, const N: usize> Default for OutputBank<'d, N> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<'d, const N: usize> PinBus for OutputBank<'d, N> {
        fn configure_output(&mut self, _pin: PinId) {
            // `Output::new` in `add` already configured the pin.
        }

        fn set_level(&mut self, pin: PinId, level: Level) {
            if let Some((_, output)) = self.pins.iter_mut().find(|(id, _)| *id == pin) {
                output.set_level(level.into());
            }
        }
    }
}

#[cfg(not(feature = "host"))]
pub use bank::OutputBank;
