//! Analog-style output on any digital pin via software PWM.
//!
//! The Pico has only 16 true PWM channels, and other boards have fewer. This
//! crate fans a single periodic timer tick out to up to `SLOTS` independent
//! software PWM channels, so any digital pin can emit a calibrated,
//! near-linear brightness/duty signal.
//!
//! # Glossary
//!
//! - **Tick:** one invocation of the periodic callback, the engine's unit of
//!   time. At 10 kHz ticks and 256 duty steps the visible PWM rate is ~39 Hz.
//! - **Slot:** a fixed-capacity table entry representing one emulated analog
//!   output channel.
//! - **Duty value:** ticks out of [`soft_pwm::MAX_DUTY`] that a pin is held
//!   high each period.
//! - **Calibration:** piecewise-linear correction mapping a linear-intent duty
//!   to one that compensates LED/driver non-linearity. See [`calibration`].
//!
//! Start with [`soft_pwm::SoftPwm`].
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time checks: exactly one architecture must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "arm", feature = "riscv")), not(feature = "host")))]
compile_error!("Must enable exactly one architecture feature: 'arm' or 'riscv'");

#[cfg(all(feature = "arm", feature = "riscv"))]
compile_error!("Cannot enable both 'arm' and 'riscv' features simultaneously");

// Compile-time check: pico1 only supports ARM
#[cfg(all(feature = "pico1", feature = "riscv"))]
compile_error!("Pico 1 (RP2040) only supports ARM architecture, not RISC-V");

pub mod calibration;
mod error;
pub mod pin_bus;
pub mod soft_pwm;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
