//! The software PWM engine: a fixed-capacity slot table driven by a periodic
//! tick.
//!
//! [`SoftPwm`] owns a table of `SLOTS` channel slots and a [`PinBus`]. Two
//! entry points exist, one per execution context:
//!
//! - [`request`](SoftPwm::request) runs in normal (main) context; it binds,
//!   updates, or releases a pin's duty cycle.
//! - [`on_tick`](SoftPwm::on_tick) runs in periodic (interrupt) context; it
//!   decides each pin's level for the current tick and advances its phase.
//!
//! Both take the same critical-section mutex, so a slot's `(target, phase)`
//! pair is always observed as a unit; every interleaving of the two contexts
//! is equivalent to some serialization. The tick path is bounded and
//! infallible: no allocation, no blocking, no logging.
//!
//! # Example
//!
//! ```rust
//! use soft_analog::pin_bus::{Level, PinBus, PinId};
//! use soft_analog::soft_pwm::{Request, RequestOutcome, SoftPwm};
//!
//! struct NullBus;
//! impl PinBus for NullBus {
//!     fn configure_output(&mut self, _pin: PinId) {}
//!     fn set_level(&mut self, _pin: PinId, _level: Level) {}
//! }
//!
//! let pwm: SoftPwm<NullBus> = SoftPwm::new(NullBus, 10_000)?;
//! assert_eq!(pwm.request(5, Request::Duty(128)), RequestOutcome::Bound);
//! pwm.on_tick(); // normally driven by `run()` or a timer interrupt
//! assert_eq!(pwm.request(5, Request::Release), RequestOutcome::Released);
//! # Ok::<(), soft_analog::Error>(())
//! ```
//!
//! On hardware, spawn [`run`](SoftPwm::run) as its own task, ideally on an
//! interrupt executor so ticks preempt application code:
//!
//! ```rust,ignore
//! type Pwm = SoftPwm<OutputBank<'static, 4>>;
//! static PWM: StaticCell<Pwm> = StaticCell::new();
//!
//! #[embassy_executor::task]
//! async fn tick_task(pwm: &'static Pwm) -> ! {
//!     pwm.run().await
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use portable_atomic::{AtomicU32, Ordering};

use crate::calibration::Calibration;
use crate::pin_bus::{Level, PinBus, PinId};
use crate::{Error, Result};

mod heartbeat;

use heartbeat::Heartbeat;

/// Duty-cycle resolution: quantization steps per PWM period.
///
/// Duty values live in `0..MAX_DUTY`; the visible PWM frequency is
/// `tick_hz / MAX_DUTY`.
pub const MAX_DUTY: u16 = 256;

/// Default number of channel slots.
pub const DEFAULT_SLOTS: usize = 16;

// ============================================================================
// Request / RequestOutcome
// ============================================================================

/// What a caller wants a pin to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Request {
    /// Emit this duty value, clamped to `0..MAX_DUTY`.
    Duty(u16),
    /// Free the pin's slot and drive the pin low.
    Release,
}

/// What [`SoftPwm::request`] did.
///
/// Steady-state failures are reported here rather than as errors: a full
/// table must not crash or disturb other slots, but callers should be able to
/// see it (`TableFull` is also counted, see
/// [`dropped_requests`](SoftPwm::dropped_requests)).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum RequestOutcome {
    /// A free slot was bound to the pin.
    Bound,
    /// The pin's existing slot took a new duty value.
    Updated,
    /// No-op: the value matched the last accepted request, or a release
    /// named an unbound pin.
    Unchanged,
    /// The pin's slot was freed.
    Released,
    /// No free slot; the request was dropped.
    TableFull,
}

// ============================================================================
// Slot
// ============================================================================

/// One software PWM channel.
///
/// `phase` counts ticks within the period and always stays in `0..MAX_DUTY`.
/// `requested` holds the raw (pre-calibration) value so repeated identical
/// requests can be suppressed without re-deriving the calibration.
#[derive(Clone, Copy, Debug)]
struct Slot {
    pin: Option<PinId>,
    target: u16,
    requested: u16,
    phase: u16,
}

impl Slot {
    const FREE: Self = Self {
        pin: None,
        target: 0,
        requested: 0,
        phase: 0,
    };
}

// ============================================================================
// SoftPwm engine
// ============================================================================

/// State shared between the two execution contexts, guarded as a unit.
struct Shared<B: PinBus, const SLOTS: usize> {
    bus: B,
    slots: [Slot; SLOTS],
    heartbeat: Option<Heartbeat>,
}

/// Software PWM engine over `SLOTS` virtual channels on a [`PinBus`].
///
/// See the [module documentation](self) for an overview and examples.
pub struct SoftPwm<B: PinBus, const SLOTS: usize = DEFAULT_SLOTS> {
    shared: Mutex<CriticalSectionRawMutex, RefCell<Shared<B, SLOTS>>>,
    calibration: Calibration,
    tick_hz: u32,
    dropped: AtomicU32,
}

impl<B: PinBus, const SLOTS: usize> SoftPwm<B, SLOTS> {
    /// Create an engine ticking at `tick_hz`, with linear (uncalibrated)
    /// duty response.
    ///
    /// All slots exist up front; nothing allocates after this call.
    ///
    /// # Errors
    ///
    /// [`Error::TickRate`] if `tick_hz` is zero or not a whole number of
    /// microseconds per tick. The periodic timer could not honor such a rate,
    /// and relying on ticks that never arrive must fail here, not later.
    pub fn new(bus: B, tick_hz: u32) -> Result<Self> {
        if tick_hz == 0 || tick_hz > 1_000_000 || 1_000_000 % tick_hz != 0 {
            return Err(Error::TickRate {
                requested_hz: tick_hz,
            });
        }
        Ok(Self {
            shared: Mutex::new(RefCell::new(Shared {
                bus,
                slots: [Slot::FREE; SLOTS],
                heartbeat: None,
            })),
            calibration: Calibration::Linear,
            tick_hz,
            dropped: AtomicU32::new(0),
        })
    }

    /// Replace the duty calibration (default is [`Calibration::Linear`]).
    #[must_use]
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Toggle a status pin every `interval_ms`, multiplexed onto the same
    /// tick as the PWM slots but independent of them.
    ///
    /// The pin starts low and is configured as an output here.
    #[must_use]
    pub fn with_heartbeat(self, pin: PinId, interval_ms: u32) -> Self {
        self.shared.lock(|shared| {
            let mut shared = shared.borrow_mut();
            shared.bus.configure_output(pin);
            shared.bus.set_level(pin, Level::Low);
            shared.heartbeat = Some(Heartbeat::new(pin, interval_ms, self.tick_hz));
        });
        self
    }

    /// Bind, update, or release the software PWM channel for `pin`.
    ///
    /// Runs in normal (non-interrupt) context. Never blocks and never
    /// allocates; all slot writes happen inside one critical section, so the
    /// tick dispatcher cannot observe a half-updated slot.
    ///
    /// Duty values are clamped to `0..MAX_DUTY`. Re-requesting the value a
    /// slot already carries is a no-op ([`RequestOutcome::Unchanged`]) and
    /// does not disturb the running waveform. A new value is calibrated,
    /// written, and restarts the period (`phase` resets to zero).
    ///
    /// When every slot is taken, the request is dropped:
    /// [`RequestOutcome::TableFull`] is returned, a warning is logged, and
    /// [`dropped_requests`](Self::dropped_requests) increments.
    pub fn request(&self, pin: PinId, request: Request) -> RequestOutcome {
        let outcome = self.shared.lock(|shared| {
            let mut shared = shared.borrow_mut();
            let shared = &mut *shared;
            match request {
                Request::Release => Self::release(shared, pin),
                Request::Duty(value) => {
                    let value = value.min(MAX_DUTY - 1);
                    self.set_duty(shared, pin, value)
                }
            }
        });
        if outcome == RequestOutcome::TableFull {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            #[cfg(not(feature = "host"))]
            defmt::warn!("soft-pwm: all {} slots in use, pin {} dropped", SLOTS, pin);
        }
        outcome
    }

    fn release(shared: &mut Shared<B, SLOTS>, pin: PinId) -> RequestOutcome {
        let Some(slot) = shared.slots.iter_mut().find(|slot| slot.pin == Some(pin)) else {
            return RequestOutcome::Unchanged;
        };
        *slot = Slot::FREE;
        shared.bus.set_level(pin, Level::Low);
        RequestOutcome::Released
    }

    fn set_duty(&self, shared: &mut Shared<B, SLOTS>, pin: PinId, value: u16) -> RequestOutcome {
        if let Some(slot) = shared.slots.iter_mut().find(|slot| slot.pin == Some(pin)) {
            if slot.requested == value {
                return RequestOutcome::Unchanged;
            }
            slot.target = self.calibration.apply(value);
            slot.requested = value;
            slot.phase = 0;
            if slot.target == 0 {
                // The dispatcher skips zero-duty slots, so make "off" true
                // now even if the pin is mid-period high.
                shared.bus.set_level(pin, Level::Low);
            }
            return RequestOutcome::Updated;
        }

        let Some(slot) = shared.slots.iter_mut().find(|slot| slot.pin.is_none()) else {
            return RequestOutcome::TableFull;
        };
        shared.bus.configure_output(pin);
        shared.bus.set_level(pin, Level::Low);
        *slot = Slot {
            pin: Some(pin),
            target: self.calibration.apply(value),
            requested: value,
            phase: 0,
        };
        RequestOutcome::Bound
    }

    /// Advance every channel by one tick.
    ///
    /// Runs in periodic (interrupt) context at `tick_hz`; bounded linear
    /// scan, no allocation, no logging, infallible.
    ///
    /// Each active slot with a nonzero target goes high at phase 0 and low
    /// at `phase == target`, giving a rectangular wave with duty ratio
    /// `target / MAX_DUTY`. A target of `MAX_DUTY - 1` therefore stays high
    /// for all but one tick per period; confirm against observed waveforms
    /// if that single low tick matters for your load.
    pub fn on_tick(&self) {
        self.shared.lock(|shared| {
            let mut shared = shared.borrow_mut();
            let shared = &mut *shared;
            for slot in &mut shared.slots {
                let Some(pin) = slot.pin else { continue };
                if slot.target == 0 {
                    // Zero duty: pin stays low, phase stays frozen at 0.
                    continue;
                }
                if slot.phase == 0 {
                    shared.bus.set_level(pin, Level::High);
                } else if slot.phase == slot.target {
                    shared.bus.set_level(pin, Level::Low);
                }
                slot.phase = (slot.phase + 1) % MAX_DUTY;
            }
            if let Some(heartbeat) = &mut shared.heartbeat {
                heartbeat.tick(&mut shared.bus);
            }
        });
    }

    /// Tick rate in Hz.
    #[must_use]
    pub const fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Visible PWM frequency in Hz: `tick_hz / MAX_DUTY`.
    #[must_use]
    pub const fn pwm_hz(&self) -> u32 {
        self.tick_hz / MAX_DUTY as u32
    }

    /// Number of requests dropped because the slot table was full.
    #[must_use]
    pub fn dropped_requests(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Number of slots currently bound to a pin.
    #[must_use]
    pub fn active_channels(&self) -> usize {
        self.shared.lock(|shared| {
            shared
                .borrow()
                .slots
                .iter()
                .filter(|slot| slot.pin.is_some())
                .count()
        })
    }

    /// Drive [`on_tick`](Self::on_tick) from an embassy [`Ticker`] at the
    /// configured tick rate.
    ///
    /// Spawn this on an interrupt executor if application tasks may run for
    /// longer than one tick; on a thread executor, long-running peers will
    /// add jitter to the waveform.
    ///
    /// [`Ticker`]: embassy_time::Ticker
    #[cfg(not(feature = "host"))]
    pub async fn run(&self) -> ! {
        let period = embassy_time::Duration::from_micros(u64::from(1_000_000 / self.tick_hz));
        let mut ticker = embassy_time::Ticker::every(period);
        loop {
            ticker.next().await;
            self.on_tick();
        }
    }
}
