//! Fixed-interval status toggle multiplexed onto the PWM tick.

use crate::pin_bus::{Level, PinBus, PinId};

/// A free-running countdown that toggles one pin every fixed interval.
///
/// Deliberately independent of the PWM slot table: it shares only the tick,
/// not slot state, so releasing or rebinding channels never disturbs it.
pub(crate) struct Heartbeat {
    pin: PinId,
    reload: u32,
    remaining: u32,
    level: Level,
}

impl Heartbeat {
    /// A heartbeat on `pin` toggling every `interval_ms` of wall-clock time
    /// at the given tick rate. Intervals shorter than one tick round up to
    /// one.
    pub(crate) fn new(pin: PinId, interval_ms: u32, tick_hz: u32) -> Self {
        let reload = (interval_ms.saturating_mul(tick_hz) / 1000).max(1);
        Self {
            pin,
            reload,
            remaining: reload,
            level: Level::Low,
        }
    }

    /// Count one tick; on expiry, toggle the pin and restart the countdown.
    pub(crate) fn tick<B: PinBus>(&mut self, bus: &mut B) {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.level = self.level.toggled();
            bus.set_level(self.pin, self.level);
            self.remaining = self.reload;
        }
    }
}
