//! Shared test double: a `PinBus` that records pin modes and levels.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use soft_analog::pin_bus::{Level, PinBus, PinId};
use soft_analog::soft_pwm::SoftPwm;

#[derive(Default)]
struct BusState {
    levels: BTreeMap<PinId, Level>,
    outputs: BTreeSet<PinId>,
}

/// Records every `configure_output`/`set_level` call; clones share state, so
/// the engine can own one handle while the test observes through another.
#[derive(Clone, Default)]
pub struct RecordingBus(Rc<RefCell<BusState>>);

impl RecordingBus {
    pub fn level(&self, pin: PinId) -> Level {
        self.0
            .borrow()
            .levels
            .get(&pin)
            .copied()
            .unwrap_or(Level::Low)
    }

    pub fn is_output(&self, pin: PinId) -> bool {
        self.0.borrow().outputs.contains(&pin)
    }
}

impl PinBus for RecordingBus {
    fn configure_output(&mut self, pin: PinId) {
        self.0.borrow_mut().outputs.insert(pin);
    }

    fn set_level(&mut self, pin: PinId, level: Level) {
        self.0.borrow_mut().levels.insert(pin, level);
    }
}

/// Run `ticks` ticks and count those where `pin` reads high afterward.
pub fn high_ticks<const SLOTS: usize>(
    pwm: &SoftPwm<RecordingBus, SLOTS>,
    bus: &RecordingBus,
    pin: PinId,
    ticks: usize,
) -> usize {
    (0..ticks)
        .filter(|_| {
            pwm.on_tick();
            bus.level(pin) == Level::High
        })
        .count()
}
