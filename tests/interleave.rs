#![allow(missing_docs)]
//! Interleavings of `request` and `on_tick` must look like some serialization
//! of the two contexts: no torn `(phase, target)` pairs, no stray glitches.

mod common;

use common::{RecordingBus, high_ticks};
use soft_analog::pin_bus::Level;
use soft_analog::soft_pwm::{MAX_DUTY, Request, RequestOutcome, SoftPwm};

const PERIOD: usize = MAX_DUTY as usize;

#[test]
fn update_mid_period_restarts_the_window() {
    let bus = RecordingBus::default();
    let pwm: SoftPwm<RecordingBus, 16> = SoftPwm::new(bus.clone(), 10_000).unwrap();
    pwm.request(5, Request::Duty(64));
    assert_eq!(high_ticks(&pwm, &bus, 5, 32), 32); // mid high-window

    assert_eq!(pwm.request(5, Request::Duty(200)), RequestOutcome::Updated);
    // A fresh period starts at the next tick: exactly 200 high ticks follow.
    assert_eq!(high_ticks(&pwm, &bus, 5, PERIOD), 200);
}

#[test]
fn release_mid_period_silences_the_pin_for_good() {
    let bus = RecordingBus::default();
    let pwm: SoftPwm<RecordingBus, 16> = SoftPwm::new(bus.clone(), 10_000).unwrap();
    pwm.request(5, Request::Duty(250));
    pwm.on_tick();
    assert_eq!(bus.level(5), Level::High);

    pwm.request(5, Request::Release);
    assert_eq!(bus.level(5), Level::Low);
    assert_eq!(high_ticks(&pwm, &bus, 5, 2 * PERIOD), 0);
}

/// Reference model of one slot, stepped in lockstep with the engine.
struct ModelSlot {
    target: u16,
    phase: u16,
    level: Level,
}

impl ModelSlot {
    fn new() -> Self {
        Self {
            target: 0,
            phase: 0,
            level: Level::Low,
        }
    }

    fn request(&mut self, value: u16) {
        self.target = value.min(MAX_DUTY - 1);
        self.phase = 0;
        if self.target == 0 {
            self.level = Level::Low;
        }
    }

    fn tick(&mut self) {
        if self.target == 0 {
            return;
        }
        if self.phase == 0 {
            self.level = Level::High;
        } else if self.phase == self.target {
            self.level = Level::Low;
        }
        self.phase = (self.phase + 1) % MAX_DUTY;
    }
}

#[test]
fn interleaved_requests_match_a_serialized_model() {
    // (tick index, new duty) pairs, deliberately hitting window starts,
    // window ends, zero, and the near-full boundary.
    let schedule: &[(usize, u16)] = &[
        (0, 10),
        (5, 10),   // idempotent repeat
        (17, 255),
        (40, 0),
        (100, 37),
        (137, 37), // idempotent repeat mid-window
        (300, 256),
        (555, 1),
    ];

    let bus = RecordingBus::default();
    let pwm: SoftPwm<RecordingBus, 16> = SoftPwm::new(bus.clone(), 10_000).unwrap();
    let mut model = ModelSlot::new();
    let mut next = 0;

    for tick in 0..800 {
        if next < schedule.len() && schedule[next].0 == tick {
            let value = schedule[next].1;
            let outcome = pwm.request(5, Request::Duty(value));
            assert_ne!(outcome, RequestOutcome::TableFull);
            if outcome != RequestOutcome::Unchanged {
                model.request(value);
            }
            next += 1;
        }
        pwm.on_tick();
        model.tick();
        assert_eq!(bus.level(5), model.level, "tick {tick}");
    }
}
