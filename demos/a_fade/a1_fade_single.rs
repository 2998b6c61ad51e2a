#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

//! Fade one LED on GPIO 2 up and down with calibrated software PWM.

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::Timer;
use soft_analog::{
    Result,
    calibration::{Calibration, CalibrationTable},
    pin_bus::OutputBank,
    soft_pwm::{Request, SoftPwm},
};
use static_cell::StaticCell;
use {defmt::info, defmt_rtt as _, panic_probe as _};

type Pwm = SoftPwm<OutputBank<'static, 1>>;
static PWM: StaticCell<Pwm> = StaticCell::new();

#[embassy_executor::task]
async fn tick_task(pwm: &'static Pwm) -> ! {
    pwm.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let mut bank = OutputBank::new();
    bank.add(2, p.PIN_2)?;

    let pwm: &'static Pwm = PWM.init(
        SoftPwm::new(bank, 10_000)?
            .with_calibration(Calibration::Table(CalibrationTable::led_response())),
    );
    info!("software PWM at {} Hz visible rate", pwm.pwm_hz());
    spawner
        .spawn(tick_task(pwm))
        .map_err(soft_analog::Error::TaskSpawn)?;

    loop {
        for value in (0..256u16).step_by(4) {
            pwm.request(2, Request::Duty(value));
            Timer::after_millis(20).await;
        }
        for value in (0..256u16).rev().step_by(4) {
            pwm.request(2, Request::Duty(value));
            Timer::after_millis(20).await;
        }
    }
}
