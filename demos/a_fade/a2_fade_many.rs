#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

//! Staggered fades on four pins from one tick source.

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::Timer;
use soft_analog::{
    Result,
    pin_bus::{OutputBank, PinId},
    soft_pwm::{Request, SoftPwm},
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

const PINS: [PinId; 4] = [2, 3, 4, 5];

type Pwm = SoftPwm<OutputBank<'static, 4>>;
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
    bank.add(3, p.PIN_3)?;
    bank.add(4, p.PIN_4)?;
    bank.add(5, p.PIN_5)?;

    let pwm: &'static Pwm = PWM.init(SoftPwm::new(bank, 10_000)?);
    spawner
        .spawn(tick_task(pwm))
        .map_err(soft_analog::Error::TaskSpawn)?;

    let mut base: u16 = 0;
    loop {
        for (index, pin) in PINS.iter().enumerate() {
            let value = (base + index as u16 * 64) % 256;
            pwm.request(*pin, Request::Duty(value));
        }
        base = (base + 4) % 256;
        Timer::after_millis(20).await;
    }
}
