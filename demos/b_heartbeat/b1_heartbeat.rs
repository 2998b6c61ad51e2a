#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

//! Status heartbeat on the Pico LED pin alongside one dimmed channel.

use core::{convert::Infallible, future, panic};
use embassy_executor::Spawner;
use soft_analog::{
    Result,
    pin_bus::OutputBank,
    soft_pwm::{Request, SoftPwm},
};
use static_cell::StaticCell;
use {defmt::info, defmt_rtt as _, panic_probe as _};

type Pwm = SoftPwm<OutputBank<'static, 2>>;
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
    bank.add(25, p.PIN_25)?; // onboard LED (non-W boards)
    bank.add(2, p.PIN_2)?;

    let pwm: &'static Pwm = PWM.init(SoftPwm::new(bank, 10_000)?.with_heartbeat(25, 500));
    info!("heartbeat every 500 ms, dim channel on GPIO 2");
    spawner
        .spawn(tick_task(pwm))
        .map_err(soft_analog::Error::TaskSpawn)?;

    pwm.request(2, Request::Duty(32));

    future::pending().await
}
