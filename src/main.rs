//! FM Receiver Main Application
//!
//! Entry point for the STM32G474 + Si4703 RDS receiver.
//! Powers up the tuner, starts the register poller and feeds every fresh
//! snapshot to the receiver core.

#![no_std]
#![no_main]

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rds_tuner::drivers::si4703::Si4703;
use rds_tuner::prelude::*;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

type Tuner = Si4703<I2c<'static, Async>>;
type Registers = SharedRegisters<CriticalSectionRawMutex, Tuner>;

static REGISTERS: StaticCell<Registers> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RDS Receiver Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let mut p = embassy_stm32::init(config);

    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // Reset with SDIO held low selects the 2-wire interface
    let mut reset = Output::new(p.PA8, Level::Low, Speed::Low);
    {
        let _sdio = Output::new(&mut p.PB9, Level::Low, Speed::Low);
        Timer::after(Duration::from_millis(RESET_HOLD_MS)).await;
        reset.set_high();
        Timer::after(Duration::from_millis(RESET_HOLD_MS)).await;
    }

    // PB8 = SCL, PB9 = SDA for I2C1 on STM32G474
    let i2c = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    info!("I2C1 initialized at {} Hz", I2C_FREQUENCY_HZ);

    let mut delay = Delay;
    let mut tuner = Si4703::new(i2c);
    if let Err(e) = tuner.power_up(&mut delay, DEFAULT_VOLUME).await {
        error!("Si4703 power-up failed: {}", e);
    }

    let registers: &'static Registers = REGISTERS.init(SharedRegisters::new(tuner));

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(poller_task(registers)).unwrap();

    let mut receiver = Receiver::new();
    let start = default_frequency().unwrap_or(FmFrequency::MIN);
    if let Err(e) = receiver.tune(registers, &mut delay, start.as_mhz_f32()).await {
        warn!("Initial tune failed: {}", e);
    }

    loop {
        let snapshot = registers.wait_fresh().await;
        if receiver.on_snapshot(&snapshot).any() {
            let view = receiver.view();
            info!(
                "{} {=str} [{=str}] '{=str}' {=str}",
                view.signal,
                view.call_sign(),
                view.program_type_name(),
                view.station.program_service(),
                view.station.radiotext()
            );
        }
    }
}

/// Register poller - samples the tuner every 40 ms
#[embassy_executor::task]
async fn poller_task(registers: &'static Registers) {
    registers.run_poller().await
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
