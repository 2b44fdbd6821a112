//! btn2ble firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Bring-up order matters: Embassy is initialised with its interrupt
//! priorities lowered (the SoftDevice reserves the highest ones), then
//! the SoftDevice is enabled, then the tasks are spawned. Advertising
//! and everything after it lives in the BLE task.

#![no_std]
#![no_main]

mod ble;
mod ui;

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::interrupt::Priority;
use panic_probe as _;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut hal_config = embassy_nrf::config::Config::default();
    hal_config.gpiote_interrupt_priority = Priority::P2;
    hal_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(hal_config);

    info!("btn2ble starting");

    let sd = ble::enable_softdevice();
    let server = unwrap!(ble::gatt::Server::new(sd));
    spawner.must_spawn(ble::softdevice_task(sd));

    spawner.must_spawn(ui::leds::run_status_task(p.P0_13.degrade()));
    spawner.must_spawn(ui::buttons::button_task(p.P0_11.degrade()));

    spawner.must_spawn(ble::ble_task(
        sd,
        server,
        p.P0_14.degrade(), // link LED
        p.P0_15.degrade(), // user LED
    ));
}
