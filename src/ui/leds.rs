//! Status LEDs.
//!
//! The run-status LED blinks while the firmware is alive. The link LED
//! (on while a central is connected) and the user LED (driven by peer
//! writes) are owned by the BLE task.

use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_time::{Duration, Timer};

use btn2ble::config::RUN_LED_BLINK_MS;

/// Blink the run-status LED at a steady rate (active-low).
#[embassy_executor::task]
pub async fn run_status_task(pin: AnyPin) -> ! {
    let mut led = Output::new(pin, Level::High, OutputDrive::Standard);

    loop {
        led.toggle();
        Timer::after(Duration::from_millis(RUN_LED_BLINK_MS)).await;
    }
}
