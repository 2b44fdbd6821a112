//! User button input with async debouncing.
//!
//! One physical button (active-low with internal pull-up). Both edges
//! matter here: press and release each become an input event, and the
//! link core forwards the new state to the peer.

use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};

use btn2ble::config::BUTTON_DEBOUNCE_MS;

/// Debounced button edges for the BLE task: `true` = pressed.
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, bool, 4> = Channel::new();

/// Run the button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, reports the press,
/// then does the same for the release.
#[embassy_executor::task]
pub async fn button_task(pin: AnyPin) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Falling edge: button press (active-low).
        btn.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            info!("button pressed");
            BUTTON_EVENTS.send(true).await;

            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
            info!("button released");
            BUTTON_EVENTS.send(false).await;
        }
    }
}
