//! GATT server definition: the button service.
//!
//! Same layout as Nordic's LED Button Service: a button-state
//! characteristic the central subscribes to for notifications, and a
//! writable characteristic driving the user LED.

/// 128-bit UUID of the button service, advertised in the scan response.
pub const BUTTON_SERVICE_UUID: u128 = 0x00001523_1212_efde_1523_785feabcd123;

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub btn: ButtonService,
}

#[nrf_softdevice::gatt_service(uuid = "00001523-1212-efde-1523-785feabcd123")]
pub struct ButtonService {
    /// Button state: 1 pressed, 0 released.
    #[characteristic(uuid = "00001524-1212-efde-1523-785feabcd123", read, notify)]
    pub button_state: u8,

    /// LED control: any nonzero write lights the user LED.
    #[characteristic(uuid = "00001525-1212-efde-1523-785feabcd123", read, write)]
    pub led: u8,
}

impl Server {
    /// Attribute handle button-state notifications go out on.
    pub fn button_state_handle(&self) -> u16 {
        self.btn.button_state_value_handle
    }
}
