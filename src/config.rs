//! Application-wide constants and compile-time configuration.
//!
//! All protocol constants, timing parameters, and hardware pin
//! assignments live here so they can be tuned in one place.

// BLE link negotiation

/// Link-layer payload defaults in effect right after connecting,
/// before a data length update completes (octets / microseconds).
pub const DATA_LENGTH_DEFAULT_OCTETS: u16 = 27;
pub const DATA_LENGTH_DEFAULT_TIME_US: u16 = 328;

/// Maximum link-layer payload we ask for after connecting.
/// 251 octets / 2120 µs is the 4.2+ data length extension ceiling.
pub const DATA_LENGTH_MAX_OCTETS: u16 = 251;
pub const DATA_LENGTH_MAX_TIME_US: u16 = 2120;

/// ATT protocol header size. Usable payload = negotiated MTU - header.
pub const ATT_HEADER_SIZE: u16 = 3;

/// ATT MTU before an exchange completes (BLE spec minimum).
pub const ATT_MTU_DEFAULT: u16 = 23;

/// ATT MTU requested from the stack at enable time.
pub const ATT_MTU_REQUESTED: u16 = 247;

/// Connection interval is reported in 1.25 ms units,
/// supervision timeout in 10 ms units.
pub const CONN_INTERVAL_UNIT_US: u32 = 1250;
pub const SUPERVISION_TIMEOUT_UNIT_MS: u32 = 10;

// Advertising

/// GAP device name carried in the advertising payload.
pub const DEVICE_NAME: &str = "btn2ble";

/// Fast advertising interval (0.625 ms units). 0x60 = 60 ms.
pub const ADV_INTERVAL: u32 = 0x60;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   User button    → P0.11
//   Run status LED → P0.13
//   Link LED       → P0.14
//   User LED       → P0.15

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Run-status LED blink interval (ms).
pub const RUN_LED_BLINK_MS: u64 = 1000;

/// How often the firmware re-reads the live connection for parameter
/// and MTU changes (ms).
pub const LINK_WATCH_INTERVAL_MS: u64 = 500;
