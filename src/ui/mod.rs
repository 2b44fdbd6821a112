//! Board I/O: the user button and the status LEDs.

pub mod buttons;
pub mod leds;
