//! Outbound capability of the external transport.
//!
//! The link core never talks to a BLE stack directly; it issues requests
//! through this trait and receives their results later via the completion
//! entry points on [`ConnectionManager`](crate::link::manager::ConnectionManager).
//! The firmware supplies a SoftDevice-backed implementation, the host
//! tests a recording mock.

use crate::error::TransportError;
use crate::link::record::{ConnParams, PhyMode};

/// Requests the link core issues to the external transport.
///
/// Every request except [`current_params`](Self::current_params) is
/// asynchronous and fire-and-forget: `Ok(())` means the transport accepted
/// it, nothing more. There is no way to cancel an accepted request;
/// a torn-down connection voids its eventual completion through the
/// record generation check instead.
pub trait LinkTransport {
    /// Connection parameters currently in effect on the given link.
    /// Synchronous; a transport that cannot read them returns defaults.
    fn current_params(&mut self, handle: u16) -> ConnParams;

    /// Ask for a PHY change, per direction.
    fn request_phy(&mut self, handle: u16, tx: PhyMode, rx: PhyMode) -> Result<(), TransportError>;

    /// Ask for a link-layer data length change (octets / microseconds).
    fn request_data_length(
        &mut self,
        handle: u16,
        tx_octets: u16,
        tx_time_us: u16,
    ) -> Result<(), TransportError>;

    /// Start an ATT MTU exchange.
    fn request_mtu_exchange(&mut self, handle: u16) -> Result<(), TransportError>;

    /// Send a notification on the given attribute handle.
    fn send_notification(&mut self, channel: u16, payload: &[u8]) -> Result<(), TransportError>;
}
