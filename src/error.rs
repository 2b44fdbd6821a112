//! Unified error type for btn2ble.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! `defmt::Format` is derived when the firmware feature set is enabled
//! for efficient on-target logging.
//!
//! Every error here is non-fatal by design: the link core reports it to
//! the caller (who logs it) and moves on. Fatal conditions, such as
//! failing to start advertising, belong to the firmware bring-up path.

/// Which negotiation step a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NegotiationKind {
    /// Radio PHY mode update.
    Phy,
    /// Link-layer data length update.
    DataLength,
    /// ATT MTU exchange.
    Mtu,
}

/// Subset of transport rejections we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Raw error code from the underlying stack.
    Raw(u32),
    /// No live connection behind the given handle.
    NotConnected,
    /// The stack refused the request (queue full, notifications disabled, ...).
    Rejected,
}

/// Top-level error type used across the link core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The transport reported a failed connection attempt.
    /// Scoped to that attempt; the caller resumes advertising.
    ConnectFailed { status: u8 },

    /// A negotiation completion carried a failure status. The record
    /// field stays at its default and the step is not retried.
    NegotiationFailed { kind: NegotiationKind, status: u8 },

    /// The button-state notification was rejected by the transport.
    /// Not retried; the next input event sends independently.
    SendFailed { error: TransportError },
}
