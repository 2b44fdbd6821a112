//! Connection record: identity and negotiated parameters of the live link.

use crate::config;

/// Identity of one connection attempt.
///
/// The generation increments on every successful connect and is never
/// reused, so a negotiation completion that raced a disconnect can be
/// recognised as stale instead of mutating a newer (or absent) link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnId {
    /// Transport connection handle.
    pub handle: u16,
    /// Monotonic connect counter, unique across the process lifetime.
    pub generation: u32,
}

/// Connection timing parameters as reported by the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnParams {
    /// Connection interval (1.25 ms units).
    pub interval: u16,
    /// Peripheral latency (connection events the peripheral may skip).
    pub latency: u16,
    /// Supervision timeout (10 ms units).
    pub timeout: u16,
}

impl ConnParams {
    /// Connection interval in microseconds.
    pub fn interval_us(&self) -> u32 {
        u32::from(self.interval) * config::CONN_INTERVAL_UNIT_US
    }

    /// Supervision timeout in milliseconds.
    pub fn timeout_ms(&self) -> u32 {
        u32::from(self.timeout) * config::SUPERVISION_TIMEOUT_UNIT_MS
    }
}

/// Radio PHY mode of one direction of the link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyMode {
    /// Not negotiated yet.
    #[default]
    Unknown,
    /// 1 Mbit/s (mandatory baseline).
    OneM,
    /// 2 Mbit/s high-rate mode.
    TwoM,
    /// Long-range coded PHY, S=2.
    CodedS2,
    /// Long-range coded PHY, S=8.
    CodedS8,
}

impl PhyMode {
    /// Map a GAP PHY value (bit per mode) to a mode. The coded PHY
    /// reports as S=8 here, the default coding.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => PhyMode::OneM,
            0x02 => PhyMode::TwoM,
            0x04 => PhyMode::CodedS8,
            _ => PhyMode::Unknown,
        }
    }

    /// The GAP PHY value to put in an update request.
    pub fn to_raw(self) -> u8 {
        match self {
            PhyMode::Unknown => 0x00,
            PhyMode::OneM => 0x01,
            PhyMode::TwoM => 0x02,
            PhyMode::CodedS2 | PhyMode::CodedS8 => 0x04,
        }
    }

    /// Display name for logs.
    pub fn name(self) -> &'static str {
        match self {
            PhyMode::Unknown => "unknown",
            PhyMode::OneM => "1M PHY",
            PhyMode::TwoM => "2M PHY",
            PhyMode::CodedS2 => "Coded PHY, S=2",
            PhyMode::CodedS8 => "Coded PHY, S=8",
        }
    }
}

/// Per-direction PHY modes of the link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyInfo {
    pub tx: PhyMode,
    pub rx: PhyMode,
}

/// Link-layer data length in effect, per direction (octets / microseconds).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataLength {
    pub tx_octets: u16,
    pub tx_time_us: u16,
    pub rx_octets: u16,
    pub rx_time_us: u16,
}

impl Default for DataLength {
    fn default() -> Self {
        Self {
            tx_octets: config::DATA_LENGTH_DEFAULT_OCTETS,
            tx_time_us: config::DATA_LENGTH_DEFAULT_TIME_US,
            rx_octets: config::DATA_LENGTH_DEFAULT_OCTETS,
            rx_time_us: config::DATA_LENGTH_DEFAULT_TIME_US,
        }
    }
}

/// Everything we track about the single live connection.
///
/// Created on a successful connect with every negotiable field at its
/// link-layer default; the negotiation completions fill the fields in as
/// they arrive. Dropped wholesale on disconnect, whatever the reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionRecord {
    pub id: ConnId,
    pub params: ConnParams,
    pub phy: PhyInfo,
    pub data_length: DataLength,
    /// Negotiated ATT MTU minus the ATT header; 0 until the exchange
    /// completes.
    pub usable_mtu: u16,
}

impl ConnectionRecord {
    pub fn new(id: ConnId, params: ConnParams) -> Self {
        Self {
            id,
            params,
            phy: PhyInfo::default(),
            data_length: DataLength::default(),
            usable_mtu: 0,
        }
    }
}
