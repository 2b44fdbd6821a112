//! Post-connect link negotiation.
//!
//! Right after a central connects we ask for the best link the radio
//! supports: symmetric 2M PHY, maximum link-layer data length, and an
//! ATT MTU exchange. The three requests go out back to back without
//! waiting on each other; the link layer acknowledges each one
//! independently, so completions arrive in any order - or never, if the
//! peer disconnects first. Every completion carries the generation of
//! the connection it was issued for and is discarded when that
//! generation is no longer the live one.

use crate::config;
use crate::error::{LinkError, NegotiationKind};
use crate::link::manager::LinkStats;
use crate::link::record::{ConnectionRecord, DataLength, PhyInfo, PhyMode};
use crate::link::transport::LinkTransport;

/// Issues the negotiation requests and applies their completions.
///
/// Stateless apart from the request policy: in-flight completions are
/// identified by the record generation alone, so a disconnect needs no
/// explicit cancellation here.
pub struct NegotiationSequencer {
    /// PHY requested for both directions.
    preferred_phy: PhyMode,
    /// Link-layer payload size requested (octets).
    tx_octets: u16,
    /// Link-layer time per payload requested (µs).
    tx_time_us: u16,
}

impl Default for NegotiationSequencer {
    fn default() -> Self {
        Self {
            preferred_phy: PhyMode::TwoM,
            tx_octets: config::DATA_LENGTH_MAX_OCTETS,
            tx_time_us: config::DATA_LENGTH_MAX_TIME_US,
        }
    }
}

impl NegotiationSequencer {
    /// Fire the PHY, data length and MTU requests for a fresh connection,
    /// in that order, without waiting for completions. A request the
    /// transport rejects is counted and skipped; the rest still go out.
    pub fn start<T: LinkTransport>(
        &self,
        transport: &mut T,
        record: &ConnectionRecord,
        stats: &mut LinkStats,
    ) {
        let handle = record.id.handle;
        if transport
            .request_phy(handle, self.preferred_phy, self.preferred_phy)
            .is_err()
        {
            stats.negotiation_failures += 1;
        }
        if transport
            .request_data_length(handle, self.tx_octets, self.tx_time_us)
            .is_err()
        {
            stats.negotiation_failures += 1;
        }
        if transport.request_mtu_exchange(handle).is_err() {
            stats.negotiation_failures += 1;
        }
    }

    /// Apply a PHY update completion.
    pub fn on_phy_complete(
        &self,
        slot: Option<&mut ConnectionRecord>,
        generation: u32,
        result: Result<PhyInfo, u8>,
        stats: &mut LinkStats,
    ) -> Result<(), LinkError> {
        let Some(record) = live(slot, generation, stats) else {
            return Ok(());
        };
        match result {
            Ok(phy) => {
                record.phy = phy;
                Ok(())
            }
            Err(status) => {
                stats.negotiation_failures += 1;
                Err(LinkError::NegotiationFailed {
                    kind: NegotiationKind::Phy,
                    status,
                })
            }
        }
    }

    /// Apply a data length update completion.
    pub fn on_data_length_complete(
        &self,
        slot: Option<&mut ConnectionRecord>,
        generation: u32,
        result: Result<DataLength, u8>,
        stats: &mut LinkStats,
    ) -> Result<(), LinkError> {
        let Some(record) = live(slot, generation, stats) else {
            return Ok(());
        };
        match result {
            Ok(data_length) => {
                record.data_length = data_length;
                Ok(())
            }
            Err(status) => {
                stats.negotiation_failures += 1;
                Err(LinkError::NegotiationFailed {
                    kind: NegotiationKind::DataLength,
                    status,
                })
            }
        }
    }

    /// Apply an MTU exchange completion. The record stores the usable
    /// payload size: the negotiated MTU minus the ATT header.
    pub fn on_mtu_complete(
        &self,
        slot: Option<&mut ConnectionRecord>,
        generation: u32,
        result: Result<u16, u8>,
        stats: &mut LinkStats,
    ) -> Result<(), LinkError> {
        let Some(record) = live(slot, generation, stats) else {
            return Ok(());
        };
        match result {
            Ok(mtu) => {
                record.usable_mtu = mtu.saturating_sub(config::ATT_HEADER_SIZE);
                Ok(())
            }
            Err(status) => {
                stats.negotiation_failures += 1;
                Err(LinkError::NegotiationFailed {
                    kind: NegotiationKind::Mtu,
                    status,
                })
            }
        }
    }
}

/// The record a completion belongs to, provided it is still the live one.
/// A mismatch means the connection was torn down (and possibly replaced)
/// while the request was in flight; the completion must not touch the
/// record in that case.
fn live<'a>(
    slot: Option<&'a mut ConnectionRecord>,
    generation: u32,
    stats: &mut LinkStats,
) -> Option<&'a mut ConnectionRecord> {
    match slot {
        Some(record) if record.id.generation == generation => Some(record),
        _ => {
            stats.stale_completions += 1;
            None
        }
    }
}
