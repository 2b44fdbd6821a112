//! Connection lifecycle management.
//!
//! Single-threaded and callback-dispatched: every handler runs to
//! completion, every transport request returns immediately. Only one
//! link is ever live, so the record needs no lock - the generation check
//! in the negotiation sequencer stands in for one by voiding completions
//! of torn-down connections.

use crate::error::LinkError;
use crate::link::negotiation::NegotiationSequencer;
use crate::link::notify::NotificationChannel;
use crate::link::record::{ConnId, ConnParams, ConnectionRecord, DataLength, PhyInfo};
use crate::link::transport::LinkTransport;
use crate::link::LinkState;

/// Diagnostics counters. All monotonic, reported only - nothing in the
/// core branches on them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Links torn down, for any reason.
    pub disconnects: u32,
    /// Connection attempts the transport reported as failed.
    pub connect_failures: u32,
    /// Negotiation requests rejected at issue time or failed on completion.
    pub negotiation_failures: u32,
    /// Completions discarded because their generation was no longer live.
    pub stale_completions: u32,
    /// Notifications the transport refused to send.
    pub send_failures: u32,
    /// Input events observed with no central connected.
    pub dropped_inputs: u32,
}

/// Exclusive owner of the connection record and entry point for every
/// transport event.
///
/// The record slot is an owned `Option`: acquired on a successful
/// connect, released on any disconnect. Collaborators read and mutate it
/// through this type only and never hold a copy across an event boundary.
pub struct ConnectionManager<T: LinkTransport> {
    transport: T,
    slot: Option<ConnectionRecord>,
    next_generation: u32,
    negotiation: NegotiationSequencer,
    notifier: NotificationChannel,
    stats: LinkStats,
}

impl<T: LinkTransport> ConnectionManager<T> {
    /// `notify_channel` is the attribute handle button-state
    /// notifications go out on.
    pub fn new(transport: T, notify_channel: u16) -> Self {
        Self {
            transport,
            slot: None,
            next_generation: 0,
            negotiation: NegotiationSequencer::default(),
            notifier: NotificationChannel::new(notify_channel),
            stats: LinkStats::default(),
        }
    }

    pub fn state(&self) -> LinkState {
        if self.slot.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    /// The live record, if a central is connected.
    pub fn record(&self) -> Option<&ConnectionRecord> {
        self.slot.as_ref()
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Access to the injected transport, for callers that own
    /// transport-side state (the firmware attaches the live connection
    /// here between connect and disconnect).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// A connection attempt finished. `status` 0 means the link is up;
    /// anything else terminates only that attempt and leaves the manager
    /// untouched (resuming advertising is the caller's business).
    ///
    /// On success the manager reads the parameters currently in effect,
    /// stores a record under a fresh generation and fires the
    /// negotiation triple.
    pub fn on_connect(&mut self, handle: u16, status: u8) -> Result<(), LinkError> {
        if status != 0 {
            self.stats.connect_failures += 1;
            return Err(LinkError::ConnectFailed { status });
        }

        // A displaced record (a single-peer transport never does this)
        // simply goes stale: its generation can no longer match.
        self.next_generation += 1;
        let id = ConnId {
            handle,
            generation: self.next_generation,
        };
        let params = self.transport.current_params(handle);
        let record = ConnectionRecord::new(id, params);

        self.negotiation
            .start(&mut self.transport, &record, &mut self.stats);
        self.slot = Some(record);
        Ok(())
    }

    /// The link dropped. Ignored unless `handle` matches the live
    /// record. The reason code is diagnostics-only; the caller logs it
    /// and it never branches logic here. Any in-flight negotiation
    /// completion for the dropped generation becomes a no-op.
    pub fn on_disconnect(&mut self, handle: u16, _reason: u8) {
        match &self.slot {
            Some(record) if record.id.handle == handle => {
                self.slot = None;
                self.stats.disconnects += 1;
            }
            _ => {}
        }
    }

    /// Unsolicited connection parameter update from the peer or stack.
    /// May arrive any number of times while connected.
    pub fn on_param_updated(&mut self, interval: u16, latency: u16, timeout: u16) {
        if let Some(record) = self.slot.as_mut() {
            record.params = ConnParams {
                interval,
                latency,
                timeout,
            };
        }
    }

    /// PHY negotiation completed for the given generation.
    pub fn on_phy_updated(
        &mut self,
        generation: u32,
        result: Result<PhyInfo, u8>,
    ) -> Result<(), LinkError> {
        self.negotiation
            .on_phy_complete(self.slot.as_mut(), generation, result, &mut self.stats)
    }

    /// Data length negotiation completed for the given generation.
    pub fn on_data_length_updated(
        &mut self,
        generation: u32,
        result: Result<DataLength, u8>,
    ) -> Result<(), LinkError> {
        self.negotiation.on_data_length_complete(
            self.slot.as_mut(),
            generation,
            result,
            &mut self.stats,
        )
    }

    /// ATT MTU exchange completed for the given generation. On success
    /// the record stores the negotiated MTU minus the ATT header.
    pub fn on_mtu_exchange_done(
        &mut self,
        generation: u32,
        result: Result<u16, u8>,
    ) -> Result<(), LinkError> {
        self.negotiation
            .on_mtu_complete(self.slot.as_mut(), generation, result, &mut self.stats)
    }

    /// An input edge from the outside world (the user button).
    pub fn on_input_event(&mut self, asserted: bool) -> Result<(), LinkError> {
        self.notifier.on_input_event(
            &mut self.transport,
            self.slot.as_ref(),
            asserted,
            &mut self.stats,
        )
    }
}
