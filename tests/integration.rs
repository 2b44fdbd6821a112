//! Integration tests for the btn2ble link core: full event sequences
//! driven through the public API, the way the firmware dispatcher
//! drives it.

use btn2ble::error::TransportError;
use btn2ble::link::record::{ConnParams, PhyMode};
use btn2ble::link::transport::LinkTransport;
use btn2ble::link::{ConnectionManager, LinkState};

const BTN_CHANNEL: u16 = 0x0015;

/// Flat log of outbound traffic, one tag per request.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Outbound {
    Phy,
    DataLength,
    MtuExchange,
    Notify(heapless::Vec<u8, 4>),
}

#[derive(Default)]
struct RecordingTransport {
    outbound: Vec<Outbound>,
}

impl LinkTransport for RecordingTransport {
    fn current_params(&mut self, _handle: u16) -> ConnParams {
        ConnParams {
            interval: 24,
            latency: 0,
            timeout: 400,
        }
    }

    fn request_phy(&mut self, _h: u16, _tx: PhyMode, _rx: PhyMode) -> Result<(), TransportError> {
        self.outbound.push(Outbound::Phy);
        Ok(())
    }

    fn request_data_length(&mut self, _h: u16, _o: u16, _t: u16) -> Result<(), TransportError> {
        self.outbound.push(Outbound::DataLength);
        Ok(())
    }

    fn request_mtu_exchange(&mut self, _h: u16) -> Result<(), TransportError> {
        self.outbound.push(Outbound::MtuExchange);
        Ok(())
    }

    fn send_notification(&mut self, _c: u16, payload: &[u8]) -> Result<(), TransportError> {
        self.outbound
            .push(Outbound::Notify(heapless::Vec::from_slice(payload).unwrap()));
        Ok(())
    }
}

fn manager() -> ConnectionManager<RecordingTransport> {
    ConnectionManager::new(RecordingTransport::default(), BTN_CHANNEL)
}

#[test]
fn full_session_scenario() {
    let mut mgr = manager();

    // Central connects: exactly the PHY / data length / MTU triple goes out.
    mgr.on_connect(1, 0).unwrap();
    assert_eq!(mgr.state(), LinkState::Connected);
    assert_eq!(
        mgr.transport_mut().outbound,
        [Outbound::Phy, Outbound::DataLength, Outbound::MtuExchange]
    );

    // MTU exchange completes at 247: 244 usable after the ATT header.
    let generation = mgr.record().unwrap().id.generation;
    mgr.on_mtu_exchange_done(generation, Ok(247)).unwrap();
    assert_eq!(mgr.record().unwrap().usable_mtu, 244);

    // Button press: exactly one notification, payload [1].
    mgr.on_input_event(true).unwrap();
    let last = mgr.transport_mut().outbound.last().cloned().unwrap();
    assert_eq!(
        last,
        Outbound::Notify(heapless::Vec::from_slice(&[1]).unwrap())
    );
    assert_eq!(mgr.transport_mut().outbound.len(), 4);

    // Supervision timeout (reason 8): everything negotiated is gone.
    mgr.on_disconnect(1, 0x08);
    assert_eq!(mgr.state(), LinkState::Disconnected);
    assert!(mgr.record().is_none());
}

#[test]
fn connect_disconnect_round_trip_is_observably_pristine() {
    let mut mgr = manager();

    mgr.on_connect(1, 0).unwrap();
    mgr.on_disconnect(1, 0x16);

    assert_eq!(mgr.state(), LinkState::Disconnected);
    assert!(mgr.record().is_none());

    // A fresh connect starts negotiation from scratch.
    mgr.on_connect(1, 0).unwrap();
    let record = mgr.record().unwrap();
    assert_eq!(record.usable_mtu, 0);
    assert_eq!(record.data_length.tx_octets, 27);
}

#[test]
fn negotiation_race_with_disconnect_is_harmless() {
    let mut mgr = manager();

    // First session: negotiation is still in flight when the peer drops.
    mgr.on_connect(1, 0).unwrap();
    let stale = mgr.record().unwrap().id.generation;
    mgr.on_disconnect(1, 0x13);

    // Second session comes up before the old completions land.
    mgr.on_connect(1, 0).unwrap();
    let live = mgr.record().unwrap().id.generation;
    assert!(live > stale);

    // The late completions of the first session change nothing.
    mgr.on_mtu_exchange_done(stale, Ok(247)).unwrap();
    mgr.on_phy_updated(stale, Err(0x3b)).unwrap();
    assert_eq!(mgr.record().unwrap().usable_mtu, 0);
    assert_eq!(mgr.stats().stale_completions, 2);

    // The live session's completions still apply.
    mgr.on_mtu_exchange_done(live, Ok(185)).unwrap();
    assert_eq!(mgr.record().unwrap().usable_mtu, 182);
}

#[test]
fn button_events_only_reach_a_live_link() {
    let mut mgr = manager();

    // No central: dropped without a trace on the wire.
    mgr.on_input_event(true).unwrap();
    assert!(mgr.transport_mut().outbound.is_empty());

    mgr.on_connect(1, 0).unwrap();
    mgr.on_input_event(true).unwrap();
    mgr.on_input_event(false).unwrap();
    mgr.on_disconnect(1, 0x13);
    mgr.on_input_event(true).unwrap();

    let notifies: Vec<_> = mgr
        .transport_mut()
        .outbound
        .iter()
        .filter_map(|o| match o {
            Outbound::Notify(payload) => Some(payload.as_slice().to_vec()),
            _ => None,
        })
        .collect();
    assert_eq!(notifies, [vec![1], vec![0]]);
    assert_eq!(mgr.stats().dropped_inputs, 2);
}
