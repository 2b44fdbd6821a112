//! SoftDevice-backed implementation of the link transport.
//!
//! Requests map onto raw GAP/GATTC calls; the SoftDevice acknowledges
//! them immediately and completes them asynchronously, which is exactly
//! the contract [`LinkTransport`] promises the core. Rejections are
//! logged here, at the point where the raw error code is available, and
//! reported upward as [`TransportError`].

use defmt::warn;
use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::{raw, RawError};

use btn2ble::config;
use btn2ble::error::TransportError;
use btn2ble::link::record::{ConnParams, PhyMode};
use btn2ble::link::transport::LinkTransport;

/// The live connection all requests are issued against. Attached by the
/// BLE task right after a central connects, detached on disconnect.
pub struct SoftdeviceTransport {
    conn: Option<Connection>,
}

impl SoftdeviceTransport {
    pub const fn new() -> Self {
        Self { conn: None }
    }

    pub fn attach(&mut self, conn: Connection) {
        self.conn = Some(conn);
    }

    pub fn detach(&mut self) {
        self.conn = None;
    }

    fn check_live(&self, handle: u16) -> Result<(), TransportError> {
        match self.conn.as_ref().and_then(Connection::handle) {
            Some(live) if live == handle => Ok(()),
            _ => Err(TransportError::NotConnected),
        }
    }
}

impl LinkTransport for SoftdeviceTransport {
    fn current_params(&mut self, _handle: u16) -> ConnParams {
        match self.conn.as_ref() {
            Some(conn) => {
                let params = conn.conn_params();
                ConnParams {
                    interval: params.max_conn_interval,
                    latency: params.slave_latency,
                    timeout: params.conn_sup_timeout,
                }
            }
            None => ConnParams::default(),
        }
    }

    fn request_phy(&mut self, handle: u16, tx: PhyMode, rx: PhyMode) -> Result<(), TransportError> {
        self.check_live(handle)?;
        let phys = raw::ble_gap_phys_t {
            tx_phys: tx.to_raw(),
            rx_phys: rx.to_raw(),
        };
        let ret = unsafe { raw::sd_ble_gap_phy_update(handle, &phys) };
        check("sd_ble_gap_phy_update", ret)
    }

    fn request_data_length(
        &mut self,
        handle: u16,
        tx_octets: u16,
        tx_time_us: u16,
    ) -> Result<(), TransportError> {
        self.check_live(handle)?;
        let params = raw::ble_gap_data_length_params_t {
            max_tx_octets: tx_octets,
            max_rx_octets: tx_octets,
            max_tx_time_us: tx_time_us,
            max_rx_time_us: tx_time_us,
        };
        let ret =
            unsafe { raw::sd_ble_gap_data_length_update(handle, &params, core::ptr::null_mut()) };
        check("sd_ble_gap_data_length_update", ret)
    }

    fn request_mtu_exchange(&mut self, handle: u16) -> Result<(), TransportError> {
        self.check_live(handle)?;
        let ret =
            unsafe { raw::sd_ble_gattc_exchange_mtu_request(handle, config::ATT_MTU_REQUESTED) };
        check("sd_ble_gattc_exchange_mtu_request", ret)
    }

    fn send_notification(&mut self, channel: u16, payload: &[u8]) -> Result<(), TransportError> {
        let conn = self.conn.as_ref().ok_or(TransportError::NotConnected)?;
        gatt_server::notify_value(conn, channel, payload).map_err(|err| {
            warn!("notify_value failed: {:?}", err);
            TransportError::Rejected
        })
    }
}

fn check(what: &str, ret: u32) -> Result<(), TransportError> {
    match RawError::convert(ret) {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!("{} rejected: {:?}", what, err);
            Err(TransportError::Raw(ret))
        }
    }
}
