//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising** - connectable advertising carrying the device name,
//!    with the button service UUID in the scan response.
//! 2. **GATT server** - the button service (state notify + LED write).
//! 3. **Link core dispatch** - connection lifecycle and input events are
//!    translated into calls on [`ConnectionManager`]; negotiation
//!    requests flow the other way through [`SoftdeviceTransport`].
//!
//! The connection parameters and ATT MTU of the live link are re-read on
//! a short ticker and turned into parameter-update / MTU completion
//! events; the SoftDevice completes the peer-facing side of those
//! exchanges on its own.

pub mod gatt;
pub mod transport;

use defmt::{info, unwrap, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_time::{Duration, Ticker};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};

use btn2ble::config;
use btn2ble::link::ConnectionManager;

use crate::ui::buttons::BUTTON_EVENTS;
use gatt::{ButtonServiceEvent, Server, ServerEvent};
use transport::SoftdeviceTransport;

/// Configure and enable the SoftDevice for a single peripheral link.
pub fn enable_softdevice() -> &'static Softdevice {
    let sd_config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_50_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: config::ATT_MTU_REQUESTED,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::DEVICE_NAME.as_ptr() as _,
            current_len: config::DEVICE_NAME.len() as u16,
            max_len: config::DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    };

    Softdevice::enable(&sd_config)
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertising payload: flags + complete local name.
fn advertising_payload() -> heapless::Vec<u8, 31> {
    let mut adv = heapless::Vec::new();
    // LE General Discoverable, BR/EDR not supported.
    adv.extend_from_slice(&[0x02, 0x01, 0x06]).unwrap();
    let name = config::DEVICE_NAME.as_bytes();
    adv.push(name.len() as u8 + 1).unwrap();
    adv.push(0x09).unwrap(); // Complete Local Name
    adv.extend_from_slice(name).unwrap();
    adv
}

/// Scan response: complete list of 128-bit service UUIDs.
fn scan_response_payload() -> heapless::Vec<u8, 31> {
    let mut rsp = heapless::Vec::new();
    rsp.extend_from_slice(&[0x11, 0x07]).unwrap();
    rsp.extend_from_slice(&gatt::BUTTON_SERVICE_UUID.to_le_bytes())
        .unwrap();
    rsp
}

/// Advertise, hand each accepted connection to the link core, dispatch
/// events until the link drops, repeat.
#[embassy_executor::task]
pub async fn ble_task(
    sd: &'static Softdevice,
    server: Server,
    link_led: AnyPin,
    user_led: AnyPin,
) -> ! {
    // Both LEDs are active-low on the DK.
    let mut link_led = Output::new(link_led, Level::High, OutputDrive::Standard);
    let mut user_led = Output::new(user_led, Level::High, OutputDrive::Standard);

    let mut manager =
        ConnectionManager::new(SoftdeviceTransport::new(), server.button_state_handle());

    let adv_data = advertising_payload();
    let scan_data = scan_response_payload();
    let adv_config = peripheral::Config {
        interval: config::ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };

        info!("advertising as {}", config::DEVICE_NAME);
        let conn = match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => conn,
            Err(err) => {
                warn!("advertising failed: {:?}", err);
                continue;
            }
        };

        let handle = unwrap!(conn.handle());
        manager.transport_mut().attach(conn.clone());
        if let Err(err) = manager.on_connect(handle, 0) {
            warn!("connection rejected by link core: {:?}", err);
            manager.transport_mut().detach();
            continue;
        }

        let record = unwrap!(manager.record());
        let generation = record.id.generation;
        info!(
            "connected: interval {} us, latency {} intervals, timeout {} ms",
            record.params.interval_us(),
            record.params.latency,
            record.params.timeout_ms()
        );
        link_led.set_low();

        run_session(&mut manager, &conn, &server, generation, &mut user_led).await;

        link_led.set_high();
        user_led.set_high();
        manager.transport_mut().detach();
        // The SoftDevice's HCI disconnect reason is not surfaced here;
        // the core treats it as opaque diagnostics anyway.
        manager.on_disconnect(handle, 0);
        info!("disconnected, stats: {:?}", manager.stats());
    }
}

/// Serve GATT events and watch the link until it drops.
async fn run_session(
    manager: &mut ConnectionManager<SoftdeviceTransport>,
    conn: &Connection,
    server: &Server,
    generation: u32,
    user_led: &mut Output<'static>,
) {
    let gatt_fut = gatt_server::run(conn, server, |e| match e {
        ServerEvent::Btn(e) => match e {
            ButtonServiceEvent::ButtonStateCccdWrite { notifications } => {
                info!("button notifications: {}", notifications);
            }
            ButtonServiceEvent::LedWrite(value) => {
                info!("peer wrote LED: {}", value);
                if value != 0 {
                    user_led.set_low();
                } else {
                    user_led.set_high();
                }
            }
        },
    });

    let dispatch_fut = async {
        let mut ticker = Ticker::every(Duration::from_millis(config::LINK_WATCH_INTERVAL_MS));
        let mut last_params = conn.conn_params();
        let mut mtu_reported = false;

        loop {
            match select(BUTTON_EVENTS.receive(), ticker.next()).await {
                Either::First(asserted) => {
                    info!("button changed: {}", asserted);
                    if let Err(err) = manager.on_input_event(asserted) {
                        warn!("could not notify button state: {:?}", err);
                    }
                }
                Either::Second(()) => {
                    let params = conn.conn_params();
                    if (params.max_conn_interval, params.slave_latency, params.conn_sup_timeout)
                        != (
                            last_params.max_conn_interval,
                            last_params.slave_latency,
                            last_params.conn_sup_timeout,
                        )
                    {
                        manager.on_param_updated(
                            params.max_conn_interval,
                            params.slave_latency,
                            params.conn_sup_timeout,
                        );
                        if let Some(record) = manager.record() {
                            info!(
                                "connection parameters updated: interval {} us, latency {} intervals, timeout {} ms",
                                record.params.interval_us(),
                                record.params.latency,
                                record.params.timeout_ms()
                            );
                        }
                        last_params = params;
                    }

                    if !mtu_reported {
                        let mtu = conn.att_mtu();
                        if mtu != config::ATT_MTU_DEFAULT {
                            // The SoftDevice answers the peer's half of the
                            // exchange on its own; the result shows up here.
                            let result = manager.on_mtu_exchange_done(generation, Ok(mtu));
                            if let Err(err) = result {
                                warn!("MTU exchange failed: {:?}", err);
                            } else if let Some(record) = manager.record() {
                                info!("negotiated MTU: {} usable bytes", record.usable_mtu);
                            }
                            mtu_reported = true;
                        }
                    }

                    // TODO: dispatch on_phy_updated / on_data_length_updated once
                    // nrf-softdevice surfaces BLE_GAP_EVT_PHY_UPDATE and
                    // BLE_GAP_EVT_DATA_LENGTH_UPDATE to applications.
                }
            }
        }
    };

    match select(gatt_fut, dispatch_fut).await {
        Either::First(_) => {} // connection closed
        Either::Second(never) => never,
    }
}
