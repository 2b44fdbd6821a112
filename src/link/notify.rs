//! Button-state notification channel.
//!
//! Edge-triggered: an input event observed while no central is connected
//! is dropped on the floor - no queuing, no replay on reconnect. The
//! payload is a single byte, 1 for pressed, 0 for released.

use crate::error::LinkError;
use crate::link::manager::LinkStats;
use crate::link::record::ConnectionRecord;
use crate::link::transport::LinkTransport;

/// Forwards input edges to the peer over the live connection.
pub struct NotificationChannel {
    /// Attribute handle of the button-state characteristic.
    channel: u16,
}

impl NotificationChannel {
    pub const fn new(channel: u16) -> Self {
        Self { channel }
    }

    /// Send one input edge to the peer, if there is one. A rejected send
    /// is reported and not retried; the next edge sends independently.
    pub fn on_input_event<T: LinkTransport>(
        &self,
        transport: &mut T,
        record: Option<&ConnectionRecord>,
        asserted: bool,
        stats: &mut LinkStats,
    ) -> Result<(), LinkError> {
        if record.is_none() {
            stats.dropped_inputs += 1;
            return Ok(());
        }

        let payload = [u8::from(asserted)];
        transport
            .send_notification(self.channel, &payload)
            .map_err(|error| {
                stats.send_failures += 1;
                LinkError::SendFailed { error }
            })
    }
}
