//! Fetching a received payload out of the radio.

use core::fmt::{self, Debug};

use lr11xx_async::op::PacketType;

use crate::transport::RadioTransport;

/// An error while fetching a received payload.
pub enum ReceiveError<E> {
    /// A radio command failed.
    Transport(E),
    /// The payload does not fit the destination buffer. Nothing was read.
    Oversized {
        /// Length of the received payload.
        size: u8,
        /// Length of the destination buffer.
        capacity: usize,
    },
}

impl<E: Debug> Debug for ReceiveError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Transport({err:?})"),
            Self::Oversized { size, capacity } => {
                write!(f, "Oversized({size} bytes, capacity {capacity})")
            }
        }
    }
}

/// Copies the last received payload into `buffer` and returns its length.
///
/// The payload is rejected, leaving `buffer` untouched, when it is longer than
/// `buffer`. On success the packet status of the `packet_type` modem is logged:
/// RSSI and SNR for LoRa, average and sync word RSSI for GFSK.
pub async fn receive_into<R: RadioTransport>(
    radio: &mut R,
    packet_type: PacketType,
    buffer: &mut [u8],
) -> Result<usize, ReceiveError<R::Error>> {
    let rx_status = radio.get_rx_buffer_status().await.map_err(|err| {
        log::warn!("Error getting rx buffer status: {err:?}");
        ReceiveError::Transport(err)
    })?;

    let size = rx_status.payload_length_rx();
    if size as usize > buffer.len() {
        log::error!(
            "Received payload ({size} bytes) is bigger than the buffer ({} bytes)",
            buffer.len()
        );
        return Err(ReceiveError::Oversized {
            size,
            capacity: buffer.len(),
        });
    }

    radio
        .read_buffer8(
            rx_status.rx_start_buffer_pointer(),
            &mut buffer[..size as usize],
        )
        .await
        .map_err(|err| {
            log::warn!("Error reading rx buffer: {err:?}");
            ReceiveError::Transport(err)
        })?;

    match packet_type {
        PacketType::LoRa => match radio.get_lora_packet_status().await {
            Ok(status) => log::info!(
                "Packet status: RSSI = {} dBm, SNR = {} dB, signal RSSI = {} dBm",
                status.rssi_pkt_in_dbm,
                status.snr_pkt_in_db,
                status.signal_rssi_pkt_in_dbm
            ),
            Err(err) => log::warn!("Error getting packet status: {err:?}"),
        },
        PacketType::GFSK => match radio.get_gfsk_packet_status().await {
            Ok(status) => log::info!(
                "Packet status: RSSI average = {} dBm, RSSI sync = {} dBm",
                status.rssi_avg_in_dbm,
                status.rssi_sync_in_dbm
            ),
            Err(err) => log::warn!("Error getting packet status: {err:?}"),
        },
        _ => {}
    }

    Ok(size as usize)
}
