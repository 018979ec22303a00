//! IRQ dispatching: from the latch to the per-event handlers.

use lr11xx_async::op::IrqMask;

use crate::event::RadioEvent;
use crate::latch::IrqLatch;
use crate::transport::RadioTransport;

fn no_routine(event: RadioEvent) {
    log::info!("No IRQ routine defined for {event:?}");
}

/// Reacts to radio events, one method per event kind.
///
/// Every method has a default body that only logs, so an application overrides
/// the events it cares about.
#[allow(async_fn_in_trait)]
pub trait IrqHandler<R: RadioTransport> {
    /// A packet was sent.
    async fn on_tx_done(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::TxDone);
    }

    /// A preamble was detected.
    async fn on_preamble_detected(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::PreambleDetected);
    }

    /// The LoRa header was corrupted.
    async fn on_header_error(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::HeaderError);
    }

    /// A valid sync word or LoRa header was received.
    async fn on_syncword_header_valid(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::SyncWordHeaderValid);
    }

    /// A packet was received.
    async fn on_rx_done(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::RxDone);
    }

    /// A packet was received with a CRC error.
    async fn on_crc_error(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::CrcError);
    }

    /// A GFSK packet with an invalid length was received.
    async fn on_fsk_len_error(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::FskLenError);
    }

    /// Channel activity detection finished.
    async fn on_cad_done(&mut self, _radio: &mut R, detected: bool) {
        no_routine(RadioEvent::CadDone { detected });
    }

    /// RX or TX timed out.
    async fn on_timeout(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::Timeout);
    }

    /// The timestamp of the last LoRa reception is available.
    async fn on_lora_rx_timestamp(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::LoraRxTimestamp);
    }

    /// A Wi-Fi passive scan finished.
    async fn on_wifi_scan_done(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::WifiScanDone);
    }

    /// A GNSS scan finished.
    async fn on_gnss_scan_done(&mut self, _radio: &mut R) {
        no_routine(RadioEvent::GnssScanDone);
    }

    /// Routes an event to its method.
    async fn handle(&mut self, event: RadioEvent, radio: &mut R) {
        match event {
            RadioEvent::TxDone => self.on_tx_done(radio).await,
            RadioEvent::PreambleDetected => self.on_preamble_detected(radio).await,
            RadioEvent::HeaderError => self.on_header_error(radio).await,
            RadioEvent::SyncWordHeaderValid => self.on_syncword_header_valid(radio).await,
            RadioEvent::RxDone => self.on_rx_done(radio).await,
            RadioEvent::CrcError => self.on_crc_error(radio).await,
            RadioEvent::FskLenError => self.on_fsk_len_error(radio).await,
            RadioEvent::CadDone { detected } => self.on_cad_done(radio, detected).await,
            RadioEvent::Timeout => self.on_timeout(radio).await,
            RadioEvent::LoraRxTimestamp => self.on_lora_rx_timestamp(radio).await,
            RadioEvent::WifiScanDone => self.on_wifi_scan_done(radio).await,
            RadioEvent::GnssScanDone => self.on_gnss_scan_done(radio).await,
        }
    }
}

/// Turns latch edges into handler calls, filtered by the subscribed interrupts.
#[derive(Copy, Clone, Debug)]
pub struct IrqDispatcher {
    mask: IrqMask,
}

impl IrqDispatcher {
    /// Creates a dispatcher acting only on the interrupts in `mask`.
    pub const fn new(mask: IrqMask) -> Self {
        Self { mask }
    }

    /// The subscribed interrupts.
    pub fn mask(&self) -> IrqMask {
        self.mask
    }

    /// Runs one dispatch pass.
    ///
    /// Does nothing if the latch is clear. Otherwise the latch is cleared first,
    /// so an edge raised while handling is kept for the next pass. Then the chip
    /// status is read and cleared once, filtered with the mask, and every
    /// resulting event is logged and handed to `handler`. A failed status read
    /// abandons the pass.
    pub async fn process<R, H>(&self, latch: &IrqLatch, radio: &mut R, handler: &mut H)
    where
        R: RadioTransport,
        H: IrqHandler<R>,
    {
        if !latch.take() {
            return;
        }

        let raw = match radio.get_and_clear_irq_status().await {
            Ok(status) => status,
            Err(err) => {
                log::error!("Error reading irq status: {err:?}");
                return;
            }
        };
        let status = raw.masked(self.mask);
        log::debug!(
            "Interrupt flags = {:#010X}, filtered = {:#010X}",
            raw.bits(),
            status.bits()
        );

        for event in RadioEvent::decode(status) {
            log::log!(event.log_level(), "{}", event.describe());
            handler.handle(event, radio).await;
        }
    }
}
