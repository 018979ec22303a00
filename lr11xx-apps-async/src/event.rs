//! Decoding of the IRQ status register into radio events.

use lr11xx_async::op::IrqStatus;

/// An event reported by the radio.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RadioEvent {
    /// A packet was sent.
    TxDone,
    /// A preamble was detected.
    PreambleDetected,
    /// The LoRa header of the incoming packet is corrupted.
    HeaderError,
    /// A valid sync word (GFSK) or LoRa header was received.
    SyncWordHeaderValid,
    /// A packet was received without error.
    RxDone,
    /// A packet was received with a payload CRC error.
    CrcError,
    /// A GFSK packet was received with an invalid length.
    FskLenError,
    /// Channel activity detection finished.
    CadDone {
        /// Whether activity was found on the channel.
        detected: bool,
    },
    /// RX or TX timed out.
    Timeout,
    /// The LoRa RX timestamp is available.
    LoraRxTimestamp,
    /// A Wi-Fi scan finished.
    WifiScanDone,
    /// A GNSS scan finished.
    GnssScanDone,
}

/// Number of checks done by [`Events`], one per position in the dispatch order.
const STEPS: u8 = 10;

impl RadioEvent {
    /// Decodes a status into events, in dispatch order.
    ///
    /// `RxDone` comes out as `CrcError` when the CRC error flag is set, as
    /// `FskLenError` when only the length error flag is set, and as `RxDone`
    /// otherwise. The error flags alone, without `RxDone`, give no event. The same
    /// holds for `CadDetected` without `CadDone`.
    pub fn decode(status: IrqStatus) -> Events {
        Events { status, step: 0 }
    }

    /// The line logged when the event is dispatched.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::TxDone => "Tx done",
            Self::PreambleDetected => "Preamble detected",
            Self::HeaderError => "Header error",
            Self::SyncWordHeaderValid => "Syncword or header valid",
            Self::RxDone => "Rx done",
            Self::CrcError => "CRC error",
            Self::FskLenError => "FSK length error",
            Self::CadDone { detected: true } => "CAD done, channel activity detected",
            Self::CadDone { detected: false } => "CAD done, no channel activity detected",
            Self::Timeout => "Rx timeout",
            Self::LoraRxTimestamp => "LoRa Rx timestamp",
            Self::WifiScanDone => "Wi-Fi scan done",
            Self::GnssScanDone => "GNSS scan done",
        }
    }

    /// Returns the log level the event is reported at.
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::HeaderError | Self::CrcError | Self::FskLenError => log::Level::Error,
            Self::Timeout => log::Level::Warn,
            _ => log::Level::Info,
        }
    }
}

/// Iterator over the events of an IRQ status, see [`RadioEvent::decode`].
#[derive(Clone, Debug)]
pub struct Events {
    status: IrqStatus,
    step: u8,
}

impl Events {
    fn check(&self, step: u8) -> Option<RadioEvent> {
        let status = self.status;
        match step {
            0 => status.tx_done().then_some(RadioEvent::TxDone),
            1 => status
                .preamble_detected()
                .then_some(RadioEvent::PreambleDetected),
            2 => status.header_error().then_some(RadioEvent::HeaderError),
            3 => status
                .syncword_header_valid()
                .then_some(RadioEvent::SyncWordHeaderValid),
            4 => status.rx_done().then(|| {
                if status.crc_error() {
                    RadioEvent::CrcError
                } else if status.fsk_len_error() {
                    RadioEvent::FskLenError
                } else {
                    RadioEvent::RxDone
                }
            }),
            5 => status.cad_done().then(|| RadioEvent::CadDone {
                detected: status.cad_detected(),
            }),
            6 => status.timeout().then_some(RadioEvent::Timeout),
            7 => status
                .lora_rx_timestamp()
                .then_some(RadioEvent::LoraRxTimestamp),
            8 => status.wifi_scan_done().then_some(RadioEvent::WifiScanDone),
            9 => status.gnss_scan_done().then_some(RadioEvent::GnssScanDone),
            _ => None,
        }
    }
}

impl Iterator for Events {
    type Item = RadioEvent;

    fn next(&mut self) -> Option<RadioEvent> {
        while self.step < STEPS {
            let step = self.step;
            self.step += 1;
            if let Some(event) = self.check(step) {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr11xx_async::op::{IrqMask, IrqMaskBit};

    fn decode(status: IrqMask) -> Vec<RadioEvent> {
        RadioEvent::decode(status.bits().into()).collect()
    }

    #[test]
    fn reception_errors_are_logged_as_errors() {
        assert_eq!(RadioEvent::CrcError.log_level(), log::Level::Error);
        assert_eq!(RadioEvent::Timeout.log_level(), log::Level::Warn);
        assert_eq!(RadioEvent::TxDone.log_level(), log::Level::Info);
        assert_eq!(RadioEvent::TxDone.describe(), "Tx done");
    }

    #[test]
    fn rx_errors_take_priority_over_rx_done() {
        let rx = IrqMask::none() | IrqMaskBit::RxDone;

        assert_eq!(decode(rx), [RadioEvent::RxDone]);
        assert_eq!(decode(rx | IrqMaskBit::FskLenError), [RadioEvent::FskLenError]);
        assert_eq!(decode(rx | IrqMaskBit::CrcError), [RadioEvent::CrcError]);
        assert_eq!(
            decode(rx | IrqMaskBit::CrcError | IrqMaskBit::FskLenError),
            [RadioEvent::CrcError]
        );
    }

    #[test]
    fn secondary_flags_alone_give_nothing() {
        let errors = IrqMask::none() | IrqMaskBit::CrcError | IrqMaskBit::FskLenError;
        assert!(decode(errors).is_empty());
        assert!(decode(IrqMask::none() | IrqMaskBit::CadDetected).is_empty());
    }

    #[test]
    fn events_come_out_in_dispatch_order() {
        let everything = decode(IrqMask::all());
        assert_eq!(
            everything,
            [
                RadioEvent::TxDone,
                RadioEvent::PreambleDetected,
                RadioEvent::HeaderError,
                RadioEvent::SyncWordHeaderValid,
                RadioEvent::CrcError,
                RadioEvent::CadDone { detected: true },
                RadioEvent::Timeout,
                RadioEvent::LoraRxTimestamp,
                RadioEvent::WifiScanDone,
                RadioEvent::GnssScanDone,
            ]
        );

        let cad = IrqMask::none() | IrqMaskBit::CadDone;
        assert_eq!(decode(cad), [RadioEvent::CadDone { detected: false }]);
    }
}
