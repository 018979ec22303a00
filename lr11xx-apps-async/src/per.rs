//! Packet error rate (PER) test.
//!
//! The transmitter sends the same payload over and over, with an 8-bit rolling
//! counter in its first byte and the byte pattern `1, 2, 3, ...` after it. The
//! receiver checks the pattern and infers how many packets it lost from the gaps
//! between the counter values it sees.

use embedded_hal_async::delay::DelayNs;
use lr11xx_async::op::{PacketType, RxTxTimeout};

use crate::config::{AppConfig, MAX_PAYLOAD_LEN};
use crate::cycle::{arm_rx, arm_tx, CycleState};
use crate::dispatch::IrqHandler;
use crate::receive::receive_into;
use crate::transport::RadioTransport;

/// Outcome of feeding a received counter value to a [`RollingCounter`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reception {
    /// First packet since boot: the counter baseline was set.
    First,
    /// Any later packet, `gap` counter steps after the previous one.
    Next {
        /// `value - last` in modulo 256 arithmetic.
        gap: u8,
    },
}

impl Reception {
    /// Number of packets lost between the previous reception and this one.
    pub fn missed(self) -> u8 {
        match self {
            Reception::First => 0,
            Reception::Next { gap } => gap.saturating_sub(1),
        }
    }
}

/// Tracks the rolling counter of the received PER packets.
#[derive(Clone, Debug, Default)]
pub struct RollingCounter {
    last: u8,
    first_packet_seen: bool,
    per_index: u32,
}

impl RollingCounter {
    pub const fn new() -> Self {
        Self {
            last: 0,
            first_packet_seen: false,
            per_index: 0,
        }
    }

    /// Accepts the counter of a valid packet.
    ///
    /// The first packet only sets the baseline. Every later packet adds its gap to
    /// the PER index.
    pub fn accept(&mut self, value: u8) -> Reception {
        let reception = if self.first_packet_seen {
            let gap = value.wrapping_sub(self.last);
            self.per_index += u32::from(gap);
            Reception::Next { gap }
        } else {
            self.first_packet_seen = true;
            Reception::First
        };
        self.last = value;
        reception
    }

    pub fn first_packet_seen(&self) -> bool {
        self.first_packet_seen
    }

    /// The counter value of the last accepted packet.
    pub fn last(&self) -> u8 {
        self.last
    }

    /// Number of packets the transmitter sent since the first reception.
    pub fn per_index(&self) -> u32 {
        self.per_index
    }
}

/// Reception counters of the PER receiver.
///
/// Nothing is counted before the first valid packet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PerStats {
    /// Valid packets, the first one excluded.
    pub ok: u32,
    pub rx_timeout: u32,
    pub crc_error: u32,
    pub fsk_len_error: u32,
}

impl PerStats {
    /// Packet error rate in percent, for `per_index` packets sent.
    pub fn packet_error_rate_percent(&self, per_index: u32) -> u32 {
        if per_index == 0 {
            return 0;
        }
        let ok = u64::from(self.ok.min(per_index));
        100 - (ok * 100 / u64::from(per_index)) as u32
    }
}

/// A PER payload: the counter byte followed by the `1, 2, 3, ...` pattern.
#[derive(Clone, Debug)]
pub struct PerPayload {
    bytes: [u8; MAX_PAYLOAD_LEN],
    len: usize,
}

impl PerPayload {
    /// Builds a `len` byte payload with a counter of 0.
    pub fn new(len: u8) -> Self {
        let mut bytes = [0u8; MAX_PAYLOAD_LEN];
        for (i, byte) in bytes.iter_mut().enumerate().take(len as usize).skip(1) {
            *byte = i as u8;
        }
        Self {
            bytes,
            len: len as usize,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn counter(&self) -> u8 {
        self.bytes[0]
    }

    pub fn set_counter(&mut self, value: u8) {
        self.bytes[0] = value;
    }

    /// Increments the counter, wrapping at 256, and returns its new value.
    pub fn increment_counter(&mut self) -> u8 {
        self.bytes[0] = self.bytes[0].wrapping_add(1);
        self.bytes[0]
    }

    /// Returns `true` if `received` has the same length and pattern. The counter
    /// byte is not compared.
    pub fn matches(&self, received: &[u8]) -> bool {
        !received.is_empty()
            && received.len() == self.len
            && received[1..] == self.bytes[1..self.len]
    }
}

/// The sending side of the PER test.
pub struct PerTransmitter<D> {
    payload: PerPayload,
    delay: D,
    tx_to_tx_delay_ms: u32,
    state: CycleState,
}

impl<D: DelayNs> PerTransmitter<D> {
    pub fn new(config: &AppConfig, delay: D) -> Self {
        Self {
            payload: PerPayload::new(config.payload_len),
            delay,
            tx_to_tx_delay_ms: config.tx_to_tx_delay_ms,
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// The payload sent last.
    pub fn payload(&self) -> &PerPayload {
        &self.payload
    }

    /// Sends the first packet, with a counter of 0.
    pub async fn start<R: RadioTransport>(&mut self, radio: &mut R) {
        self.payload.set_counter(0);
        self.state = arm_tx(radio, self.payload.as_bytes()).await;
    }

    pub async fn retry<R: RadioTransport>(&mut self, radio: &mut R) {
        self.state = arm_tx(radio, self.payload.as_bytes()).await;
    }
}

impl<R: RadioTransport, D: DelayNs> IrqHandler<R> for PerTransmitter<D> {
    async fn on_tx_done(&mut self, radio: &mut R) {
        self.state = CycleState::Idle;
        self.delay.delay_ms(self.tx_to_tx_delay_ms).await;

        let counter = self.payload.increment_counter();
        log::info!("Counter value: {counter}");
        self.state = arm_tx(radio, self.payload.as_bytes()).await;
    }
}

/// The receiving side of the PER test.
pub struct PerReceiver {
    packet_type: PacketType,
    template: PerPayload,
    rx_buffer: [u8; MAX_PAYLOAD_LEN],
    rx_timeout: RxTxTimeout,
    counter: RollingCounter,
    stats: PerStats,
    state: CycleState,
}

impl PerReceiver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            packet_type: config.packet_type,
            template: PerPayload::new(config.payload_len),
            rx_buffer: [0u8; MAX_PAYLOAD_LEN],
            rx_timeout: config.rx_timeout(),
            counter: RollingCounter::new(),
            stats: PerStats::default(),
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn counter(&self) -> &RollingCounter {
        &self.counter
    }

    pub fn stats(&self) -> &PerStats {
        &self.stats
    }

    /// The RX timeout used for every re-arm.
    pub fn rx_timeout(&self) -> RxTxTimeout {
        self.rx_timeout
    }

    pub async fn start<R: RadioTransport>(&mut self, radio: &mut R) {
        self.state = arm_rx(radio, self.rx_timeout).await;
    }

    pub async fn retry<R: RadioTransport>(&mut self, radio: &mut R) {
        self.state = arm_rx(radio, self.rx_timeout).await;
    }

    fn accept(&mut self, size: usize) {
        if !self.template.matches(&self.rx_buffer[..size]) {
            log::warn!("Received payload does not match the PER pattern");
            return;
        }

        let value = self.rx_buffer[0];
        let reception = self.counter.accept(value);
        if let Reception::Next { .. } = reception {
            self.stats.ok += 1;
        }
        let missed = reception.missed();
        if missed > 0 {
            log::warn!("{missed} packet(s) missed");
        }
        log::info!(
            "Counter value: {value}, PER index: {}",
            self.counter.per_index()
        );
    }

    async fn on_failure<R: RadioTransport>(&mut self, radio: &mut R, failure: Failure) {
        if self.counter.first_packet_seen() {
            match failure {
                Failure::Timeout => self.stats.rx_timeout += 1,
                Failure::Crc => self.stats.crc_error += 1,
                Failure::FskLen => self.stats.fsk_len_error += 1,
            }
        }
        self.state = arm_rx(radio, self.rx_timeout).await;
    }
}

#[derive(Copy, Clone)]
enum Failure {
    Timeout,
    Crc,
    FskLen,
}

impl<R: RadioTransport> IrqHandler<R> for PerReceiver {
    async fn on_rx_done(&mut self, radio: &mut R) {
        self.state = CycleState::Idle;
        let len = self.template.as_bytes().len();
        let received = receive_into(radio, self.packet_type, &mut self.rx_buffer[..len]).await;
        if let Ok(size) = received {
            self.accept(size);
        }
        self.state = arm_rx(radio, self.rx_timeout).await;
    }

    async fn on_timeout(&mut self, radio: &mut R) {
        self.on_failure(radio, Failure::Timeout).await;
    }

    async fn on_crc_error(&mut self, radio: &mut R) {
        self.on_failure(radio, Failure::Crc).await;
    }

    async fn on_fsk_len_error(&mut self, radio: &mut R) {
        self.on_failure(radio, Failure::FskLen).await;
    }

    // The reception goes on: RxDone, a CRC error or a timeout follows.
    async fn on_header_error(&mut self, _radio: &mut R) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_wraps_around() {
        let mut counter = RollingCounter::new();
        assert_eq!(counter.accept(250), Reception::First);

        let reception = counter.accept(3);
        assert_eq!(reception, Reception::Next { gap: 9 });
        assert_eq!(reception.missed(), 8);
        assert_eq!(counter.per_index(), 9);
        assert_eq!(counter.last(), 3);
    }

    #[test]
    fn first_packet_never_reports_missed_packets() {
        for value in [0u8, 1, 128, 255] {
            let mut counter = RollingCounter::new();
            let reception = counter.accept(value);
            assert_eq!(reception.missed(), 0);
            assert_eq!(counter.per_index(), 0);
            assert!(counter.first_packet_seen());
        }
    }

    #[test]
    fn zero_counter_after_baseline_is_not_a_first_packet() {
        let mut counter = RollingCounter::new();
        counter.accept(255);
        assert_eq!(counter.accept(0), Reception::Next { gap: 1 });
        assert_eq!(Reception::Next { gap: 1 }.missed(), 0);
    }

    #[test]
    fn payload_pattern() {
        let mut payload = PerPayload::new(5);
        assert_eq!(payload.as_bytes(), [0u8, 1, 2, 3, 4]);

        payload.set_counter(255);
        assert_eq!(payload.increment_counter(), 0);

        assert!(payload.matches(&[42, 1, 2, 3, 4]));
        assert!(!payload.matches(&[42, 1, 2, 3, 5]));
        assert!(!payload.matches(&[42, 1, 2, 3]));
    }

    #[test]
    fn packet_error_rate() {
        let stats = PerStats {
            ok: 90,
            ..PerStats::default()
        };
        assert_eq!(stats.packet_error_rate_percent(100), 10);
        assert_eq!(stats.packet_error_rate_percent(0), 0);
        assert_eq!(stats.packet_error_rate_percent(50), 0);
    }
}
