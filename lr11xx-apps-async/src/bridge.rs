//! UART to radio bridge.
//!
//! Every line received on the UART is padded to the payload length and sent.
//! After the transmission the receiver is armed to catch an answer, which is
//! logged as text.

use lr11xx_async::op::{PacketType, RxTxTimeout};

use crate::config::{AppConfig, MAX_PAYLOAD_LEN};
use crate::cycle::{arm_rx, arm_tx, CycleState};
use crate::dispatch::IrqHandler;
use crate::receive::receive_into;
use crate::transport::RadioTransport;
use crate::uart::UartRx;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pending {
    Rx,
    Tx,
}

pub struct UartBridge {
    packet_type: PacketType,
    payload_len: usize,
    rx_timeout: RxTxTimeout,
    tx_buffer: [u8; MAX_PAYLOAD_LEN],
    rx_buffer: [u8; MAX_PAYLOAD_LEN],
    pending: Pending,
    state: CycleState,
}

impl UartBridge {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            packet_type: config.packet_type,
            payload_len: config.payload_len as usize,
            rx_timeout: config.rx_timeout(),
            tx_buffer: [0u8; MAX_PAYLOAD_LEN],
            rx_buffer: [0u8; MAX_PAYLOAD_LEN],
            pending: Pending::Rx,
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// The bridge waits for the UART, the radio stays idle.
    pub async fn start<R: RadioTransport>(&mut self, _radio: &mut R) {
        self.state = CycleState::Idle;
        log::info!("Waiting for UART data...");
    }

    pub async fn retry<R: RadioTransport>(&mut self, radio: &mut R) {
        self.state = match self.pending {
            Pending::Rx => arm_rx(radio, self.rx_timeout).await,
            Pending::Tx => arm_tx(radio, &self.tx_buffer[..self.payload_len]).await,
        };
    }

    /// Sends the pending UART message, if any.
    ///
    /// A message is only taken while the radio is idle; a running transmission
    /// or reception is never interrupted.
    pub async fn poll<R: RadioTransport, const N: usize>(
        &mut self,
        radio: &mut R,
        uart: &UartRx<N>,
    ) {
        if self.state != CycleState::Idle {
            return;
        }
        let payload = &mut self.tx_buffer[..self.payload_len];
        let Some(len) = uart.take_message(payload) else {
            return;
        };
        payload[len..].fill(0);

        match core::str::from_utf8(&payload[..len]) {
            Ok(text) => log::info!("Sending string: {text}"),
            Err(_) => log::info!("Sending bytes: {:?}", &payload[..len]),
        }

        self.pending = Pending::Tx;
        self.state = arm_tx(radio, &self.tx_buffer[..self.payload_len]).await;
    }

    async fn rearm_rx<R: RadioTransport>(&mut self, radio: &mut R) {
        self.pending = Pending::Rx;
        self.state = arm_rx(radio, self.rx_timeout).await;
    }
}

impl<R: RadioTransport> IrqHandler<R> for UartBridge {
    async fn on_tx_done(&mut self, radio: &mut R) {
        log::info!("TX completed");
        self.rearm_rx(radio).await;
    }

    async fn on_rx_done(&mut self, radio: &mut R) {
        self.state = CycleState::Idle;
        let len = self.payload_len;
        let received = receive_into(radio, self.packet_type, &mut self.rx_buffer[..len]).await;
        if let Ok(size) = received {
            let data = &self.rx_buffer[..size];
            let end = data.iter().rposition(|byte| *byte != 0).map_or(0, |i| i + 1);
            match core::str::from_utf8(&data[..end]) {
                Ok(text) => log::info!("Receive success! Data: {text}"),
                Err(_) => log::info!("Receive success! Data: {:?}", &data[..end]),
            }
        }
        log::info!("Waiting for UART data...");
    }

    async fn on_timeout(&mut self, radio: &mut R) {
        self.rearm_rx(radio).await;
    }

    async fn on_crc_error(&mut self, _radio: &mut R) {
        self.state = CycleState::Idle;
    }

    async fn on_fsk_len_error(&mut self, _radio: &mut R) {
        self.state = CycleState::Idle;
    }
}
