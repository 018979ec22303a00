#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;
use lr11xx_apps_async::RadioTransport;
use lr11xx_async::op::{
    GfskPacketStatus, IrqMask, IrqStatus, LoRaPacketStatus, RxBufferStatus, RxTxTimeout,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetAndClearIrq,
    SetRx(RxTxTimeout),
    SetTx(RxTxTimeout),
    WriteBuffer(Vec<u8>),
    ReadBuffer { offset: u8, len: usize },
    GetRxBufferStatus,
    GetPacketStatus,
    GetGfskPacketStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

/// A radio answering from canned values and recording every command.
#[derive(Default)]
pub struct FakeRadio {
    pub calls: Vec<Call>,
    /// Statuses returned by successive IRQ reads; empty means nothing pending.
    pub irq: VecDeque<u32>,
    /// Content of the RX buffer.
    pub rx_payload: Vec<u8>,
    /// Overrides the length reported by the RX buffer status.
    pub rx_size: Option<u8>,
    /// Number of upcoming `set_rx` calls that fail.
    pub failing_set_rx: usize,
    pub failing_irq_read: bool,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, mask: IrqMask) {
        self.irq.push_back(mask.bits());
    }

    pub fn receive(&mut self, payload: &[u8]) {
        self.rx_payload = payload.to_vec();
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn rx_arms(&self) -> Vec<RxTxTimeout> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetRx(timeout) => Some(*timeout),
                _ => None,
            })
            .collect()
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::WriteBuffer(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RadioTransport for FakeRadio {
    type Error = FakeError;

    async fn get_and_clear_irq_status(&mut self) -> Result<IrqStatus, FakeError> {
        self.calls.push(Call::GetAndClearIrq);
        if self.failing_irq_read {
            return Err(FakeError);
        }
        Ok(self.irq.pop_front().unwrap_or(0).into())
    }

    async fn set_rx(&mut self, timeout: RxTxTimeout) -> Result<(), FakeError> {
        self.calls.push(Call::SetRx(timeout));
        if self.failing_set_rx > 0 {
            self.failing_set_rx -= 1;
            return Err(FakeError);
        }
        Ok(())
    }

    async fn set_tx(&mut self, timeout: RxTxTimeout) -> Result<(), FakeError> {
        self.calls.push(Call::SetTx(timeout));
        Ok(())
    }

    async fn write_buffer8(&mut self, data: &[u8]) -> Result<(), FakeError> {
        self.calls.push(Call::WriteBuffer(data.to_vec()));
        Ok(())
    }

    async fn read_buffer8(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), FakeError> {
        self.calls.push(Call::ReadBuffer {
            offset,
            len: buf.len(),
        });
        buf.copy_from_slice(&self.rx_payload[..buf.len()]);
        Ok(())
    }

    async fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, FakeError> {
        self.calls.push(Call::GetRxBufferStatus);
        let size = self.rx_size.unwrap_or(self.rx_payload.len() as u8);
        Ok([size, 0].into())
    }

    async fn get_lora_packet_status(&mut self) -> Result<LoRaPacketStatus, FakeError> {
        self.calls.push(Call::GetPacketStatus);
        Ok([0x50, 0x28, 0x52].into())
    }

    async fn get_gfsk_packet_status(&mut self) -> Result<GfskPacketStatus, FakeError> {
        self.calls.push(Call::GetGfskPacketStatus);
        let len = self.rx_payload.len() as u8;
        Ok([0x50, 0x54, len, 0x02].into())
    }
}

/// A delay that returns at once and adds up what it was asked to wait.
#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// The PER pattern for a given counter value.
pub fn per_payload(counter: u8, len: usize) -> Vec<u8> {
    let mut payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
    payload[0] = counter;
    payload
}
