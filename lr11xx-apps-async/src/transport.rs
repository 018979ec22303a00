//! The radio commands the applications depend on.

use core::fmt::Debug;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;
use embedded_hal_async::spi::SpiDevice;
use lr11xx_async::op::{GfskPacketStatus, IrqStatus, LoRaPacketStatus, RxBufferStatus, RxTxTimeout};
use lr11xx_async::{LrError, LR11xx};

/// The subset of the radio command set used by the dispatcher and the
/// applications.
///
/// Implemented for the [`LR11xx`] driver; tests provide their own implementation.
#[allow(async_fn_in_trait)]
pub trait RadioTransport {
    /// Error returned by every command.
    type Error: Debug;

    /// Reads the pending interrupts and clears exactly those.
    async fn get_and_clear_irq_status(&mut self) -> Result<IrqStatus, Self::Error>;

    /// Arms the receiver.
    async fn set_rx(&mut self, timeout: RxTxTimeout) -> Result<(), Self::Error>;

    /// Starts sending the content of the TX buffer.
    async fn set_tx(&mut self, timeout: RxTxTimeout) -> Result<(), Self::Error>;

    /// Writes a payload to the TX buffer.
    async fn write_buffer8(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads `buf.len()` bytes of the RX buffer, starting at `offset`.
    async fn read_buffer8(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Length and position of the last received payload.
    async fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, Self::Error>;

    /// Signal quality of the last received LoRa packet.
    async fn get_lora_packet_status(&mut self) -> Result<LoRaPacketStatus, Self::Error>;

    /// Signal quality and status of the last received GFSK packet.
    async fn get_gfsk_packet_status(&mut self) -> Result<GfskPacketStatus, Self::Error>;
}

impl<TSPI, TNRST, TBUSY, TIRQ, TSPIERR, TPINERR> RadioTransport
    for LR11xx<TSPI, TNRST, TBUSY, TIRQ>
where
    TSPIERR: Debug,
    TPINERR: Debug,
    TSPI: SpiDevice<Error = TSPIERR>,
    TNRST: OutputPin<Error = TPINERR>,
    TBUSY: InputPin<Error = TPINERR> + Wait,
    TIRQ: InputPin<Error = TPINERR> + Wait,
{
    type Error = LrError<TSPIERR, TPINERR>;

    async fn get_and_clear_irq_status(&mut self) -> Result<IrqStatus, Self::Error> {
        LR11xx::get_and_clear_irq_status(self).await
    }

    async fn set_rx(&mut self, timeout: RxTxTimeout) -> Result<(), Self::Error> {
        LR11xx::set_rx(self, timeout).await
    }

    async fn set_tx(&mut self, timeout: RxTxTimeout) -> Result<(), Self::Error> {
        LR11xx::set_tx(self, timeout).await
    }

    async fn write_buffer8(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        LR11xx::write_buffer8(self, data).await
    }

    async fn read_buffer8(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        LR11xx::read_buffer8(self, offset, buf).await
    }

    async fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, Self::Error> {
        LR11xx::get_rx_buffer_status(self).await
    }

    async fn get_lora_packet_status(&mut self) -> Result<LoRaPacketStatus, Self::Error> {
        LR11xx::get_lora_packet_status(self).await
    }

    async fn get_gfsk_packet_status(&mut self) -> Result<GfskPacketStatus, Self::Error> {
        LR11xx::get_gfsk_packet_status(self).await
    }
}
