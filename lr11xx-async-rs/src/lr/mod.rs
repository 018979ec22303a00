//! The core implementation of the LR11xx driver.

pub(crate) mod err;

use embedded_hal::digital::InputPin;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::spi::Operation;
use embedded_hal_async::spi::SpiDevice;

use crate::conf::{Config, ModemConfig};
use crate::op::*;

pub use self::err::{LrError, PinError, SpiError};

type Pins<TNRST, TBUSY, TIRQ> = (TNRST, TBUSY, TIRQ);

const NOP: u8 = 0x00;

mod opcode {
    pub const GET_STATUS: [u8; 2] = [0x01, 0x00];
    pub const GET_VERSION: [u8; 2] = [0x01, 0x01];
    pub const WRITE_BUFFER8: [u8; 2] = [0x01, 0x09];
    pub const READ_BUFFER8: [u8; 2] = [0x01, 0x0A];
    pub const GET_ERRORS: [u8; 2] = [0x01, 0x0D];
    pub const CLEAR_ERRORS: [u8; 2] = [0x01, 0x0E];
    pub const SET_DIO_IRQ_PARAMS: [u8; 2] = [0x01, 0x13];
    pub const CLEAR_IRQ: [u8; 2] = [0x01, 0x14];
    pub const SET_TCXO_MODE: [u8; 2] = [0x01, 0x17];
    pub const SET_STANDBY: [u8; 2] = [0x01, 0x1C];
    pub const GET_RX_BUFFER_STATUS: [u8; 2] = [0x02, 0x03];
    pub const GET_PACKET_STATUS: [u8; 2] = [0x02, 0x04];
    pub const SET_GFSK_SYNC_WORD: [u8; 2] = [0x02, 0x06];
    pub const SET_RX: [u8; 2] = [0x02, 0x09];
    pub const SET_TX: [u8; 2] = [0x02, 0x0A];
    pub const SET_RF_FREQUENCY: [u8; 2] = [0x02, 0x0B];
    pub const SET_PACKET_TYPE: [u8; 2] = [0x02, 0x0E];
    pub const SET_MODULATION_PARAMS: [u8; 2] = [0x02, 0x0F];
    pub const SET_PACKET_PARAMS: [u8; 2] = [0x02, 0x10];
    pub const SET_TX_PARAMS: [u8; 2] = [0x02, 0x11];
    pub const SET_RX_TX_FALLBACK_MODE: [u8; 2] = [0x02, 0x13];
    pub const SET_PA_CONFIG: [u8; 2] = [0x02, 0x15];
    pub const SET_GFSK_CRC_PARAMS: [u8; 2] = [0x02, 0x24];
    pub const SET_GFSK_WHITENING_SEED: [u8; 2] = [0x02, 0x25];
    pub const SET_RX_BOOSTED: [u8; 2] = [0x02, 0x27];
    pub const SET_LORA_SYNC_WORD: [u8; 2] = [0x02, 0x2B];
}

/// A wrapper around a Semtech LR1110/LR1120/LR1121 transceiver.
pub struct LR11xx<TSPI: SpiDevice, TNRST, TBUSY, TIRQ> {
    spi: TSPI,
    nrst_pin: TNRST,
    busy_pin: TBUSY,
    irq_pin: TIRQ,
}

impl<TSPI, TNRST, TBUSY, TIRQ, TSPIERR, TPINERR> LR11xx<TSPI, TNRST, TBUSY, TIRQ>
where
    TPINERR: core::fmt::Debug,
    TSPI: SpiDevice<Error = TSPIERR>,
    TNRST: OutputPin<Error = TPINERR>,
    TBUSY: InputPin<Error = TPINERR> + Wait,
    TIRQ: InputPin<Error = TPINERR> + Wait,
{
    /// Creates a new `LR11xx` driver instance.
    ///
    /// # Arguments
    ///
    /// * `spi` - An asynchronous SPI peripheral.
    /// * `pins` - A tuple containing the required GPIO pins: (NRESET, BUSY, IRQ).
    pub fn new(spi: TSPI, pins: Pins<TNRST, TBUSY, TIRQ>) -> Self {
        let (nrst_pin, busy_pin, irq_pin) = pins;
        Self {
            spi,
            nrst_pin,
            busy_pin,
            irq_pin,
        }
    }

    /// Resets and configures the radio.
    ///
    /// The chip ends up in standby with every interrupt cleared, ready for a
    /// `set_rx` or `set_tx` command.
    pub async fn init(&mut self, conf: Config) -> Result<(), LrError<TSPIERR, TPINERR>> {
        log::trace!("lr11xx::init start");
        self.reset().await?;
        self.set_standby(StandbyConfig::StbyRc).await?;

        if let Some((tcxo_voltage, tcxo_delay)) = conf.tcxo_opts {
            self.set_tcxo_mode(tcxo_voltage, tcxo_delay).await?;
            log::trace!("lr11xx::init tcxo mode set");
        }

        self.set_packet_type(conf.packet_type).await?;
        self.set_rf_frequency(conf.rf_frequency).await?;
        log::trace!("lr11xx::init rf frequency set to {} Hz", conf.rf_frequency);

        self.set_pa_config(conf.pa_config).await?;
        self.set_tx_params(conf.tx_params).await?;
        self.set_rx_tx_fallback_mode(conf.fallback_mode).await?;
        self.cfg_rx_boosted(conf.rx_boosted).await?;
        log::trace!("lr11xx::init power and fallback configured");

        self.set_mod_params(conf.mod_params).await?;
        if let Some(packet_params) = conf.packet_params {
            self.set_packet_params(packet_params).await?;
        }
        match conf.modem {
            ModemConfig::LoRa { sync_word } => self.set_lora_sync_word(sync_word).await?,
            ModemConfig::Gfsk {
                sync_word,
                whitening_seed,
                crc_params,
            } => {
                self.set_gfsk_sync_word(sync_word).await?;
                if let Some(seed) = whitening_seed {
                    self.set_gfsk_whitening_seed(seed).await?;
                }
                if let Some((seed, polynomial)) = crc_params {
                    self.set_gfsk_crc_params(seed, polynomial).await?;
                }
            }
        }
        log::trace!("lr11xx::init modem parameters set");

        self.set_dio_irq_params(conf.dio_irq_mask, IrqMask::none())
            .await?;
        self.clear_irq_status(IrqMask::all()).await?;

        let errors = self.get_errors().await?;
        if errors.any() {
            log::warn!("lr11xx::init device errors: {errors:?}");
        }
        self.clear_errors().await?;

        log::trace!("lr11xx::init done");
        Ok(())
    }

    /// Sends a command with no response.
    async fn write_command(&mut self, command: &[u8]) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.wait_on_busy().await?;
        self.spi
            .write(command)
            .await
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Sends a command followed by a variable length data block.
    async fn write_command_with_data(
        &mut self,
        command: &[u8],
        data: &[u8],
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.wait_on_busy().await?;
        let mut ops = [Operation::Write(command), Operation::Write(data)];
        self.spi
            .transaction(&mut ops)
            .await
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Sends a command, then clocks out its response in a second transaction.
    ///
    /// The first byte of every response is `Stat1`, which is returned separately.
    /// A `Stat1` reporting a failed command turns into [`LrError::CommandFailed`].
    async fn read_command(
        &mut self,
        command: &[u8],
        response: &mut [u8],
    ) -> Result<Stat1, LrError<TSPIERR, TPINERR>> {
        self.write_command(command).await?;
        self.wait_on_busy().await?;
        let mut stat1 = [NOP];
        let mut ops = [Operation::Read(&mut stat1), Operation::Read(response)];
        self.spi
            .transaction(&mut ops)
            .await
            .map_err(SpiError::Transfer)?;
        let stat1 = Stat1::from(stat1[0]);
        if stat1.command_status() == CommandStatus::Fail {
            return Err(LrError::CommandFailed(stat1));
        }
        Ok(stat1)
    }

    /// Reads the hardware and firmware version of the chip.
    pub async fn get_version(&mut self) -> Result<Version, LrError<TSPIERR, TPINERR>> {
        let mut response = [NOP; 4];
        self.read_command(&opcode::GET_VERSION, &mut response)
            .await?;
        Ok(response.into())
    }

    /// Puts the chip in a specified standby mode.
    pub async fn set_standby(
        &mut self,
        standby_config: StandbyConfig,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_STANDBY;
        self.write_command(&[op0, op1, standby_config as u8]).await
    }

    /// Configures the TCXO supply voltage and startup timeout.
    pub async fn set_tcxo_mode(
        &mut self,
        tcxo_voltage: TcxoVoltage,
        tcxo_delay: TcxoDelay,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_TCXO_MODE;
        let [d0, d1, d2]: [u8; 3] = tcxo_delay.into();
        self.write_command(&[op0, op1, tcxo_voltage as u8, d0, d1, d2])
            .await
    }

    /// Sets the modem packet type.
    pub async fn set_packet_type(
        &mut self,
        packet_type: PacketType,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_PACKET_TYPE;
        self.write_command(&[op0, op1, packet_type as u8]).await
    }

    /// Sets the RF frequency in Hz.
    pub async fn set_rf_frequency(
        &mut self,
        rf_frequency: u32,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_RF_FREQUENCY;
        let [f0, f1, f2, f3] = rf_frequency.to_be_bytes();
        self.write_command(&[op0, op1, f0, f1, f2, f3]).await
    }

    /// Sets the Power Amplifier (PA) configuration.
    pub async fn set_pa_config(
        &mut self,
        pa_config: PaConfig,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_PA_CONFIG;
        let [p0, p1, p2, p3]: [u8; 4] = pa_config.into();
        self.write_command(&[op0, op1, p0, p1, p2, p3]).await
    }

    /// Sets the TX parameters (output power, ramp time).
    pub async fn set_tx_params(
        &mut self,
        params: TxParams,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_TX_PARAMS;
        let [power, ramp]: [u8; 2] = params.into();
        self.write_command(&[op0, op1, power, ramp]).await
    }

    /// Selects the mode the chip falls back to after TX or RX.
    pub async fn set_rx_tx_fallback_mode(
        &mut self,
        mode: FallbackMode,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_RX_TX_FALLBACK_MODE;
        self.write_command(&[op0, op1, mode as u8]).await
    }

    /// Enables or disables the RX boosted mode.
    pub async fn cfg_rx_boosted(&mut self, enable: bool) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_RX_BOOSTED;
        self.write_command(&[op0, op1, enable as u8]).await
    }

    /// Sets the modulation parameters.
    pub async fn set_mod_params(
        &mut self,
        params: ModParams,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.write_command_with_data(&opcode::SET_MODULATION_PARAMS, params.as_bytes())
            .await
    }

    /// Sets the packet parameters.
    pub async fn set_packet_params(
        &mut self,
        params: PacketParams,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.write_command_with_data(&opcode::SET_PACKET_PARAMS, params.as_bytes())
            .await
    }

    /// Sets the LoRa sync word.
    pub async fn set_lora_sync_word(
        &mut self,
        sync_word: u8,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_LORA_SYNC_WORD;
        self.write_command(&[op0, op1, sync_word]).await
    }

    /// Sets the GFSK sync word. The chip matches its first
    /// `sync_word_len_in_bits` bits, as set in the packet parameters.
    pub async fn set_gfsk_sync_word(
        &mut self,
        sync_word: [u8; 8],
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.write_command_with_data(&opcode::SET_GFSK_SYNC_WORD, &sync_word)
            .await
    }

    /// Sets the seed of the GFSK whitening LFSR.
    pub async fn set_gfsk_whitening_seed(
        &mut self,
        seed: u16,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_GFSK_WHITENING_SEED;
        let [s0, s1] = seed.to_be_bytes();
        self.write_command(&[op0, op1, s0, s1]).await
    }

    /// Sets the GFSK CRC seed and polynomial.
    pub async fn set_gfsk_crc_params(
        &mut self,
        seed: u32,
        polynomial: u32,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_GFSK_CRC_PARAMS;
        let [s0, s1, s2, s3] = seed.to_be_bytes();
        let [p0, p1, p2, p3] = polynomial.to_be_bytes();
        self.write_command(&[op0, op1, s0, s1, s2, s3, p0, p1, p2, p3])
            .await
    }

    /// Configures which interrupts are routed to the IRQ pins.
    pub async fn set_dio_irq_params(
        &mut self,
        dio1_mask: IrqMask,
        dio2_mask: IrqMask,
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let dio1 = dio1_mask.bits().to_be_bytes();
        let dio2 = dio2_mask.bits().to_be_bytes();
        self.wait_on_busy().await?;
        let mut ops = [
            Operation::Write(&opcode::SET_DIO_IRQ_PARAMS),
            Operation::Write(&dio1),
            Operation::Write(&dio2),
        ];
        self.spi
            .transaction(&mut ops)
            .await
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Gets the current IRQ status.
    ///
    /// `GetStatus` is a direct read: the status bytes are clocked out while the
    /// opcode is being sent.
    pub async fn get_irq_status(&mut self) -> Result<IrqStatus, LrError<TSPIERR, TPINERR>> {
        self.wait_on_busy().await?;
        let [op0, op1] = opcode::GET_STATUS;
        let mut status = [op0, op1, NOP, NOP, NOP, NOP];
        self.spi
            .transfer_in_place(&mut status)
            .await
            .map_err(SpiError::Transfer)?;
        log::trace!("lr11xx::get_irq_status raw response: {status:?}");
        Ok(u32::from_be_bytes([status[2], status[3], status[4], status[5]]).into())
    }

    /// Clears the specified IRQ status flags.
    pub async fn clear_irq_status(&mut self, mask: IrqMask) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::CLEAR_IRQ;
        let [m0, m1, m2, m3] = mask.bits().to_be_bytes();
        self.write_command(&[op0, op1, m0, m1, m2, m3]).await
    }

    /// Reads the IRQ status and clears exactly the flags that were read.
    ///
    /// Flags raised between the read and the clear stay pending.
    pub async fn get_and_clear_irq_status(
        &mut self,
    ) -> Result<IrqStatus, LrError<TSPIERR, TPINERR>> {
        let status = self.get_irq_status().await?;
        if !status.is_empty() {
            self.clear_irq_status(status.into()).await?;
        }
        Ok(status)
    }

    /// Gets the current device errors.
    pub async fn get_errors(&mut self) -> Result<SystemErrors, LrError<TSPIERR, TPINERR>> {
        let mut response = [NOP; 2];
        self.read_command(&opcode::GET_ERRORS, &mut response)
            .await?;
        Ok(u16::from_be_bytes(response).into())
    }

    /// Clears the device error register.
    pub async fn clear_errors(&mut self) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.write_command(&opcode::CLEAR_ERRORS).await
    }

    /// Puts the device in RX mode.
    pub async fn set_rx(&mut self, timeout: RxTxTimeout) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_RX;
        let [t0, t1, t2]: [u8; 3] = timeout.into();
        self.write_command(&[op0, op1, t0, t1, t2]).await
    }

    /// Puts the device in TX mode.
    pub async fn set_tx(&mut self, timeout: RxTxTimeout) -> Result<(), LrError<TSPIERR, TPINERR>> {
        let [op0, op1] = opcode::SET_TX;
        let [t0, t1, t2]: [u8; 3] = timeout.into();
        self.write_command(&[op0, op1, t0, t1, t2]).await
    }

    /// Writes data to the TX buffer, starting at its first byte.
    pub async fn write_buffer8(&mut self, data: &[u8]) -> Result<(), LrError<TSPIERR, TPINERR>> {
        debug_assert!(data.len() <= 255);
        self.write_command_with_data(&opcode::WRITE_BUFFER8, data)
            .await
    }

    /// Reads `result.len()` bytes from the RX buffer at a given offset.
    pub async fn read_buffer8(
        &mut self,
        offset: u8,
        result: &mut [u8],
    ) -> Result<(), LrError<TSPIERR, TPINERR>> {
        debug_assert!(result.len() <= 255);
        let [op0, op1] = opcode::READ_BUFFER8;
        self.read_command(&[op0, op1, offset, result.len() as u8], result)
            .await?;
        Ok(())
    }

    /// Gets the RX buffer status, which includes the length and start pointer of the last received packet.
    pub async fn get_rx_buffer_status(
        &mut self,
    ) -> Result<RxBufferStatus, LrError<TSPIERR, TPINERR>> {
        let mut response = [NOP; 2];
        let stat1 = self
            .read_command(&opcode::GET_RX_BUFFER_STATUS, &mut response)
            .await?;
        log::trace!("lr11xx::get_rx_buffer_status {stat1:?} response: {response:?}");
        Ok(response.into())
    }

    /// Gets the status of the last received LoRa packet (RSSI, SNR).
    pub async fn get_lora_packet_status(
        &mut self,
    ) -> Result<LoRaPacketStatus, LrError<TSPIERR, TPINERR>> {
        let mut response = [NOP; 3];
        self.read_command(&opcode::GET_PACKET_STATUS, &mut response)
            .await?;
        Ok(response.into())
    }

    /// Gets the status of the last received GFSK packet (RSSI, length, errors).
    pub async fn get_gfsk_packet_status(
        &mut self,
    ) -> Result<GfskPacketStatus, LrError<TSPIERR, TPINERR>> {
        let mut response = [NOP; 4];
        self.read_command(&opcode::GET_PACKET_STATUS, &mut response)
            .await?;
        Ok(response.into())
    }

    /// Resets the device by pulling the NRESET pin low.
    pub async fn reset(&mut self) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.nrst_pin.set_low().map_err(PinError::Reset)?;
        // NRESET must be held low for at least 100 µs.
        self.spi
            .transaction(&mut [Operation::DelayNs(200_000)])
            .await
            .map_err(SpiError::Write)?;
        self.nrst_pin.set_high().map_err(PinError::Reset)?;
        self.wait_on_busy().await
    }

    /// Checks if the chip's BUSY pin is high.
    pub fn is_busy(&mut self) -> bool {
        self.busy_pin.is_high().unwrap_or(true)
    }

    /// Checks if the chip's IRQ pin is high.
    pub fn is_irq_high(&mut self) -> bool {
        self.irq_pin.is_high().unwrap_or(false)
    }

    /// Waits until the BUSY pin goes low.
    pub async fn wait_on_busy(&mut self) -> Result<(), LrError<TSPIERR, TPINERR>> {
        self.spi
            .transaction(&mut [Operation::DelayNs(1000)])
            .await
            .map_err(SpiError::Transfer)?;
        self.busy_pin
            .wait_for_low()
            .await
            .map_err(PinError::Busy)?;
        Ok(())
    }

    /// Waits until the IRQ pin goes high.
    pub async fn wait_on_irq(&mut self) -> Result<(), PinError<TPINERR>> {
        self.irq_pin.wait_for_high().await.map_err(PinError::Irq)
    }
}
