//! Wrapper for radio configuration parameters.

use super::op::*;

/// Configuration parameters used to initialize the LR11xx radio.
pub struct Config {
    /// The packet type to be used.
    pub packet_type: PacketType,
    /// The RF frequency in Hz (e.g., `868_100_000` for 868.1 MHz).
    pub rf_frequency: u32,
    /// Power-amplifier configuration.
    pub pa_config: PaConfig,
    /// TX power and ramp time configuration.
    pub tx_params: TxParams,
    /// The mode the chip returns to after TX or RX.
    pub fallback_mode: FallbackMode,
    /// Enables the RX boosted mode (better sensitivity, higher consumption).
    pub rx_boosted: bool,
    /// Modulation parameters (e.g., spreading factor, bandwidth).
    pub mod_params: ModParams,
    /// Packet parameters (e.g., preamble length, header type).
    /// Set to `None` to configure these later.
    pub packet_params: Option<PacketParams>,
    /// Sync word and, for GFSK, the whitening and CRC settings.
    pub modem: ModemConfig,
    /// Interrupts routed to the IRQ (DIO9) pin.
    pub dio_irq_mask: IrqMask,
    /// TCXO (Temperature-Compensated Crystal Oscillator) options.
    /// Set to `None` if not using a TCXO.
    pub tcxo_opts: Option<(TcxoVoltage, TcxoDelay)>,
}

/// Modem specific settings applied after the packet parameters.
pub enum ModemConfig {
    /// LoRa sync word. Use `0x34` for public networks and `0x12` for private networks.
    LoRa { sync_word: u8 },
    Gfsk {
        sync_word: [u8; 8],
        /// Whitening seed, set when the packet parameters enable whitening.
        whitening_seed: Option<u16>,
        /// CRC `(seed, polynomial)`, set when the packet parameters enable a CRC.
        crc_params: Option<(u32, u32)>,
    },
}
