//! Application configuration.
//!
//! Every application reads its parameters from one [`AppConfig`], validated once
//! at startup with [`AppConfig::validate`].

use lr11xx_async::conf::{Config, ModemConfig};
use lr11xx_async::op::*;

/// Largest payload the LR11xx buffer commands can move in one go.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Largest RX timeout base, limited by the 24-bit RTC step counter.
pub const MAX_RX_TIMEOUT_MS: u32 = MAX_TIMEOUT_MS;

/// Sync word of private LoRa networks.
pub const LORA_PRIVATE_SYNC_WORD: u8 = 0x12;

/// Default GFSK sync word. The packet parameters select how many of its bits
/// are used.
pub const GFSK_SYNC_WORD: [u8; 8] = [0x97, 0x23, 0x52, 0x25, 0x56, 0x53, 0x65, 0x64];

/// Interrupts subscribed to by default: the terminal TX/RX events, preamble
/// detection and the reception errors.
pub const DEFAULT_IRQ_MASK: IrqMask = IrqMask::none()
    .combine(IrqMaskBit::TxDone)
    .combine(IrqMaskBit::RxDone)
    .combine(IrqMaskBit::PreambleDetected)
    .combine(IrqMaskBit::Timeout)
    .combine(IrqMaskBit::HeaderError)
    .combine(IrqMaskBit::CrcError)
    .combine(IrqMaskBit::FskLenError);

/// The application run on top of the radio.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Sends counter-stamped packets back to back.
    PerTransmitter,
    /// Receives the packets of a `PerTransmitter` and counts the lost ones.
    PerReceiver,
    /// Sends UART lines over the air and listens for answers.
    UartBridge,
}

impl Role {
    /// Interrupts the role cannot run without.
    pub const fn required_irqs(self) -> IrqMask {
        match self {
            Role::PerTransmitter => IrqMask::none().combine(IrqMaskBit::TxDone),
            Role::PerReceiver => IrqMask::none()
                .combine(IrqMaskBit::RxDone)
                .combine(IrqMaskBit::Timeout),
            Role::UartBridge => IrqMask::none()
                .combine(IrqMaskBit::TxDone)
                .combine(IrqMaskBit::RxDone)
                .combine(IrqMaskBit::Timeout),
        }
    }

    /// Smallest payload the role can work with.
    ///
    /// PER payloads carry the counter in their first byte, followed by at least
    /// one byte of the known pattern.
    pub const fn min_payload_len(self) -> u8 {
        match self {
            Role::PerTransmitter | Role::PerReceiver => 2,
            Role::UartBridge => 1,
        }
    }
}

/// An error found while validating an [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The payload length is too small for the role.
    PayloadTooShort {
        /// The configured length.
        len: u8,
        /// The smallest length the role accepts.
        min: u8,
    },
    /// The RX timeout base is zero or exceeds [`MAX_RX_TIMEOUT_MS`].
    RxTimeoutOutOfRange(u32),
    /// The IRQ mask holds bits the chip does not define.
    UnknownIrqBits(IrqMask),
    /// The IRQ mask lacks interrupts the role depends on.
    MissingIrqs {
        /// The role being configured.
        role: Role,
        /// The interrupts the role needs.
        required: IrqMask,
    },
    /// Only LoRa and GFSK packets can be both sent and received.
    UnsupportedPacketType(PacketType),
    /// The UART bridge was set up without a UART to read from.
    UartRequired,
}

/// Configuration of an application session.
#[derive(Copy, Clone, Debug)]
pub struct AppConfig {
    /// The application to run.
    pub role: Role,
    /// Length of every transmitted payload and size of the receive buffer, in bytes.
    pub payload_len: u8,
    /// RX timeout base in milliseconds. The packet time on air is added to it.
    pub rx_timeout_ms: u32,
    /// Pause between a `TxDone` and the next transmission of the PER transmitter.
    pub tx_to_tx_delay_ms: u32,
    /// The interrupts the application acts upon.
    pub irq_mask: IrqMask,
    /// RF frequency in Hz.
    pub rf_frequency: u32,
    /// TX output power in dBm.
    pub tx_power_dbm: i8,
    /// The modem: [`PacketType::LoRa`] or [`PacketType::GFSK`].
    pub packet_type: PacketType,
    /// LoRa modulation parameters.
    pub lora_mod_params: LoraModParams,
    /// LoRa packet parameters. The payload length is taken from `payload_len`.
    pub lora_packet_params: LoRaPacketParams,
    /// GFSK modulation parameters.
    pub gfsk_mod_params: GfskModParams,
    /// GFSK packet parameters. The payload length is taken from `payload_len`.
    pub gfsk_packet_params: GfskPacketParams,
    pub gfsk_sync_word: [u8; 8],
    /// Used when the GFSK packet parameters enable whitening.
    pub gfsk_whitening_seed: u16,
    /// Used when the GFSK packet parameters enable a CRC.
    pub gfsk_crc_seed: u32,
    pub gfsk_crc_polynomial: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            role: Role::PerReceiver,
            payload_len: 16,
            rx_timeout_ms: 3000,
            tx_to_tx_delay_ms: 200,
            irq_mask: DEFAULT_IRQ_MASK,
            rf_frequency: 868_100_000,
            tx_power_dbm: 14,
            packet_type: PacketType::LoRa,
            lora_mod_params: LoraModParams::default(),
            lora_packet_params: LoRaPacketParams::default(),
            gfsk_mod_params: GfskModParams::default(),
            gfsk_packet_params: GfskPacketParams::default(),
            gfsk_sync_word: GFSK_SYNC_WORD,
            gfsk_whitening_seed: 0x0100,
            gfsk_crc_seed: 0x1D0F,
            gfsk_crc_polynomial: 0x1021,
        }
    }
}

impl AppConfig {
    /// Sets the application role.
    pub fn set_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the payload length.
    pub fn set_payload_len(mut self, payload_len: u8) -> Self {
        self.payload_len = payload_len;
        self
    }

    /// Sets the RX timeout base.
    pub fn set_rx_timeout_ms(mut self, rx_timeout_ms: u32) -> Self {
        self.rx_timeout_ms = rx_timeout_ms;
        self
    }

    /// Sets the delay between two PER transmissions.
    pub fn set_tx_to_tx_delay_ms(mut self, tx_to_tx_delay_ms: u32) -> Self {
        self.tx_to_tx_delay_ms = tx_to_tx_delay_ms;
        self
    }

    /// Sets the subscribed interrupts.
    pub fn set_irq_mask(mut self, irq_mask: IrqMask) -> Self {
        self.irq_mask = irq_mask;
        self
    }

    /// Sets the RF frequency in Hz.
    pub fn set_rf_frequency(mut self, rf_frequency: u32) -> Self {
        self.rf_frequency = rf_frequency;
        self
    }

    /// Sets the TX output power in dBm.
    pub fn set_tx_power_dbm(mut self, tx_power_dbm: i8) -> Self {
        self.tx_power_dbm = tx_power_dbm;
        self
    }

    /// Selects the modem.
    pub fn set_packet_type(mut self, packet_type: PacketType) -> Self {
        self.packet_type = packet_type;
        self
    }

    /// Sets the LoRa modulation parameters.
    pub fn set_lora_mod_params(mut self, lora_mod_params: LoraModParams) -> Self {
        self.lora_mod_params = lora_mod_params;
        self
    }

    /// Sets the LoRa packet parameters.
    pub fn set_lora_packet_params(mut self, lora_packet_params: LoRaPacketParams) -> Self {
        self.lora_packet_params = lora_packet_params;
        self
    }

    /// Sets the GFSK modulation parameters.
    pub fn set_gfsk_mod_params(mut self, gfsk_mod_params: GfskModParams) -> Self {
        self.gfsk_mod_params = gfsk_mod_params;
        self
    }

    /// Sets the GFSK packet parameters.
    pub fn set_gfsk_packet_params(mut self, gfsk_packet_params: GfskPacketParams) -> Self {
        self.gfsk_packet_params = gfsk_packet_params;
        self
    }

    /// Sets the GFSK sync word.
    pub fn set_gfsk_sync_word(mut self, gfsk_sync_word: [u8; 8]) -> Self {
        self.gfsk_sync_word = gfsk_sync_word;
        self
    }

    /// Checks the configuration against the documented ranges.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !matches!(self.packet_type, PacketType::LoRa | PacketType::GFSK) {
            return Err(ConfigError::UnsupportedPacketType(self.packet_type));
        }
        let min = self.role.min_payload_len();
        if self.payload_len < min {
            return Err(ConfigError::PayloadTooShort {
                len: self.payload_len,
                min,
            });
        }
        if self.rx_timeout_ms == 0 || self.rx_timeout_ms > MAX_RX_TIMEOUT_MS {
            return Err(ConfigError::RxTimeoutOutOfRange(self.rx_timeout_ms));
        }
        if !self.irq_mask.is_subset_of(IrqMask::all()) {
            return Err(ConfigError::UnknownIrqBits(self.irq_mask));
        }
        let required = self.role.required_irqs();
        if !required.is_subset_of(self.irq_mask) {
            return Err(ConfigError::MissingIrqs {
                role: self.role,
                required,
            });
        }
        Ok(self)
    }

    fn sized_lora_packet_params(&self) -> LoRaPacketParams {
        self.lora_packet_params.set_payload_len(self.payload_len)
    }

    fn sized_gfsk_packet_params(&self) -> GfskPacketParams {
        self.gfsk_packet_params.set_payload_len(self.payload_len)
    }

    /// Time on air of one payload with the selected modem, in milliseconds.
    pub fn time_on_air_ms(&self) -> u32 {
        match self.packet_type {
            PacketType::LoRa => {
                lora_time_on_air_ms(&self.lora_mod_params, &self.sized_lora_packet_params())
            }
            PacketType::GFSK => {
                gfsk_time_on_air_ms(&self.gfsk_mod_params, &self.sized_gfsk_packet_params())
            }
            _ => 0,
        }
    }

    /// The RX timeout: the configured base plus the payload time on air.
    pub fn rx_timeout(&self) -> RxTxTimeout {
        RxTxTimeout::from_ms(self.rx_timeout_ms.saturating_add(self.time_on_air_ms()))
    }

    /// Builds the driver configuration matching this application configuration.
    ///
    /// Anything but GFSK is configured as LoRa; [`AppConfig::validate`] rejects
    /// the other packet types.
    pub fn radio_config(&self) -> Config {
        let (mod_params, packet_params, modem): (ModParams, PacketParams, ModemConfig) =
            match self.packet_type {
                PacketType::GFSK => {
                    let packet_params = self.sized_gfsk_packet_params();
                    let whitening_seed = (packet_params.dc_free != GfskDcFree::Off)
                        .then_some(self.gfsk_whitening_seed);
                    let crc_params = (packet_params.crc_type != GfskCrcType::CrcOff)
                        .then_some((self.gfsk_crc_seed, self.gfsk_crc_polynomial));
                    (
                        self.gfsk_mod_params.into(),
                        packet_params.into(),
                        ModemConfig::Gfsk {
                            sync_word: self.gfsk_sync_word,
                            whitening_seed,
                            crc_params,
                        },
                    )
                }
                _ => (
                    self.lora_mod_params.into(),
                    self.sized_lora_packet_params().into(),
                    ModemConfig::LoRa {
                        sync_word: LORA_PRIVATE_SYNC_WORD,
                    },
                ),
            };
        Config {
            packet_type: match self.packet_type {
                PacketType::GFSK => PacketType::GFSK,
                _ => PacketType::LoRa,
            },
            rf_frequency: self.rf_frequency,
            pa_config: PaConfig::default(),
            tx_params: TxParams::default()
                .set_power_dbm(self.tx_power_dbm)
                .set_ramp_time(RampTime::Ramp48u),
            fallback_mode: FallbackMode::StbyRc,
            rx_boosted: false,
            mod_params,
            packet_params: Some(packet_params),
            modem,
            dio_irq_mask: self.irq_mask,
            tcxo_opts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_for_every_role() {
        for role in [Role::PerTransmitter, Role::PerReceiver, Role::UartBridge] {
            assert!(AppConfig::default().set_role(role).validate().is_ok());
        }
    }

    #[test]
    fn per_payload_needs_a_pattern_byte() {
        let err = AppConfig::default().set_payload_len(1).validate().unwrap_err();
        assert_eq!(err, ConfigError::PayloadTooShort { len: 1, min: 2 });

        let bridge = AppConfig::default()
            .set_role(Role::UartBridge)
            .set_payload_len(1);
        assert!(bridge.validate().is_ok());
    }

    #[test]
    fn rx_timeout_range() {
        let zero = AppConfig::default().set_rx_timeout_ms(0).validate();
        assert_eq!(zero.unwrap_err(), ConfigError::RxTimeoutOutOfRange(0));

        let too_long = AppConfig::default()
            .set_rx_timeout_ms(MAX_RX_TIMEOUT_MS + 1)
            .validate();
        assert!(matches!(
            too_long,
            Err(ConfigError::RxTimeoutOutOfRange(_))
        ));
    }

    #[test]
    fn irq_mask_must_cover_the_role() {
        let mask = IrqMask::none() | IrqMaskBit::TxDone;
        let err = AppConfig::default().set_irq_mask(mask).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingIrqs {
                role: Role::PerReceiver,
                required: Role::PerReceiver.required_irqs(),
            }
        );

        let unknown = AppConfig::default()
            .set_irq_mask(DEFAULT_IRQ_MASK | IrqMask::from(1 << 30))
            .validate();
        assert!(matches!(unknown, Err(ConfigError::UnknownIrqBits(_))));
    }

    #[test]
    fn rx_timeout_includes_time_on_air() {
        // SF7, BW125, CR4/5, 16 byte payload: 51.456 ms on air.
        let config = AppConfig::default();
        assert_eq!(config.time_on_air_ms(), 52);
        assert_eq!(config.rx_timeout(), RxTxTimeout::from_ms(3052));

        let gfsk = config.set_packet_type(PacketType::GFSK);
        assert_eq!(gfsk.time_on_air_ms(), 5);
        assert_eq!(gfsk.rx_timeout(), RxTxTimeout::from_ms(3005));
    }

    #[test]
    fn only_lora_and_gfsk_are_accepted() {
        let gfsk = AppConfig::default().set_packet_type(PacketType::GFSK);
        assert!(gfsk.validate().is_ok());

        let bpsk = AppConfig::default().set_packet_type(PacketType::BPSK).validate();
        assert_eq!(
            bpsk.unwrap_err(),
            ConfigError::UnsupportedPacketType(PacketType::BPSK)
        );
    }

    #[test]
    fn gfsk_radio_config() {
        let config = AppConfig::default()
            .set_packet_type(PacketType::GFSK)
            .set_payload_len(12);
        let radio = config.radio_config();

        assert_eq!(radio.packet_type, PacketType::GFSK);
        assert_eq!(radio.mod_params.as_bytes().len(), 10);
        let packet_params = radio.packet_params.unwrap();
        assert_eq!(packet_params.as_bytes()[6], 12);
        assert!(matches!(
            radio.modem,
            ModemConfig::Gfsk {
                sync_word: GFSK_SYNC_WORD,
                whitening_seed: Some(0x0100),
                crc_params: Some((0x1D0F, 0x1021)),
            }
        ));

        let plain = config
            .set_gfsk_packet_params(
                GfskPacketParams::default()
                    .set_crc_type(GfskCrcType::CrcOff)
                    .set_dc_free(GfskDcFree::Off),
            )
            .radio_config();
        assert!(matches!(
            plain.modem,
            ModemConfig::Gfsk {
                whitening_seed: None,
                crc_params: None,
                ..
            }
        ));
    }
}
