//! Status and identification structures returned by the chip.

/// The kind of LR11xx chip, as reported by `GetVersion`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChipType {
    /// LR1110.
    LR1110,
    /// LR1120.
    LR1120,
    /// LR1121.
    LR1121,
    /// The chip is running its bootloader.
    Bootloader,
    /// An identifier this driver does not know.
    Unknown(u8),
}

impl From<u8> for ChipType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::LR1110,
            0x02 => Self::LR1120,
            0x03 => Self::LR1121,
            0xDF => Self::Bootloader,
            other => Self::Unknown(other),
        }
    }
}

/// Hardware and firmware version of the chip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Version {
    /// Hardware revision.
    pub hw: u8,
    /// Chip type.
    pub chip_type: ChipType,
    /// Firmware version.
    pub fw: u16,
}

impl From<[u8; 4]> for Version {
    fn from(raw: [u8; 4]) -> Self {
        Self {
            hw: raw[0],
            chip_type: raw[1].into(),
            fw: u16::from_be_bytes([raw[2], raw[3]]),
        }
    }
}

/// Outcome of the previous command, reported in the first status byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command failed.
    Fail,
    /// Peripheral error.
    PeripheralError,
    /// Command executed.
    Ok,
    /// Data is available to read.
    Data,
}

/// The first status byte (`Stat1`) clocked out on every SPI read.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Stat1 {
    inner: u8,
}

impl From<u8> for Stat1 {
    fn from(value: u8) -> Self {
        Self { inner: value }
    }
}

impl core::fmt::Debug for Stat1 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stat1")
            .field("command_status", &self.command_status())
            .field("irq_pending", &self.irq_pending())
            .finish()
    }
}

impl Stat1 {
    /// Returns the status of the previous command.
    pub fn command_status(self) -> CommandStatus {
        match (self.inner >> 1) & 0x07 {
            0 => CommandStatus::Fail,
            1 => CommandStatus::PeripheralError,
            2 => CommandStatus::Ok,
            _ => CommandStatus::Data,
        }
    }

    /// Returns `true` if at least one interrupt is pending.
    pub fn irq_pending(self) -> bool {
        self.inner & 0x01 != 0
    }
}

/// The status of the last received LoRa packet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoRaPacketStatus {
    /// Average RSSI over the packet, in dBm.
    pub rssi_pkt_in_dbm: i16,
    /// Estimated SNR of the packet, in dB.
    pub snr_pkt_in_db: i8,
    /// RSSI of the despread LoRa signal, in dBm.
    pub signal_rssi_pkt_in_dbm: i16,
}

impl From<[u8; 3]> for LoRaPacketStatus {
    fn from(raw: [u8; 3]) -> Self {
        Self {
            rssi_pkt_in_dbm: -(raw[0] as i16) / 2,
            snr_pkt_in_db: ((raw[1] as i8 as i16 + 2) >> 2) as i8,
            signal_rssi_pkt_in_dbm: -(raw[2] as i16) / 2,
        }
    }
}

/// The status of the last received GFSK packet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GfskPacketStatus {
    /// RSSI measured on the sync word, in dBm.
    pub rssi_sync_in_dbm: i16,
    /// Average RSSI over the packet, in dBm.
    pub rssi_avg_in_dbm: i16,
    /// Length of the received packet, in bytes.
    pub rx_len_in_bytes: u8,
    flags: u8,
}

impl From<[u8; 4]> for GfskPacketStatus {
    fn from(raw: [u8; 4]) -> Self {
        Self {
            rssi_sync_in_dbm: -(raw[0] as i16) / 2,
            rssi_avg_in_dbm: -(raw[1] as i16) / 2,
            rx_len_in_bytes: raw[2],
            flags: raw[3],
        }
    }
}

impl GfskPacketStatus {
    /// The address byte matched neither the node nor the broadcast address.
    pub fn address_error(&self) -> bool {
        self.flags & 0x20 != 0
    }

    pub fn crc_error(&self) -> bool {
        self.flags & 0x10 != 0
    }

    /// The length byte exceeded the configured payload length.
    pub fn len_error(&self) -> bool {
        self.flags & 0x08 != 0
    }

    pub fn aborted(&self) -> bool {
        self.flags & 0x04 != 0
    }

    pub fn received(&self) -> bool {
        self.flags & 0x02 != 0
    }
}
