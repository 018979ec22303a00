//! Interrupt (IRQ) configuration and status structures.
//!
//! The LR11xx reports interrupts through a 32-bit register. The same layout is
//! used to route interrupts to the DIO pins, to read the pending interrupts and
//! to clear them.

use core::ops::{BitAnd, BitOr};

/// A bitmask for individual interrupt flags.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IrqMaskBit {
    /// No interrupt.
    None = 0,
    /// Transmit operation done.
    TxDone = 1 << 2,
    /// Receive operation done.
    RxDone = 1 << 3,
    /// Preamble detected.
    PreambleDetected = 1 << 4,
    /// Sync word (GFSK) or header (LoRa) valid.
    SyncWordHeaderValid = 1 << 5,
    /// LoRa header CRC error.
    HeaderError = 1 << 6,
    /// Payload CRC error.
    CrcError = 1 << 7,
    /// Channel Activity Detection (CAD) done.
    CadDone = 1 << 8,
    /// Channel activity detected.
    CadDetected = 1 << 9,
    /// RX or TX timeout.
    Timeout = 1 << 10,
    /// GNSS scan finished.
    GnssScanDone = 1 << 19,
    /// Wi-Fi scan finished.
    WifiScanDone = 1 << 20,
    /// GFSK packet length error.
    FskLenError = 1 << 24,
    /// LoRa RX timestamp available.
    LoraRxTimestamp = 1 << 27,
}

const IRQ_ALL: u32 = 0x0FFF_FFFF;

/// A builder for creating an interrupt mask.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct IrqMask {
    inner: u32,
}

impl IrqMask {
    /// Creates a new, empty `IrqMask`.
    pub const fn none() -> Self {
        Self {
            inner: IrqMaskBit::None as u32,
        }
    }

    /// Creates a new `IrqMask` with every interrupt source of the chip enabled.
    pub const fn all() -> Self {
        Self { inner: IRQ_ALL }
    }

    /// Adds an interrupt flag to the mask.
    pub const fn combine(self, bit: IrqMaskBit) -> Self {
        let inner = self.inner | bit as u32;
        Self { inner }
    }

    /// Returns `true` if the given flag is part of the mask.
    pub const fn contains(self, bit: IrqMaskBit) -> bool {
        let bit = bit as u32;
        bit != 0 && self.inner & bit == bit
    }

    /// Returns `true` if every flag of `self` is also present in `other`.
    pub const fn is_subset_of(self, other: IrqMask) -> bool {
        self.inner & !other.inner == 0
    }

    /// Returns the raw register value.
    pub const fn bits(self) -> u32 {
        self.inner
    }
}

impl core::fmt::Debug for IrqMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "IrqMask({:#010X})", self.inner)
    }
}

impl From<IrqMask> for u32 {
    fn from(val: IrqMask) -> Self {
        val.inner
    }
}

impl From<u32> for IrqMask {
    fn from(mask: u32) -> Self {
        Self { inner: mask }
    }
}

impl From<IrqMaskBit> for IrqMask {
    fn from(bit: IrqMaskBit) -> Self {
        Self { inner: bit as u32 }
    }
}

impl BitOr<IrqMaskBit> for IrqMask {
    type Output = IrqMask;

    fn bitor(self, rhs: IrqMaskBit) -> Self::Output {
        self.combine(rhs)
    }
}

impl BitOr for IrqMask {
    type Output = IrqMask;

    fn bitor(self, rhs: IrqMask) -> Self::Output {
        Self {
            inner: self.inner | rhs.inner,
        }
    }
}

impl Default for IrqMask {
    fn default() -> Self {
        Self::none()
    }
}

/// Represents the interrupt status flags read from the device.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct IrqStatus {
    inner: u32,
}

impl From<u32> for IrqStatus {
    fn from(status: u32) -> Self {
        Self { inner: status }
    }
}

impl From<IrqStatus> for u32 {
    fn from(status: IrqStatus) -> Self {
        status.inner
    }
}

impl From<IrqStatus> for IrqMask {
    fn from(status: IrqStatus) -> Self {
        Self {
            inner: status.inner,
        }
    }
}

impl BitAnd<IrqMask> for IrqStatus {
    type Output = IrqStatus;

    fn bitand(self, rhs: IrqMask) -> Self::Output {
        self.masked(rhs)
    }
}

impl core::fmt::Debug for IrqStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqStatus")
            .field("tx_done", &self.tx_done())
            .field("rx_done", &self.rx_done())
            .field("preamble_detected", &self.preamble_detected())
            .field("syncword_header_valid", &self.syncword_header_valid())
            .field("header_error", &self.header_error())
            .field("crc_error", &self.crc_error())
            .field("cad_done", &self.cad_done())
            .field("cad_detected", &self.cad_detected())
            .field("timeout", &self.timeout())
            .field("gnss_scan_done", &self.gnss_scan_done())
            .field("wifi_scan_done", &self.wifi_scan_done())
            .field("fsk_len_error", &self.fsk_len_error())
            .field("lora_rx_timestamp", &self.lora_rx_timestamp())
            .finish()
    }
}

impl IrqStatus {
    /// Returns the raw register value.
    pub fn bits(self) -> u32 {
        self.inner
    }

    /// Returns `true` if no interrupt flag is set.
    pub fn is_empty(self) -> bool {
        self.inner == 0
    }

    /// Keeps only the flags present in `mask`.
    pub fn masked(self, mask: IrqMask) -> Self {
        Self {
            inner: self.inner & mask.inner,
        }
    }

    /// Returns `true` if the given flag is set.
    pub fn is_set(self, bit: IrqMaskBit) -> bool {
        let bit = bit as u32;
        (self.inner & bit) == bit && bit != 0
    }

    /// Returns `true` if the `TxDone` interrupt is active.
    pub fn tx_done(self) -> bool {
        self.is_set(IrqMaskBit::TxDone)
    }

    /// Returns `true` if the `RxDone` interrupt is active.
    pub fn rx_done(self) -> bool {
        self.is_set(IrqMaskBit::RxDone)
    }

    /// Returns `true` if the `PreambleDetected` interrupt is active.
    pub fn preamble_detected(self) -> bool {
        self.is_set(IrqMaskBit::PreambleDetected)
    }

    /// Returns `true` if the `SyncWordHeaderValid` interrupt is active.
    pub fn syncword_header_valid(self) -> bool {
        self.is_set(IrqMaskBit::SyncWordHeaderValid)
    }

    /// Returns `true` if the `HeaderError` interrupt is active.
    pub fn header_error(self) -> bool {
        self.is_set(IrqMaskBit::HeaderError)
    }

    /// Returns `true` if the `CrcError` interrupt is active.
    pub fn crc_error(self) -> bool {
        self.is_set(IrqMaskBit::CrcError)
    }

    /// Returns `true` if the `CadDone` interrupt is active.
    pub fn cad_done(self) -> bool {
        self.is_set(IrqMaskBit::CadDone)
    }

    /// Returns `true` if the `CadDetected` interrupt is active.
    pub fn cad_detected(self) -> bool {
        self.is_set(IrqMaskBit::CadDetected)
    }

    /// Returns `true` if the `Timeout` interrupt is active.
    pub fn timeout(self) -> bool {
        self.is_set(IrqMaskBit::Timeout)
    }

    /// Returns `true` if the `GnssScanDone` interrupt is active.
    pub fn gnss_scan_done(self) -> bool {
        self.is_set(IrqMaskBit::GnssScanDone)
    }

    /// Returns `true` if the `WifiScanDone` interrupt is active.
    pub fn wifi_scan_done(self) -> bool {
        self.is_set(IrqMaskBit::WifiScanDone)
    }

    /// Returns `true` if the `FskLenError` interrupt is active.
    pub fn fsk_len_error(self) -> bool {
        self.is_set(IrqMaskBit::FskLenError)
    }

    /// Returns `true` if the `LoraRxTimestamp` interrupt is active.
    pub fn lora_rx_timestamp(self) -> bool {
        self.is_set(IrqMaskBit::LoraRxTimestamp)
    }
}
