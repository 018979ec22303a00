//! Standby and fallback modes.

/// Clock kept running in standby (`SetStandby`).
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StandbyConfig {
    /// 32 MHz RC oscillator.
    StbyRc = 0x00,
    /// 32 MHz crystal oscillator, faster to leave for TX or RX.
    StbyXosc = 0x01,
}

/// The mode the chip falls back to after a TX or RX operation.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum FallbackMode {
    /// Standby with RC oscillator.
    StbyRc = 0x01,
    /// Standby with crystal oscillator.
    StbyXosc = 0x02,
    /// Frequency synthesis.
    Fs = 0x03,
}
