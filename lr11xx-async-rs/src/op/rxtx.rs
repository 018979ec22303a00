//! Transmit (TX) and Receive (RX) operation parameters.

/// Frequency of the LR11xx real-time clock used for timeouts (Hz).
pub const RTC_FREQ_HZ: u32 = 32_768;

/// Largest timeout value the 24-bit RTC step counter can express, in steps.
pub const MAX_RTC_STEPS: u32 = 0x00FF_FFFE;

/// Largest timeout in milliseconds accepted by [`RxTxTimeout::from_ms`].
pub const MAX_TIMEOUT_MS: u32 = (MAX_RTC_STEPS as u64 * 1000 / RTC_FREQ_HZ as u64) as u32;

/// A timeout value for RX and TX operations.
///
/// The chip counts timeouts in steps of its 32.768 kHz RTC, on 24 bits.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct RxTxTimeout {
    inner: [u8; 3],
}

impl core::fmt::Debug for RxTxTimeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RxTxTimeout({} steps)", self.steps())
    }
}

impl From<RxTxTimeout> for [u8; 3] {
    fn from(val: RxTxTimeout) -> Self {
        val.inner
    }
}

impl RxTxTimeout {
    /// Creates a timeout from a duration in milliseconds.
    /// The value is `ms * 32768 / 1000`, saturated to the 24-bit range.
    pub const fn from_ms(ms: u32) -> Self {
        let steps = ms as u64 * RTC_FREQ_HZ as u64 / 1000;
        let steps = if steps > MAX_RTC_STEPS as u64 {
            MAX_RTC_STEPS
        } else {
            steps as u32
        };
        Self::from_steps(steps)
    }

    const fn from_steps(steps: u32) -> Self {
        let bytes = steps.to_be_bytes();
        Self {
            inner: [bytes[1], bytes[2], bytes[3]],
        }
    }

    /// No timeout: TX runs until the packet is sent, RX stops after one packet.
    pub const fn none() -> Self {
        Self { inner: [0, 0, 0] }
    }

    /// A special value representing continuous receive mode.
    pub const fn continuous_rx() -> Self {
        Self {
            inner: [0xFF, 0xFF, 0xFF],
        }
    }

    /// Returns the number of RTC steps encoded in this timeout.
    pub const fn steps(self) -> u32 {
        u32::from_be_bytes([0, self.inner[0], self.inner[1], self.inner[2]])
    }
}

/// Power amplifier ramp time.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum RampTime {
    /// 16 µs
    Ramp16u = 0x00,
    /// 32 µs
    Ramp32u = 0x01,
    /// 48 µs
    Ramp48u = 0x02,
    /// 64 µs
    Ramp64u = 0x03,
    /// 80 µs
    Ramp80u = 0x04,
    /// 96 µs
    Ramp96u = 0x05,
    /// 112 µs
    Ramp112u = 0x06,
    /// 128 µs
    Ramp128u = 0x07,
    /// 144 µs
    Ramp144u = 0x08,
    /// 160 µs
    Ramp160u = 0x09,
    /// 176 µs
    Ramp176u = 0x0A,
    /// 192 µs
    Ramp192u = 0x0B,
    /// 208 µs
    Ramp208u = 0x0C,
    /// 240 µs
    Ramp240u = 0x0D,
    /// 272 µs
    Ramp272u = 0x0E,
    /// 304 µs
    Ramp304u = 0x0F,
}

/// A builder for transmit (TX) parameters.
#[derive(Copy, Clone, Debug)]
pub struct TxParams {
    power_dbm: i8,
    ramp_time: RampTime,
}

impl Default for TxParams {
    fn default() -> Self {
        Self {
            power_dbm: 0,
            ramp_time: RampTime::Ramp48u,
        }
    }
}

impl From<TxParams> for [u8; 2] {
    fn from(val: TxParams) -> Self {
        [val.power_dbm as u8, val.ramp_time as u8]
    }
}

impl TxParams {
    /// Sets the output power in dBm.
    ///
    /// The valid range depends on the selected power amplifier (PA):
    /// - Low power PA: -17 to +15 dBm
    /// - High power PA: -9 to +22 dBm
    /// - High frequency PA: -18 to +13 dBm
    pub fn set_power_dbm(mut self, power_dbm: i8) -> Self {
        debug_assert!(power_dbm >= -18);
        debug_assert!(power_dbm <= 22);
        self.power_dbm = power_dbm;
        self
    }

    /// Sets the power amplifier ramp time.
    pub fn set_ramp_time(mut self, ramp_time: RampTime) -> Self {
        self.ramp_time = ramp_time;
        self
    }
}

/// The power amplifier used for transmission.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum PaSelection {
    /// Low power PA (sub-GHz).
    LowPower = 0x00,
    /// High power PA (sub-GHz).
    HighPower = 0x01,
    /// High frequency PA (2.4 GHz, LR1120/LR1121 only).
    HighFrequency = 0x02,
}

/// Supply of the power amplifier regulator.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum PaRegSupply {
    /// Internal regulator.
    Vreg = 0x00,
    /// Battery.
    Vbat = 0x01,
}

/// A builder for power amplifier (PA) configuration.
#[derive(Copy, Clone, Debug)]
pub struct PaConfig {
    pa_sel: PaSelection,
    reg_supply: PaRegSupply,
    pa_duty_cycle: u8,
    pa_hp_sel: u8,
}

impl From<PaConfig> for [u8; 4] {
    fn from(val: PaConfig) -> Self {
        [
            val.pa_sel as u8,
            val.reg_supply as u8,
            val.pa_duty_cycle,
            val.pa_hp_sel,
        ]
    }
}

impl Default for PaConfig {
    fn default() -> Self {
        Self {
            pa_sel: PaSelection::LowPower,
            reg_supply: PaRegSupply::Vreg,
            pa_duty_cycle: 0x04,
            pa_hp_sel: 0x00,
        }
    }
}

impl PaConfig {
    /// Selects the power amplifier.
    pub fn set_pa_sel(mut self, pa_sel: PaSelection) -> Self {
        self.pa_sel = pa_sel;
        self
    }

    /// Selects the PA regulator supply.
    pub fn set_reg_supply(mut self, reg_supply: PaRegSupply) -> Self {
        self.reg_supply = reg_supply;
        self
    }

    /// Sets the PA duty cycle.
    pub fn set_pa_duty_cycle(mut self, pa_duty_cycle: u8) -> Self {
        self.pa_duty_cycle = pa_duty_cycle;
        self
    }

    /// Sets the size of the high-power PA.
    pub fn set_pa_hp_sel(mut self, pa_hp_sel: u8) -> Self {
        self.pa_hp_sel = pa_hp_sel;
        self
    }
}

/// The status of the receive (RX) buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxBufferStatus {
    payload_length_rx: u8,
    rx_start_buffer_pointer: u8,
}

impl From<[u8; 2]> for RxBufferStatus {
    fn from(raw: [u8; 2]) -> Self {
        Self {
            payload_length_rx: raw[0],
            rx_start_buffer_pointer: raw[1],
        }
    }
}

impl RxBufferStatus {
    /// Returns the length of the received payload.
    pub fn payload_length_rx(&self) -> u8 {
        self.payload_length_rx
    }

    /// Returns the starting address of the payload in the buffer.
    pub fn rx_start_buffer_pointer(&self) -> u8 {
        self.rx_start_buffer_pointer
    }
}
