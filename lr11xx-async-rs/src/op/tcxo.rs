//! TCXO supply control (`SetTcxoMode`).

use super::rxtx::RTC_FREQ_HZ;

/// Voltage supplied to the TCXO on the VTCXO pin.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum TcxoVoltage {
    /// 1.6V
    Volt1_6 = 0x00,
    /// 1.7V
    Volt1_7 = 0x01,
    /// 1.8V
    Volt1_8 = 0x02,
    /// 2.2V
    Volt2_2 = 0x03,
    /// 2.4V
    Volt2_4 = 0x04,
    /// 2.7V
    Volt2_7 = 0x05,
    /// 3.0V
    Volt3_0 = 0x06,
    /// 3.3V
    Volt3_3 = 0x07,
}

/// Time given to the TCXO to settle before the chip uses it, in RTC steps.
#[derive(Copy, Clone, Debug)]
pub struct TcxoDelay {
    inner: [u8; 3],
}

impl From<TcxoDelay> for [u8; 3] {
    fn from(val: TcxoDelay) -> Self {
        val.inner
    }
}

impl TcxoDelay {
    /// Creates a TCXO delay from a duration in milliseconds.
    /// The value is `ms * 32768 / 1000`, in RTC steps.
    pub const fn from_ms(ms: u32) -> Self {
        let steps = (ms as u64 * RTC_FREQ_HZ as u64 / 1000) as u32;
        let bytes = steps.to_be_bytes();
        Self {
            inner: [bytes[1], bytes[2], bytes[3]],
        }
    }
}
