//! Modulation parameters for LoRa and GFSK.

/// Raw `SetModulationParams` payload: 4 bytes for LoRa, 10 for GFSK.
pub struct ModParams {
    inner: [u8; 10],
    len: usize,
}

impl ModParams {
    fn new(raw: &[u8]) -> Self {
        let mut inner = [0u8; 10];
        inner[..raw.len()].copy_from_slice(raw);
        Self {
            inner,
            len: raw.len(),
        }
    }

    /// The bytes sent after the opcode.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner[..self.len]
    }
}

pub use gfsk::*;
pub use lora::*;

mod lora {
    use super::ModParams;

    /// Symbol duration above which low data rate optimization is required, in µs.
    const LDRO_SYMBOL_TIME_US: u32 = 16_380;

    /// LoRa spreading factor.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoRaSpreadFactor {
        /// Spreading Factor 5.
        SF5 = 0x05,
        /// Spreading Factor 6.
        SF6 = 0x06,
        /// Spreading Factor 7.
        SF7 = 0x07,
        /// Spreading Factor 8.
        SF8 = 0x08,
        /// Spreading Factor 9.
        SF9 = 0x09,
        /// Spreading Factor 10.
        SF10 = 0x0A,
        /// Spreading Factor 11.
        SF11 = 0x0B,
        /// Spreading Factor 12.
        SF12 = 0x0C,
    }

    impl TryFrom<u8> for LoRaSpreadFactor {
        type Error = u8;

        fn try_from(value: u8) -> Result<Self, Self::Error> {
            match value {
                0x05 => Ok(Self::SF5),
                0x06 => Ok(Self::SF6),
                0x07 => Ok(Self::SF7),
                0x08 => Ok(Self::SF8),
                0x09 => Ok(Self::SF9),
                0x0A => Ok(Self::SF10),
                0x0B => Ok(Self::SF11),
                0x0C => Ok(Self::SF12),
                other => Err(other),
            }
        }
    }

    /// LoRa bandwidth.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoRaBandWidth {
        /// 7.81 kHz
        BW7 = 0x00,
        /// 10.42 kHz
        BW10 = 0x08,
        /// 15.63 kHz
        BW15 = 0x01,
        /// 20.83 kHz
        BW20 = 0x09,
        /// 31.25 kHz
        BW31 = 0x02,
        /// 41.67 kHz
        BW41 = 0x0A,
        /// 62.50 kHz
        BW62 = 0x03,
        /// 125 kHz
        BW125 = 0x04,
        /// 250 kHz
        BW250 = 0x05,
        /// 500 kHz
        BW500 = 0x06,
        /// 203 kHz (2.4 GHz)
        BW200 = 0x0D,
        /// 406 kHz (2.4 GHz)
        BW400 = 0x0E,
        /// 812 kHz (2.4 GHz)
        BW800 = 0x0F,
    }

    impl LoRaBandWidth {
        /// Returns the bandwidth in Hz.
        pub const fn hz(self) -> u32 {
            match self {
                Self::BW7 => 7_810,
                Self::BW10 => 10_420,
                Self::BW15 => 15_630,
                Self::BW20 => 20_830,
                Self::BW31 => 31_250,
                Self::BW41 => 41_670,
                Self::BW62 => 62_500,
                Self::BW125 => 125_000,
                Self::BW250 => 250_000,
                Self::BW500 => 500_000,
                Self::BW200 => 203_125,
                Self::BW400 => 406_250,
                Self::BW800 => 812_500,
            }
        }
    }

    /// LoRa coding rate.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoraCodingRate {
        /// 4/5
        CR4_5 = 0x01,
        /// 4/6
        CR4_6 = 0x02,
        /// 4/7
        CR4_7 = 0x03,
        /// 4/8
        CR4_8 = 0x04,
    }

    impl LoraCodingRate {
        /// Returns the denominator of the coding rate (5 for 4/5 and so on).
        pub const fn denominator(self) -> u32 {
            self as u32 + 4
        }
    }

    /// Returns the duration of one LoRa symbol in microseconds.
    pub const fn symbol_time_us(sf: LoRaSpreadFactor, bw: LoRaBandWidth) -> u32 {
        ((1u64 << sf as u8) * 1_000_000 / bw.hz() as u64) as u32
    }

    /// Returns `true` if the low data rate optimization must be enabled for this
    /// spreading factor and bandwidth.
    pub const fn ldro_required(sf: LoRaSpreadFactor, bw: LoRaBandWidth) -> bool {
        symbol_time_us(sf, bw) >= LDRO_SYMBOL_TIME_US
    }

    /// A builder for LoRa modulation parameters.
    #[derive(Copy, Clone, Debug)]
    pub struct LoraModParams {
        spread_factor: LoRaSpreadFactor,
        bandwidth: LoRaBandWidth,
        coding_rate: LoraCodingRate,
        /// Low Data Rate Optimize.
        low_dr_opt: bool,
    }

    impl Default for LoraModParams {
        fn default() -> Self {
            Self {
                spread_factor: LoRaSpreadFactor::SF7,
                bandwidth: LoRaBandWidth::BW125,
                coding_rate: LoraCodingRate::CR4_5,
                low_dr_opt: false,
            }
        }
    }

    impl LoraModParams {
        /// Sets the spreading factor.
        pub fn set_spread_factor(mut self, spread_factor: LoRaSpreadFactor) -> Self {
            self.spread_factor = spread_factor;
            self
        }
        /// Sets the bandwidth.
        pub fn set_bandwidth(mut self, bandwidth: LoRaBandWidth) -> Self {
            self.bandwidth = bandwidth;
            self
        }
        /// Sets the coding rate.
        pub fn set_coding_rate(mut self, coding_rate: LoraCodingRate) -> Self {
            self.coding_rate = coding_rate;
            self
        }
        /// Enables or disables the low data rate optimization.
        pub fn set_low_dr_opt(mut self, low_dr_opt: bool) -> Self {
            self.low_dr_opt = low_dr_opt;
            self
        }
        /// Enables the low data rate optimization if the current spreading factor
        /// and bandwidth need it.
        pub fn with_computed_ldro(mut self) -> Self {
            self.low_dr_opt = ldro_required(self.spread_factor, self.bandwidth);
            self
        }

        /// Returns the spreading factor.
        pub fn spread_factor(&self) -> LoRaSpreadFactor {
            self.spread_factor
        }
        /// Returns the bandwidth.
        pub fn bandwidth(&self) -> LoRaBandWidth {
            self.bandwidth
        }
        /// Returns the coding rate.
        pub fn coding_rate(&self) -> LoraCodingRate {
            self.coding_rate
        }
        /// Returns `true` if the low data rate optimization is enabled.
        pub fn low_dr_opt(&self) -> bool {
            self.low_dr_opt
        }
    }

    impl From<LoraModParams> for ModParams {
        fn from(val: LoraModParams) -> Self {
            ModParams::new(&[
                val.spread_factor as u8,
                val.bandwidth as u8,
                val.coding_rate as u8,
                val.low_dr_opt as u8,
            ])
        }
    }
}

mod gfsk {
    use super::ModParams;

    /// Gaussian filter applied to the GFSK pulses.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum GfskPulseShape {
        /// No filter (plain FSK).
        Off = 0x00,
        /// Gaussian, BT = 0.3.
        Bt03 = 0x08,
        /// Gaussian, BT = 0.5.
        Bt05 = 0x09,
        /// Gaussian, BT = 0.7.
        Bt07 = 0x0A,
        /// Gaussian, BT = 1.0.
        Bt1 = 0x0B,
    }

    /// Double side band receiver bandwidth.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum GfskBandwidth {
        Bw4800 = 0x1F,
        Bw5800 = 0x17,
        Bw7300 = 0x0F,
        Bw9700 = 0x1E,
        Bw11700 = 0x16,
        Bw14600 = 0x0E,
        Bw19500 = 0x1D,
        Bw23400 = 0x15,
        Bw29300 = 0x0D,
        Bw39000 = 0x1C,
        Bw46900 = 0x14,
        Bw58600 = 0x0C,
        Bw78200 = 0x1B,
        Bw93800 = 0x13,
        Bw117300 = 0x0B,
        Bw156200 = 0x1A,
        Bw187200 = 0x12,
        Bw234300 = 0x0A,
        Bw312000 = 0x19,
        Bw373600 = 0x11,
        Bw467000 = 0x09,
    }

    /// GFSK modulation parameters.
    ///
    /// Defaults to 50 kbit/s, BT = 1.0, 25 kHz deviation and a 117.3 kHz
    /// receiver bandwidth.
    #[derive(Copy, Clone, Debug)]
    pub struct GfskModParams {
        /// Bit rate in bit/s.
        pub bitrate_bps: u32,
        pub pulse_shape: GfskPulseShape,
        pub bandwidth: GfskBandwidth,
        /// Frequency deviation in Hz.
        pub fdev_hz: u32,
    }

    impl Default for GfskModParams {
        fn default() -> Self {
            Self {
                bitrate_bps: 50_000,
                pulse_shape: GfskPulseShape::Bt1,
                bandwidth: GfskBandwidth::Bw117300,
                fdev_hz: 25_000,
            }
        }
    }

    impl GfskModParams {
        pub fn set_bitrate_bps(mut self, bitrate_bps: u32) -> Self {
            self.bitrate_bps = bitrate_bps;
            self
        }

        pub fn set_pulse_shape(mut self, pulse_shape: GfskPulseShape) -> Self {
            self.pulse_shape = pulse_shape;
            self
        }

        pub fn set_bandwidth(mut self, bandwidth: GfskBandwidth) -> Self {
            self.bandwidth = bandwidth;
            self
        }

        pub fn set_fdev_hz(mut self, fdev_hz: u32) -> Self {
            self.fdev_hz = fdev_hz;
            self
        }
    }

    impl From<GfskModParams> for ModParams {
        fn from(val: GfskModParams) -> Self {
            let [b0, b1, b2, b3] = val.bitrate_bps.to_be_bytes();
            let [f0, f1, f2, f3] = val.fdev_hz.to_be_bytes();
            ModParams::new(&[
                b0,
                b1,
                b2,
                b3,
                val.pulse_shape as u8,
                val.bandwidth as u8,
                f0,
                f1,
                f2,
                f3,
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ldro_follows_symbol_time() {
        assert!(!ldro_required(LoRaSpreadFactor::SF7, LoRaBandWidth::BW125));
        assert!(!ldro_required(LoRaSpreadFactor::SF10, LoRaBandWidth::BW125));
        assert!(ldro_required(LoRaSpreadFactor::SF11, LoRaBandWidth::BW125));
        assert!(ldro_required(LoRaSpreadFactor::SF12, LoRaBandWidth::BW250));
        assert!(!ldro_required(LoRaSpreadFactor::SF12, LoRaBandWidth::BW500));
    }

    #[test]
    fn mod_params_layout() {
        let params: ModParams = LoraModParams::default()
            .set_spread_factor(LoRaSpreadFactor::SF12)
            .set_coding_rate(LoraCodingRate::CR4_8)
            .with_computed_ldro()
            .into();
        assert_eq!(params.as_bytes(), [0x0C, 0x04, 0x04, 0x01]);
    }

    #[test]
    fn gfsk_mod_params_layout() {
        let params: ModParams = GfskModParams::default()
            .set_bitrate_bps(38_400)
            .set_pulse_shape(GfskPulseShape::Bt05)
            .into();
        assert_eq!(
            params.as_bytes(),
            [0x00, 0x00, 0x96, 0x00, 0x09, 0x0B, 0x00, 0x00, 0x61, 0xA8]
        );
    }
}
