//! Device error and fault reporting structures.

/// A bitmask representing the error flags from the device.
#[derive(Copy, Clone)]
pub struct SystemErrors {
    inner: u16,
}

impl core::fmt::Debug for SystemErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SystemErrors")
            .field("lf_rc_calib_err", &self.lf_rc_calib_err())
            .field("hf_rc_calib_err", &self.hf_rc_calib_err())
            .field("adc_calib_err", &self.adc_calib_err())
            .field("pll_calib_err", &self.pll_calib_err())
            .field("img_calib_err", &self.img_calib_err())
            .field("hf_xosc_start_err", &self.hf_xosc_start_err())
            .field("lf_xosc_start_err", &self.lf_xosc_start_err())
            .field("pll_lock_err", &self.pll_lock_err())
            .finish()
    }
}

impl From<u16> for SystemErrors {
    fn from(val: u16) -> Self {
        Self { inner: val }
    }
}

impl SystemErrors {
    /// Returns `true` if any error flag is set.
    pub fn any(self) -> bool {
        self.inner != 0
    }

    /// Low frequency RC calibration error.
    pub fn lf_rc_calib_err(self) -> bool {
        (self.inner & 1 << 0) > 0
    }

    /// High frequency RC calibration error.
    pub fn hf_rc_calib_err(self) -> bool {
        (self.inner & 1 << 1) > 0
    }

    /// ADC calibration error.
    pub fn adc_calib_err(self) -> bool {
        (self.inner & 1 << 2) > 0
    }

    /// PLL calibration error.
    pub fn pll_calib_err(self) -> bool {
        (self.inner & 1 << 3) > 0
    }

    /// Image calibration error.
    pub fn img_calib_err(self) -> bool {
        (self.inner & 1 << 4) > 0
    }

    /// High frequency crystal start error.
    pub fn hf_xosc_start_err(self) -> bool {
        (self.inner & 1 << 5) > 0
    }

    /// Low frequency crystal start error.
    pub fn lf_xosc_start_err(self) -> bool {
        (self.inner & 1 << 6) > 0
    }

    /// PLL lock error.
    pub fn pll_lock_err(self) -> bool {
        (self.inner & 1 << 7) > 0
    }
}
