//! Errors reported by the LR11xx driver.

use core::fmt::{self, Debug};

use crate::op::Stat1;

/// A failed SPI transaction.
pub enum SpiError<TSPIERR> {
    /// Sending a command or its data block failed.
    Write(TSPIERR),
    /// Clocking out a response failed.
    Transfer(TSPIERR),
}

impl<TSPIERR: Debug> Debug for SpiError<TSPIERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(err) => write!(f, "Write({err:?})"),
            Self::Transfer(err) => write!(f, "Transfer({err:?})"),
        }
    }
}

/// A failed access to one of the control lines of the chip.
pub enum PinError<TPINERR> {
    /// Driving NRESET.
    Reset(TPINERR),
    /// Reading or waiting on BUSY.
    Busy(TPINERR),
    /// Waiting on the IRQ line.
    Irq(TPINERR),
}

impl<TPINERR: Debug> Debug for PinError<TPINERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset(err) => write!(f, "Reset({err:?})"),
            Self::Busy(err) => write!(f, "Busy({err:?})"),
            Self::Irq(err) => write!(f, "Irq({err:?})"),
        }
    }
}

/// Any error returned by an [`LR11xx`](crate::LR11xx) command.
pub enum LrError<TSPIERR, TPINERR> {
    Spi(SpiError<TSPIERR>),
    Pin(PinError<TPINERR>),
    /// The chip rejected a read command; `Stat1` as clocked out with the response.
    CommandFailed(Stat1),
}

impl<TSPIERR: Debug, TPINERR: Debug> Debug for LrError<TSPIERR, TPINERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(err) => write!(f, "Spi({err:?})"),
            Self::Pin(err) => write!(f, "Pin({err:?})"),
            Self::CommandFailed(stat1) => write!(f, "CommandFailed({stat1:?})"),
        }
    }
}

impl<TSPIERR, TPINERR> From<SpiError<TSPIERR>> for LrError<TSPIERR, TPINERR> {
    fn from(err: SpiError<TSPIERR>) -> Self {
        Self::Spi(err)
    }
}

impl<TSPIERR, TPINERR> From<PinError<TPINERR>> for LrError<TSPIERR, TPINERR> {
    fn from(err: PinError<TPINERR>) -> Self {
        Self::Pin(err)
    }
}
