//! An asynchronous, `no_std` driver for the Semtech LR11xx family of transceivers.
//!
//! This crate provides a low-level async driver for the LR1110, LR1120 and LR1121 chips.
//! It is built upon `embedded-hal-async` traits and covers the part of the command set
//! needed to run LoRa and GFSK packet links: configuration, interrupt handling, the TX/RX
//! state commands and access to the data buffer.
//!
//! The main entry point is the `LR11xx` struct, which takes an async SPI peripheral
//! and the necessary GPIO pins to communicate with the chip.
//!
//! # Usage
//!
//! See the `lr11xx-apps-async` crate for the interrupt-driven applications built on
//! top of this driver.

#![cfg_attr(not(test), no_std)]

pub mod conf;
pub mod op;

mod lr;
pub use lr::*;
