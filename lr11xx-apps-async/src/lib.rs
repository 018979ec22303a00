//! Interrupt driven LoRa and GFSK applications for the Semtech LR11xx
//! transceivers.
//!
//! The crate turns the radio's single IRQ line into a stream of [`RadioEvent`]s
//! and runs one of three applications on top of it:
//!
//! * a packet error rate (PER) transmitter, sending a counter-stamped payload
//!   back to back,
//! * a PER receiver, counting the packets it lost by looking at the gaps in the
//!   received counter,
//! * a UART bridge, sending every line received on a serial port and listening
//!   for an answer.
//!
//! # Usage
//!
//! ```ignore
//! static IRQ: IrqLatch = IrqLatch::new();
//!
//! // In the DIO rising edge interrupt handler:
//! IRQ.fire();
//!
//! // In the main task:
//! let config = AppConfig::default().set_role(Role::PerReceiver);
//! lr11xx.init(config.radio_config()).await?;
//! let mut session = Session::new(lr11xx, Delay, config, &IRQ)?;
//! session.run().await;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod bridge;
pub mod config;
pub mod cycle;
pub mod dispatch;
pub mod event;
pub mod latch;
pub mod per;
pub mod receive;
pub mod session;
pub mod transport;
pub mod uart;

pub use bridge::UartBridge;
pub use config::{AppConfig, ConfigError, Role};
pub use cycle::{AppMode, CycleState};
pub use dispatch::{IrqDispatcher, IrqHandler};
pub use event::RadioEvent;
pub use latch::IrqLatch;
pub use per::{PerReceiver, PerStats, PerTransmitter, Reception, RollingCounter};
pub use session::Session;
pub use transport::RadioTransport;
pub use uart::UartRx;
