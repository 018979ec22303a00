//! The RX/TX cycle: radio states and the application selected at startup.

use embedded_hal_async::delay::DelayNs;
use lr11xx_async::op::RxTxTimeout;

use crate::bridge::UartBridge;
use crate::config::{AppConfig, Role};
use crate::dispatch::IrqHandler;
use crate::event::RadioEvent;
use crate::per::{PerReceiver, PerTransmitter};
use crate::transport::RadioTransport;

/// What the radio is doing, as far as the application knows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CycleState {
    /// Nothing armed.
    #[default]
    Idle,
    /// A transmission is running.
    Transmitting,
    /// The receiver is armed.
    Receiving,
    /// Arming the radio failed; the command is issued again on the next poll.
    AwaitingRetry,
}

/// Arms the receiver.
pub(crate) async fn arm_rx<R: RadioTransport>(radio: &mut R, timeout: RxTxTimeout) -> CycleState {
    match radio.set_rx(timeout).await {
        Ok(()) => CycleState::Receiving,
        Err(err) => {
            log::error!("Error setting rx mode: {err:?}");
            CycleState::AwaitingRetry
        }
    }
}

/// Loads `payload` and starts sending it.
pub(crate) async fn arm_tx<R: RadioTransport>(radio: &mut R, payload: &[u8]) -> CycleState {
    if let Err(err) = radio.write_buffer8(payload).await {
        log::error!("Error writing tx buffer: {err:?}");
        return CycleState::AwaitingRetry;
    }
    match radio.set_tx(RxTxTimeout::none()).await {
        Ok(()) => CycleState::Transmitting,
        Err(err) => {
            log::error!("Error setting tx mode: {err:?}");
            CycleState::AwaitingRetry
        }
    }
}

/// The application bound to the session, selected by [`Role`].
pub enum AppMode<D> {
    PerTransmitter(PerTransmitter<D>),
    PerReceiver(PerReceiver),
    UartBridge(UartBridge),
}

impl<D: DelayNs> AppMode<D> {
    /// Builds the application for `config.role`.
    ///
    /// `delay` paces the PER transmitter and is dropped by the other roles.
    pub fn new(config: &AppConfig, delay: D) -> Self {
        match config.role {
            Role::PerTransmitter => Self::PerTransmitter(PerTransmitter::new(config, delay)),
            Role::PerReceiver => Self::PerReceiver(PerReceiver::new(config)),
            Role::UartBridge => Self::UartBridge(UartBridge::new(config)),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::PerTransmitter(_) => Role::PerTransmitter,
            Self::PerReceiver(_) => Role::PerReceiver,
            Self::UartBridge(_) => Role::UartBridge,
        }
    }

    pub fn state(&self) -> CycleState {
        match self {
            Self::PerTransmitter(app) => app.state(),
            Self::PerReceiver(app) => app.state(),
            Self::UartBridge(app) => app.state(),
        }
    }

    /// Issues the first radio command of the application.
    pub async fn start<R: RadioTransport>(&mut self, radio: &mut R) {
        match self {
            Self::PerTransmitter(app) => app.start(radio).await,
            Self::PerReceiver(app) => app.start(radio).await,
            Self::UartBridge(app) => app.start(radio).await,
        }
    }

    /// Issues again the command that failed to arm the radio.
    pub async fn retry<R: RadioTransport>(&mut self, radio: &mut R) {
        match self {
            Self::PerTransmitter(app) => app.retry(radio).await,
            Self::PerReceiver(app) => app.retry(radio).await,
            Self::UartBridge(app) => app.retry(radio).await,
        }
    }
}

impl<R: RadioTransport, D: DelayNs> IrqHandler<R> for AppMode<D> {
    async fn handle(&mut self, event: RadioEvent, radio: &mut R) {
        match self {
            Self::PerTransmitter(app) => app.handle(event, radio).await,
            Self::PerReceiver(app) => app.handle(event, radio).await,
            Self::UartBridge(app) => app.handle(event, radio).await,
        }
    }
}
