//! The main loop context: radio, application and the flags shared with the
//! interrupt handlers.

use embedded_hal_async::delay::DelayNs;

use crate::config::{AppConfig, ConfigError, Role};
use crate::cycle::{AppMode, CycleState};
use crate::dispatch::IrqDispatcher;
use crate::latch::IrqLatch;
use crate::transport::RadioTransport;
use crate::uart::UartRx;

/// Everything the main loop owns.
///
/// The interrupt handlers only touch the [`IrqLatch`] and the [`UartRx`], both
/// borrowed here; the payloads and counters live in the application and are only
/// touched from [`Session::poll`].
pub struct Session<'a, R, D> {
    radio: R,
    dispatcher: IrqDispatcher,
    mode: AppMode<D>,
    latch: &'a IrqLatch,
    uart: Option<&'a UartRx>,
}

impl<'a, R, D> Session<'a, R, D>
where
    R: RadioTransport,
    D: DelayNs,
{
    /// Validates `config` and builds the application for its role.
    ///
    /// The radio must already be initialized, see [`AppConfig::radio_config`].
    /// The UART bridge needs a line buffer and is rejected with
    /// [`ConfigError::UartRequired`]; build it with [`Session::with_uart`].
    pub fn new(
        radio: R,
        delay: D,
        config: AppConfig,
        latch: &'a IrqLatch,
    ) -> Result<Self, ConfigError> {
        if config.role == Role::UartBridge {
            return Err(ConfigError::UartRequired);
        }
        Self::build(radio, delay, config, latch, None)
    }

    /// Like [`Session::new`], with the UART line buffer read by the bridge.
    ///
    /// The buffer hands out messages of at most `config.payload_len` bytes.
    pub fn with_uart(
        radio: R,
        delay: D,
        config: AppConfig,
        latch: &'a IrqLatch,
        uart: &'a UartRx,
    ) -> Result<Self, ConfigError> {
        Self::build(radio, delay, config, latch, Some(uart))
    }

    fn build(
        radio: R,
        delay: D,
        config: AppConfig,
        latch: &'a IrqLatch,
        uart: Option<&'a UartRx>,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        log::info!(
            "Session: {:?} over {:?}, payload {} bytes, rx timeout {:?}",
            config.role,
            config.packet_type,
            config.payload_len,
            config.rx_timeout()
        );
        if let Some(uart) = uart {
            uart.set_message_len(config.payload_len as usize);
        }
        Ok(Self {
            radio,
            dispatcher: IrqDispatcher::new(config.irq_mask),
            mode: AppMode::new(&config, delay),
            latch,
            uart,
        })
    }

    pub fn mode(&self) -> &AppMode<D> {
        &self.mode
    }

    pub fn state(&self) -> CycleState {
        self.mode.state()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Issues the first command of the application.
    pub async fn start(&mut self) {
        self.mode.start(&mut self.radio).await;
    }

    /// Runs one main loop iteration.
    ///
    /// Dispatches pending interrupts, re-issues a failed arm command if no
    /// interrupt is pending, then lets the bridge pick up a UART message.
    pub async fn poll(&mut self) {
        self.dispatcher
            .process(self.latch, &mut self.radio, &mut self.mode)
            .await;

        if self.mode.state() == CycleState::AwaitingRetry && !self.latch.is_set() {
            log::warn!("Retrying to arm the radio");
            self.mode.retry(&mut self.radio).await;
        }

        if let (AppMode::UartBridge(bridge), Some(uart)) = (&mut self.mode, self.uart) {
            bridge.poll(&mut self.radio, uart).await;
        }
    }

    /// Starts the application and polls forever.
    pub async fn run(&mut self) -> ! {
        self.start().await;
        loop {
            self.poll().await;
            embassy_futures::yield_now().await;
        }
    }
}
