mod common;

use common::{Call, FakeDelay, FakeRadio};
use embassy_futures::block_on;
use lr11xx_apps_async::{AppConfig, AppMode, ConfigError, CycleState, IrqLatch, Role, Session, UartRx};
use lr11xx_async::op::{IrqMask, IrqMaskBit, RxTxTimeout};

#[test]
fn invalid_config_is_rejected() {
    let latch = IrqLatch::new();
    let config = AppConfig::default().set_payload_len(0);

    let session = Session::new(FakeRadio::new(), FakeDelay::default(), config, &latch);

    assert!(matches!(
        session,
        Err(ConfigError::PayloadTooShort { len: 0, min: 2 })
    ));
}

#[test]
fn receiver_session_runs_the_per_cycle() {
    let latch = IrqLatch::new();
    let config = AppConfig::default();
    let mut session =
        Session::new(FakeRadio::new(), FakeDelay::default(), config, &latch).unwrap();

    block_on(session.start());
    assert_eq!(session.state(), CycleState::Receiving);

    session
        .radio_mut()
        .raise(IrqMask::none() | IrqMaskBit::Timeout);
    block_on(session.poll());
    assert_eq!(session.radio().rx_arms().len(), 1);

    latch.fire();
    block_on(session.poll());
    assert_eq!(
        session.radio().rx_arms(),
        [config.rx_timeout(), config.rx_timeout()]
    );

    match session.mode() {
        AppMode::PerReceiver(receiver) => assert!(!receiver.counter().first_packet_seen()),
        _ => panic!("expected a PER receiver"),
    }
}

#[test]
fn failed_arm_is_retried_on_the_next_poll() {
    let latch = IrqLatch::new();
    let mut radio = FakeRadio::new();
    radio.failing_set_rx = 1;
    let mut session =
        Session::new(radio, FakeDelay::default(), AppConfig::default(), &latch).unwrap();

    block_on(session.start());
    assert_eq!(session.state(), CycleState::AwaitingRetry);

    block_on(session.poll());
    assert_eq!(session.state(), CycleState::Receiving);
    assert_eq!(session.radio().rx_arms().len(), 2);
}

#[test]
fn transmitter_session_sends_back_to_back() {
    let latch = IrqLatch::new();
    let config = AppConfig::default()
        .set_role(Role::PerTransmitter)
        .set_payload_len(3);
    let mut session = Session::new(FakeRadio::new(), FakeDelay::default(), config, &latch).unwrap();

    block_on(session.start());
    session
        .radio_mut()
        .raise(IrqMask::none() | IrqMaskBit::TxDone);
    latch.fire();
    block_on(session.poll());

    assert_eq!(
        session.radio().calls,
        [
            Call::WriteBuffer(vec![0, 1, 2]),
            Call::SetTx(RxTxTimeout::none()),
            Call::GetAndClearIrq,
            Call::WriteBuffer(vec![1, 1, 2]),
            Call::SetTx(RxTxTimeout::none()),
        ]
    );
    assert_eq!(session.state(), CycleState::Transmitting);
}

fn bridge_session<'a>(
    latch: &'a IrqLatch,
    uart: &'a UartRx,
    payload_len: u8,
) -> Session<'a, FakeRadio, FakeDelay> {
    let config = AppConfig::default()
        .set_role(Role::UartBridge)
        .set_payload_len(payload_len);
    let mut session =
        Session::with_uart(FakeRadio::new(), FakeDelay::default(), config, latch, uart).unwrap();
    block_on(session.start());
    session
}

fn type_line(uart: &UartRx, line: &[u8]) {
    for byte in line {
        uart.on_byte(*byte);
    }
}

/// Completes the TX then the RX of one bridge exchange.
fn finish_exchange(session: &mut Session<'_, FakeRadio, FakeDelay>, latch: &IrqLatch) {
    session
        .radio_mut()
        .raise(IrqMask::none() | IrqMaskBit::TxDone);
    latch.fire();
    block_on(session.poll());

    session.radio_mut().receive(b"ok");
    session
        .radio_mut()
        .raise(IrqMask::none() | IrqMaskBit::RxDone);
    latch.fire();
    block_on(session.poll());
}

#[test]
fn bridge_session_forwards_uart_lines() {
    let latch = IrqLatch::new();
    let uart: UartRx = UartRx::new();
    let mut session = bridge_session(&latch, &uart, 4);
    assert_eq!(session.state(), CycleState::Idle);

    type_line(&uart, b"hi\n");
    block_on(session.poll());

    assert_eq!(session.radio().written(), [b"hi\n\0".to_vec()]);
    assert_eq!(session.state(), CycleState::Transmitting);
}

#[test]
fn bridge_without_uart_is_rejected() {
    let latch = IrqLatch::new();
    let config = AppConfig::default().set_role(Role::UartBridge);

    let session = Session::new(FakeRadio::new(), FakeDelay::default(), config, &latch);

    assert!(matches!(session, Err(ConfigError::UartRequired)));
}

#[test]
fn line_longer_than_the_payload_is_sent_in_pieces() {
    let latch = IrqLatch::new();
    let uart: UartRx = UartRx::new();
    let mut session = bridge_session(&latch, &uart, 4);
    assert_eq!(uart.message_len(), 4);

    type_line(&uart, b"abcdefgh\n");
    block_on(session.poll());
    assert_eq!(session.radio().written(), [b"abcd".to_vec()]);
    assert!(uart.is_ready());

    // The next piece goes out in the poll that completes the reception.
    finish_exchange(&mut session, &latch);
    assert_eq!(session.radio().written(), [b"abcd".to_vec(), b"efgh".to_vec()]);
    assert_eq!(session.state(), CycleState::Transmitting);

    finish_exchange(&mut session, &latch);
    assert_eq!(
        session.radio().written(),
        [
            b"abcd".to_vec(),
            b"efgh".to_vec(),
            b"\n\0\0\0".to_vec()
        ]
    );
    assert!(!uart.is_ready());
    assert_eq!(uart.dropped(), 0);
}
