mod common;

use common::{per_payload, Call, FakeDelay, FakeRadio};
use embassy_futures::block_on;
use lr11xx_apps_async::receive::{receive_into, ReceiveError};
use lr11xx_apps_async::{
    AppConfig, CycleState, IrqHandler, PerReceiver, PerStats, PerTransmitter, RadioEvent, Role,
};
use lr11xx_async::op::{PacketType, RxTxTimeout};

const LEN: usize = 16;

fn receiver() -> (PerReceiver, FakeRadio) {
    let config = AppConfig::default().set_role(Role::PerReceiver);
    let mut receiver = PerReceiver::new(&config);
    let mut radio = FakeRadio::new();
    block_on(receiver.start(&mut radio));
    radio.take_calls();
    (receiver, radio)
}

fn deliver(receiver: &mut PerReceiver, radio: &mut FakeRadio, counter: u8) {
    radio.receive(&per_payload(counter, LEN));
    block_on(receiver.handle(RadioEvent::RxDone, radio));
}

#[test]
fn receiver_arms_rx_with_time_on_air() {
    let config = AppConfig::default();
    let mut receiver = PerReceiver::new(&config);
    let mut radio = FakeRadio::new();

    block_on(receiver.start(&mut radio));

    assert_eq!(radio.calls, [Call::SetRx(RxTxTimeout::from_ms(3052))]);
    assert_eq!(receiver.state(), CycleState::Receiving);
}

#[test]
fn every_rx_outcome_re_arms_the_receiver() {
    let outcomes = [
        RadioEvent::RxDone,
        RadioEvent::Timeout,
        RadioEvent::CrcError,
        RadioEvent::FskLenError,
    ];

    for event in outcomes {
        let (mut receiver, mut radio) = receiver();
        radio.receive(&per_payload(7, LEN));

        block_on(receiver.handle(event, &mut radio));

        assert_eq!(radio.rx_arms(), [receiver.rx_timeout()], "after {event:?}");
        assert_eq!(receiver.state(), CycleState::Receiving);
    }
}

#[test]
fn gap_across_wraparound() {
    let (mut receiver, mut radio) = receiver();

    deliver(&mut receiver, &mut radio, 250);
    deliver(&mut receiver, &mut radio, 3);

    assert_eq!(receiver.counter().per_index(), 9);
    assert_eq!(receiver.counter().last(), 3);
    assert_eq!(receiver.stats().ok, 1);
}

#[test]
fn first_packet_only_sets_the_baseline() {
    let (mut receiver, mut radio) = receiver();

    deliver(&mut receiver, &mut radio, 200);

    assert!(receiver.counter().first_packet_seen());
    assert_eq!(receiver.counter().per_index(), 0);
    assert_eq!(receiver.stats(), &PerStats::default());

    deliver(&mut receiver, &mut radio, 201);
    assert_eq!(receiver.counter().per_index(), 1);
    assert_eq!(receiver.stats().ok, 1);
}

#[test]
fn failures_are_counted_after_the_first_packet() {
    let (mut receiver, mut radio) = receiver();

    block_on(receiver.handle(RadioEvent::Timeout, &mut radio));
    block_on(receiver.handle(RadioEvent::CrcError, &mut radio));
    assert_eq!(receiver.stats(), &PerStats::default());

    deliver(&mut receiver, &mut radio, 0);
    block_on(receiver.handle(RadioEvent::Timeout, &mut radio));
    block_on(receiver.handle(RadioEvent::CrcError, &mut radio));
    block_on(receiver.handle(RadioEvent::CrcError, &mut radio));
    block_on(receiver.handle(RadioEvent::FskLenError, &mut radio));

    assert_eq!(
        receiver.stats(),
        &PerStats {
            ok: 0,
            rx_timeout: 1,
            crc_error: 2,
            fsk_len_error: 1,
        }
    );
}

#[test]
fn foreign_payload_is_ignored() {
    let (mut receiver, mut radio) = receiver();
    let mut foreign = per_payload(1, LEN);
    foreign[5] = 0xAA;

    radio.receive(&foreign);
    block_on(receiver.handle(RadioEvent::RxDone, &mut radio));

    assert!(!receiver.counter().first_packet_seen());
    assert_eq!(radio.rx_arms().len(), 1);
}

#[test]
fn oversized_payload_leaves_the_buffer_untouched() {
    let mut radio = FakeRadio::new();
    radio.receive(&[0x55; 32]);
    let mut buffer = [0xEEu8; 16];

    let result = block_on(receive_into(&mut radio, PacketType::LoRa, &mut buffer));

    assert!(matches!(
        result,
        Err(ReceiveError::Oversized {
            size: 32,
            capacity: 16
        })
    ));
    assert_eq!(buffer, [0xEEu8; 16]);
    assert_eq!(radio.calls, [Call::GetRxBufferStatus]);
}

#[test]
fn oversized_payload_still_re_arms() {
    let (mut receiver, mut radio) = receiver();
    radio.receive(&per_payload(3, 64));

    block_on(receiver.handle(RadioEvent::RxDone, &mut radio));

    assert!(!receiver.counter().first_packet_seen());
    assert_eq!(radio.rx_arms().len(), 1);
}

#[test]
fn received_payload_is_read_then_packet_status_fetched() {
    let mut radio = FakeRadio::new();
    radio.receive(&[1, 2, 3]);
    let mut buffer = [0u8; 16];

    let size = block_on(receive_into(&mut radio, PacketType::LoRa, &mut buffer)).unwrap();

    assert_eq!(size, 3);
    assert_eq!(buffer[..4], [1u8, 2, 3, 0]);
    assert_eq!(
        radio.calls,
        [
            Call::GetRxBufferStatus,
            Call::ReadBuffer { offset: 0, len: 3 },
            Call::GetPacketStatus,
        ]
    );
}

#[test]
fn transmitter_bumps_the_counter_on_every_tx_done() {
    let config = AppConfig::default()
        .set_role(Role::PerTransmitter)
        .set_payload_len(4)
        .set_tx_to_tx_delay_ms(200);
    let mut transmitter = PerTransmitter::new(&config, FakeDelay::default());
    let mut radio = FakeRadio::new();

    block_on(transmitter.start(&mut radio));
    assert_eq!(transmitter.state(), CycleState::Transmitting);

    for _ in 0..256 {
        block_on(transmitter.handle(RadioEvent::TxDone, &mut radio));
    }

    let written = radio.written();
    assert_eq!(written.len(), 257);
    assert_eq!(written[0], [0u8, 1, 2, 3]);
    assert_eq!(written[1], [1u8, 1, 2, 3]);
    assert_eq!(written[255], [255u8, 1, 2, 3]);
    assert_eq!(written[256], [0u8, 1, 2, 3]);
    assert_eq!(
        radio.calls[..2],
        [
            Call::WriteBuffer(vec![0, 1, 2, 3]),
            Call::SetTx(RxTxTimeout::none())
        ]
    );
    assert_eq!(transmitter.payload().counter(), 0);
}

#[test]
fn gfsk_payload_is_read_then_gfsk_status_fetched() {
    let mut radio = FakeRadio::new();
    radio.receive(&[7, 8]);
    let mut buffer = [0u8; 16];

    let size = block_on(receive_into(&mut radio, PacketType::GFSK, &mut buffer)).unwrap();

    assert_eq!(size, 2);
    assert_eq!(buffer[..2], [7u8, 8]);
    assert_eq!(
        radio.calls,
        [
            Call::GetRxBufferStatus,
            Call::ReadBuffer { offset: 0, len: 2 },
            Call::GetGfskPacketStatus,
        ]
    );
}

#[test]
fn gfsk_receiver_counts_length_errors() {
    let config = AppConfig::default()
        .set_role(Role::PerReceiver)
        .set_packet_type(PacketType::GFSK);
    let mut receiver = PerReceiver::new(&config);
    let mut radio = FakeRadio::new();
    block_on(receiver.start(&mut radio));
    assert_eq!(radio.rx_arms(), [config.rx_timeout()]);

    deliver(&mut receiver, &mut radio, 10);
    deliver(&mut receiver, &mut radio, 11);
    block_on(receiver.handle(RadioEvent::FskLenError, &mut radio));

    assert_eq!(receiver.stats().ok, 1);
    assert_eq!(receiver.stats().fsk_len_error, 1);
    assert!(radio.calls.contains(&Call::GetGfskPacketStatus));
    assert!(!radio.calls.contains(&Call::GetPacketStatus));
    assert_eq!(radio.rx_arms().len(), 4);
    assert_eq!(receiver.state(), CycleState::Receiving);
}
