//! Line buffer filled by the UART receive interrupt.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use critical_section::Mutex;
use heapless::Vec;

use crate::config::MAX_PAYLOAD_LEN;

/// Bytes queued by the UART interrupt, cut into messages for the main loop.
///
/// The interrupt appends bytes with [`UartRx::on_byte`]. A message ends at the
/// first `\r` or `\n`, or after [`UartRx::message_len`] bytes, whichever comes
/// first; the ready flag is up while a complete message waits. The main loop
/// takes one message at a time with [`UartRx::take_message`], and the bytes
/// after it stay queued as the start of the next one. Bytes are only dropped
/// when all `N` bytes of the queue are in use.
pub struct UartRx<const N: usize = MAX_PAYLOAD_LEN> {
    buffer: Mutex<RefCell<Vec<u8, N>>>,
    message_len: AtomicUsize,
    ready: AtomicBool,
    dropped: AtomicUsize,
}

impl<const N: usize> UartRx<N> {
    /// Creates an empty queue whose messages are at most `N` bytes long.
    pub const fn new() -> Self {
        Self {
            buffer: Mutex::new(RefCell::new(Vec::new())),
            message_len: AtomicUsize::new(N),
            ready: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Sets the longest message, clamped to `1..=N`.
    pub fn set_message_len(&self, len: usize) {
        self.message_len.store(len.max(1).min(N), Ordering::Relaxed);
        critical_section::with(|cs| {
            let buffer = self.buffer.borrow_ref(cs);
            self.ready
                .store(self.pending_len(&buffer).is_some(), Ordering::Release);
        });
    }

    /// The longest message handed to the main loop.
    pub fn message_len(&self) -> usize {
        self.message_len.load(Ordering::Relaxed)
    }

    /// Length of the complete message at the front of `queued`, if any.
    fn pending_len(&self, queued: &[u8]) -> Option<usize> {
        let limit = self.message_len();
        let window = &queued[..queued.len().min(limit)];
        match window.iter().position(|byte| *byte == b'\r' || *byte == b'\n') {
            Some(end) => Some(end + 1),
            None if queued.len() >= limit => Some(limit),
            None => None,
        }
    }

    /// Appends a received byte. Call from the UART receive interrupt.
    pub fn on_byte(&self, byte: u8) {
        critical_section::with(|cs| {
            let mut buffer = self.buffer.borrow_ref_mut(cs);
            if buffer.push(byte).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            self.ready
                .store(self.pending_len(&buffer).is_some(), Ordering::Release);
        });
    }

    /// Returns whether a complete message waits to be taken.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Number of bytes dropped because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Moves the first complete message into `out` and returns its length.
    ///
    /// Returns `None` if no message is complete. At most `out.len()` bytes are
    /// taken; whatever is left stays queued.
    pub fn take_message(&self, out: &mut [u8]) -> Option<usize> {
        critical_section::with(|cs| {
            let mut buffer = self.buffer.borrow_ref_mut(cs);
            let len = self.pending_len(&buffer)?.min(out.len());
            out[..len].copy_from_slice(&buffer[..len]);

            let rest = buffer.len() - len;
            buffer.rotate_left(len);
            buffer.truncate(rest);
            self.ready
                .store(self.pending_len(&buffer).is_some(), Ordering::Release);
            Some(len)
        })
    }
}

impl<const N: usize> Default for UartRx<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_bytes<const N: usize>(uart: &UartRx<N>, bytes: &[u8]) {
        for byte in bytes {
            uart.on_byte(*byte);
        }
    }

    #[test]
    fn newline_completes_a_message() {
        let uart: UartRx<8> = UartRx::new();
        let mut out = [0u8; 8];

        type_bytes(&uart, b"hi");
        assert!(!uart.is_ready());
        assert_eq!(uart.take_message(&mut out), None);

        uart.on_byte(b'\n');
        assert!(uart.is_ready());
        assert_eq!(uart.take_message(&mut out), Some(3));
        assert_eq!(&out[..3], b"hi\n");
        assert!(!uart.is_ready());
    }

    #[test]
    fn bytes_after_a_message_start_the_next_one() {
        let uart: UartRx<8> = UartRx::new();
        let mut out = [0u8; 8];

        type_bytes(&uart, b"ab\rcd");
        assert_eq!(uart.take_message(&mut out), Some(3));
        assert_eq!(&out[..3], b"ab\r");
        assert!(!uart.is_ready());
        assert_eq!(uart.take_message(&mut out), None);

        type_bytes(&uart, b"e\r");
        assert_eq!(uart.take_message(&mut out), Some(4));
        assert_eq!(&out[..4], b"cde\r");
        assert_eq!(uart.dropped(), 0);
    }

    #[test]
    fn long_line_is_split_at_the_message_length() {
        let uart: UartRx = UartRx::new();
        uart.set_message_len(4);
        let mut out = [0u8; 4];

        type_bytes(&uart, b"abc");
        assert!(!uart.is_ready());
        type_bytes(&uart, b"defgh\n");

        assert_eq!(uart.take_message(&mut out), Some(4));
        assert_eq!(&out, b"abcd");
        assert!(uart.is_ready());
        assert_eq!(uart.take_message(&mut out), Some(4));
        assert_eq!(&out, b"efgh");
        assert_eq!(uart.take_message(&mut out), Some(1));
        assert_eq!(out[0], b'\n');
        assert!(!uart.is_ready());
    }

    #[test]
    fn short_output_leaves_the_rest_queued() {
        let uart: UartRx<8> = UartRx::new();
        let mut out = [0u8; 2];

        type_bytes(&uart, b"abc\n");
        assert_eq!(uart.take_message(&mut out), Some(2));
        assert_eq!(&out, b"ab");
        assert_eq!(uart.take_message(&mut out), Some(2));
        assert_eq!(&out, b"c\n");
    }

    #[test]
    fn full_queue_drops_bytes() {
        let uart: UartRx<4> = UartRx::new();
        let mut out = [0u8; 4];

        type_bytes(&uart, b"abcdef");
        assert_eq!(uart.dropped(), 2);
        assert_eq!(uart.take_message(&mut out), Some(4));
        assert_eq!(&out, b"abcd");
        assert!(!uart.is_ready());
    }

    #[test]
    fn message_len_is_clamped() {
        let uart: UartRx<8> = UartRx::new();
        uart.set_message_len(0);
        assert_eq!(uart.message_len(), 1);
        uart.set_message_len(100);
        assert_eq!(uart.message_len(), 8);
    }
}
