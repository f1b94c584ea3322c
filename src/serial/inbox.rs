//! Handoff between the serial RX path and the main loop.
//!
//! The RX side runs at interrupt priority and only ever pushes one byte
//! and, on `\n`, raises the command-ready flag. The main loop checks the
//! flag, copies the line out, then resets the buffer and lowers the flag.
//!
//! Protocol:
//! 1. RX finishes its buffer mutation, then stores `ready = true` (Release).
//! 2. Main loop loads `ready` (Acquire), copies, clears, stores `false`.
//!
//! While `ready` is up the buffer is sealed: RX bytes are dropped and
//! counted, so the pending line cannot change under the reader.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::line_buffer::{LineBuffer, TERMINATOR};

/// Line delimiter on the wire.
pub const DELIMITER: u8 = b'\n';

pub struct SerialInbox<M: RawMutex> {
    line: Mutex<M, RefCell<LineBuffer>>,
    ready: AtomicBool,
    dropped: AtomicUsize,
}

impl<M: RawMutex> SerialInbox<M> {
    pub fn new() -> Self {
        Self {
            line: Mutex::new(RefCell::new(LineBuffer::new())),
            ready: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Feed one received byte. Interrupt-safe, bounded time.
    pub fn on_byte(&self, byte: u8) {
        if self.ready.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let stored_byte = if byte == DELIMITER { TERMINATOR } else { byte };
        let stored = self.line.lock(|line| line.borrow_mut().push(stored_byte));
        if !stored {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }

        if byte == DELIMITER {
            self.ready.store(true, Ordering::Release);
        }
    }

    /// Feed a received chunk (one USB packet, one UART burst).
    pub fn on_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            self.on_byte(b);
        }
    }

    /// Whether a complete line is waiting.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Take the pending line, if any, and re-open the buffer.
    pub fn take_line(&self) -> Option<LineBuffer> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }

        let line = self.line.lock(|line| {
            let mut line = line.borrow_mut();
            let copy = line.clone();
            line.clear();
            copy
        });
        self.ready.store(false, Ordering::Release);
        Some(line)
    }

    /// Drop whatever has been received so far and lower the ready flag.
    pub fn reset(&self) {
        self.line.lock(|line| line.borrow_mut().clear());
        self.ready.store(false, Ordering::Release);
    }

    /// Returns and clears the count of bytes dropped since the last call.
    pub fn take_dropped(&self) -> usize {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

impl<M: RawMutex> Default for SerialInbox<M> {
    fn default() -> Self {
        Self::new()
    }
}
