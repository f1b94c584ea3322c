//! Fixed-capacity line accumulator for serial input.

use crate::config::LINE_CAPACITY;

/// Byte that replaces the `\n` delimiter once a line is complete.
pub const TERMINATOR: u8 = 0;

/// Line input buffer.
///
/// Only `data[..len]` is meaningful. Pushing into a full buffer fails
/// without touching the stored bytes.
#[derive(Clone)]
pub struct LineBuffer {
    data: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            data: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Append one byte. Returns `false` (and drops the byte) when full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len < LINE_CAPACITY {
            self.data[self.len] = byte;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Forget the current contents.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == LINE_CAPACITY
    }

    /// Raw stored bytes, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The command token: stored bytes up to the first terminator.
    ///
    /// A line that overflowed never received its terminator, so the
    /// whole buffer is returned.
    pub fn token(&self) -> &[u8] {
        let bytes = self.as_bytes();
        match bytes.iter().position(|&b| b == TERMINATOR) {
            Some(end) => &bytes[..end],
            None => bytes,
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
