//! Line buffer for console input

use heapless::Vec;

use crate::config::MAX_LINE_LEN;

/// Line input buffer, at most [`MAX_LINE_LEN`] bytes
pub struct LineBuffer {
    buf: Vec<u8, MAX_LINE_LEN>,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append a byte.
    ///
    /// Returns `Err(byte)` when full; existing content is left untouched.
    pub fn push(&mut self, c: u8) -> Result<(), u8> {
        self.buf.push(c)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
