//! Hardware Abstraction Layer for UartBaudEcho.
//!
//! Thin I/O seams around the UART and the delay primitive.
//! Business logic stays in `console`, HAL is just I/O.

pub mod reg32;
pub mod uart;

#[cfg(target_os = "espidf")]
pub mod esp;

use core::fmt;

pub use uart::{DataBits, FlowControl, Parity, StopBits, UartConfig};

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Invalid parameter provided
    InvalidParameter,
    /// Operation not supported by this implementation
    NotSupported,
    /// Vendor-specific error code
    VendorError(i32),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::VendorError(code) => write!(f, "vendor error code: {}", code),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Byte-oriented serial port.
pub trait SerialPort {
    /// Non-blocking read of one byte. `None` if nothing is pending.
    fn poll_byte(&mut self) -> Option<u8>;

    /// Blocking write of one byte.
    fn write_byte(&mut self, byte: u8);

    /// Reconfigure baud rate and frame format.
    fn configure(&mut self, config: &UartConfig) -> HalResult<()>;

    /// Write every byte of `data`, in order.
    fn write_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }
}

/// Blocking delay plus a monotonic clock for log timestamps.
pub trait Timer {
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Microseconds since boot.
    fn now_us(&self) -> i64;
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    fn poll_byte(&mut self) -> Option<u8> {
        (**self).poll_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        (**self).configure(config)
    }

    fn write_bytes(&mut self, data: &[u8]) {
        (**self).write_bytes(data)
    }
}

impl<T: Timer + ?Sized> Timer for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }

    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}
