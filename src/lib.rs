//! # UartBaudEcho
//!
//! UART line echo firmware with in-band baud-rate change.
//!
//! ## Architecture
//!
//! One polling loop feeds received bytes into [`Console`]:
//! - Bytes accumulate in a fixed 32-byte line buffer
//! - `\n` or `\r` completes the line
//! - A completed line is either a baud-rate change or echoed back verbatim
//!
//! The UART and the delay primitive sit behind [`hal::SerialPort`] and
//! [`hal::Timer`], so everything except the chip glue runs on the host.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod hal;
pub mod logging;
pub mod log_globals;
pub mod uart_logger;

pub use config::{Dialect, EchoConfig, ErrorPolicy, NumberParsing};
pub use console::{Command, Console, ConsoleError};
pub use hal::{HalError, SerialPort, Timer, UartConfig};
pub use log_globals::LOG_STREAM;
pub use logging::{LogLevel, LogStream};
