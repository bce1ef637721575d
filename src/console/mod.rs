//! Line command processor for the data UART
//!
//! Polled from the main loop - no dedicated task.
//! Zero heap allocation - fixed 32-byte line buffer.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, ACK};
pub use console::{Console, VERSION};
pub use error::ConsoleError;
pub use line_buffer::LineBuffer;
pub use parser::{parse_line, parse_rate, Command};
