//! Line command processor

use core::ops::ControlFlow;

use crate::config::{EchoConfig, ErrorPolicy};
use crate::hal::{SerialPort, Timer, UartConfig};
use crate::log_globals::LOG_STREAM;
use crate::{log_debug, log_error, log_warn};

use super::{execute, parse_line, ConsoleError, LineBuffer};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console state: the pending line and the UART configuration in force
pub struct Console {
    line: LineBuffer,
    uart: UartConfig,
    config: EchoConfig,
}

impl Console {
    /// Create new console; the UART is assumed to run at the default rate
    pub const fn new(config: EchoConfig) -> Self {
        Self {
            line: LineBuffer::new(),
            uart: UartConfig::with_baud_rate(config.default_baud_rate),
            config,
        }
    }

    /// Processor configuration
    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    /// UART configuration currently programmed
    pub fn uart_config(&self) -> &UartConfig {
        &self.uart
    }

    /// Bytes buffered for the line in progress
    pub fn pending_line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Polling loop.
    ///
    /// `idle` runs whenever no byte is pending (drain logs, yield to the
    /// scheduler) and stops the loop by returning `Break`. A dispatch error
    /// stops the loop only under [`ErrorPolicy::Halt`], the same for both
    /// dialects.
    pub fn run<P, T, F>(&mut self, port: &mut P, timer: &mut T, mut idle: F) -> Result<(), ConsoleError>
    where
        P: SerialPort + ?Sized,
        T: Timer + ?Sized,
        F: FnMut(&mut P, &mut T) -> ControlFlow<()>,
    {
        loop {
            let Some(byte) = port.poll_byte() else {
                if idle(port, timer).is_break() {
                    return Ok(());
                }
                continue;
            };

            if let Some(Err(e)) = self.process_byte(byte, port, timer) {
                if self.config.error_policy == ErrorPolicy::Halt {
                    log_error!(LOG_STREAM, timer.now_us(), "halting: {}", e);
                    return Err(e);
                }
            }
        }
    }

    /// Poll the port once and process the byte, if any.
    pub fn poll<P, T>(&mut self, port: &mut P, timer: &mut T) -> Option<Result<(), ConsoleError>>
    where
        P: SerialPort + ?Sized,
        T: Timer + ?Sized,
    {
        let byte = port.poll_byte()?;
        self.process_byte(byte, port, timer)
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) if a line was dispatched, None if more input needed.
    /// An overflowing byte is dropped with a warning on the port; it never
    /// surfaces as an error here.
    pub fn process_byte<P, T>(&mut self, byte: u8, port: &mut P, timer: &mut T) -> Option<Result<(), ConsoleError>>
    where
        P: SerialPort + ?Sized,
        T: Timer + ?Sized,
    {
        match byte {
            b'\r' | b'\n' => {
                let line = core::mem::take(&mut self.line);
                Some(self.dispatch(line.as_bytes(), port, timer))
            }

            _ => {
                if self.line.push(byte).is_err() {
                    port.write_bytes(ConsoleError::BufferOverflow.message().as_bytes());
                    log_debug!(LOG_STREAM, timer.now_us(), "dropped 0x{:02x}: line full", byte);
                }
                None
            }
        }
    }

    /// Interpret one completed line.
    ///
    /// Errors are reported to the host with their wire message before being
    /// returned; the caller decides whether to keep polling.
    pub fn dispatch<P, T>(&mut self, line: &[u8], port: &mut P, timer: &mut T) -> Result<(), ConsoleError>
    where
        P: SerialPort + ?Sized,
        T: Timer + ?Sized,
    {
        let result = parse_line(line, self.config.dialect, self.config.parsing)
            .and_then(|cmd| execute(&cmd, &self.config, &mut self.uart, port, timer));

        if let Err(e) = result {
            if e == ConsoleError::MalformedBaudCommand {
                log_warn!(LOG_STREAM, timer.now_us(), "{}", e);
            }
            port.write_bytes(e.message().as_bytes());
        }

        result
    }
}
