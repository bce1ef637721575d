//! Command handlers

use crate::config::{Dialect, EchoConfig};
use crate::hal::{SerialPort, Timer, UartConfig};
use crate::log_globals::LOG_STREAM;
use crate::{log_error, log_info};

use super::parser::Command;
use super::ConsoleError;

/// Acknowledgment sent before a numeric-dialect baud change
pub const ACK: &[u8] = b"ACK";

/// Execute a parsed command.
///
/// `uart` is the configuration currently programmed; it is replaced only
/// when the port accepts the new one.
pub fn execute<P, T>(
    cmd: &Command<'_>,
    config: &EchoConfig,
    uart: &mut UartConfig,
    port: &mut P,
    timer: &mut T,
) -> Result<(), ConsoleError>
where
    P: SerialPort + ?Sized,
    T: Timer + ?Sized,
{
    match *cmd {
        Command::Echo(text) => {
            port.write_bytes(text);
            Ok(())
        }
        Command::SetBaudRate(rate) => {
            if config.dialect == Dialect::Numeric {
                // Give the host time to switch its own rate
                port.write_bytes(ACK);
                timer.delay_ms(config.ack_delay_ms);
            }
            set_baud_rate(rate, uart, port, timer)
        }
    }
}

fn set_baud_rate<P, T>(rate: u32, uart: &mut UartConfig, port: &mut P, timer: &T) -> Result<(), ConsoleError>
where
    P: SerialPort + ?Sized,
    T: Timer + ?Sized,
{
    let next = UartConfig { baud_rate: rate, ..*uart };

    match port.configure(&next) {
        Ok(()) => {
            log_info!(LOG_STREAM, timer.now_us(), "baud {} -> {}", uart.baud_rate, rate);
            *uart = next;
            Ok(())
        }
        Err(e) => {
            log_error!(LOG_STREAM, timer.now_us(), "configure {} failed: {}", rate, e);
            Err(ConsoleError::HardwareConfigureFailure)
        }
    }
}
