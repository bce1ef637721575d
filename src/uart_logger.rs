//! Log drain to a side channel.
//!
//! On ESP-IDF the log goes out on UART1 TX (GPIO6) so the data UART stays
//! clean for the echo protocol. The host build drains to stderr.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// UART configuration for logging. The TX pin (GPIO6 on the reference
/// board) is handed to [`init_uart_logger`] as a peripheral.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Size of one formatted log line.
pub const FORMAT_BUF_LEN: usize = 160;

/// Format log entry to bytes.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );

    writer.len()
}

/// Drain every pending entry of `stream` into `sink`, one formatted line per
/// call. A WARN line with the drop count follows if entries were lost.
///
/// Returns the number of entries written.
pub fn drain_logs<const N: usize>(stream: &LogStream<N>, mut sink: impl FnMut(&[u8])) -> usize {
    let mut format_buf = [0u8; FORMAT_BUF_LEN];
    let mut count = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut format_buf);
        sink(&format_buf[..len]);
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let mut writer = BufWriter::new(&mut format_buf);
        let _ = write!(writer, "[WARN] Dropped: {}\r\n", dropped);
        let len = writer.len();
        sink(&format_buf[..len]);
        stream.reset_dropped();
    }

    count
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Drain the stream to the logging UART.
#[cfg(target_os = "espidf")]
pub fn drain_to_uart<const N: usize>(stream: &LogStream<N>, uart: &mut UartTxDriver<'_>) -> usize {
    drain_logs(stream, |line| {
        let _ = uart.write(line);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_logger_config_default_rate() {
        let config = UartLoggerConfig::default();
        assert_eq!(config.baud_rate, 115200);
    }

    #[test]
    fn test_format_log_entry() {
        let mut entry = LogEntry::default();
        entry.timestamp_us = 1234567;
        entry.level = LogLevel::Info;
        entry.len = 11;
        entry.msg[..11].copy_from_slice(b"Hello world");

        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("1234567"));
        assert!(formatted.contains("INFO"));
        assert!(formatted.contains("Hello world"));
        assert!(formatted.ends_with("\r\n"));
    }

    #[test]
    fn test_format_truncated_message() {
        let mut entry = LogEntry::default();
        entry.timestamp_us = 999;
        entry.level = LogLevel::Error;
        entry.len = 5;
        entry.msg[..10].copy_from_slice(b"TEST12345X"); // Only first 5 used

        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains('X'));
    }

    #[test]
    fn test_drain_reports_dropped() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Info, b"a");
        stream.push(2, LogLevel::Info, b"b");
        stream.push(3, LogLevel::Info, b"c"); // dropped

        let mut lines = Vec::new();
        let count = drain_logs(&stream, |line| lines.push(String::from_utf8_lossy(line).into_owned()));

        assert_eq!(count, 2);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Dropped: 1"));
        assert_eq!(stream.dropped(), 0);
    }
}
