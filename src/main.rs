//! UartBaudEcho - Main entry point
//!
//! 1. Bring up the diagnostic log channel
//! 2. Install the data UART at the default rate (8N1, no flow control)
//! 3. Run the line command processor until the error policy halts it
//!
//! Built for the host, the same loop runs over stdin/stdout so the protocol
//! can be exercised without hardware.

use core::ops::ControlFlow;

use uart_baud_echo::console::VERSION;
use uart_baud_echo::{log_info, Console, EchoConfig, LOG_STREAM};

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use uart_baud_echo::hal::esp::{EspSerial, EspTimer};
    use uart_baud_echo::hal::{Timer, UartConfig};
    use uart_baud_echo::log_error;
    use uart_baud_echo::uart_logger::{drain_to_uart, init_uart_logger, UartLoggerConfig};

    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    let config = EchoConfig::from_features();
    LOG_STREAM.set_level(config.log_level);

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let mut log_uart = init_uart_logger(peripherals.uart1, pins.gpio6, &UartLoggerConfig::default())?;

    let mut timer = EspTimer;
    let uart_config = UartConfig::with_baud_rate(config.default_baud_rate);

    // UART0 on the USB-serial bridge pins. The IDF console must be off
    // (sdkconfig.defaults) or its output lands on the echo line.
    #[cfg(feature = "esp32p4")]
    let (tx, rx) = (pins.gpio37, pins.gpio38);
    #[cfg(not(feature = "esp32p4"))]
    let (tx, rx) = (pins.gpio43, pins.gpio44);

    let mut port = match EspSerial::new(peripherals.uart0, tx, rx, &uart_config) {
        Ok(port) => port,
        Err(e) => {
            log_error!(LOG_STREAM, timer.now_us(), "UART device not ready: {}", e);
            drain_to_uart(&LOG_STREAM, &mut log_uart);
            return Err(e);
        }
    };

    log_info!(LOG_STREAM, timer.now_us(), "{} up at {} baud", VERSION, uart_config.baud_rate);

    let mut console = Console::new(config);
    let _ = console.run(&mut port, &mut timer, |_, _| {
        drain_to_uart(&LOG_STREAM, &mut log_uart);
        // Let the idle task feed the watchdog
        unsafe {
            esp_idf_svc::sys::vTaskDelay(1);
        }
        ControlFlow::Continue(())
    });

    // Halted by policy: flush the reason and park
    drain_to_uart(&LOG_STREAM, &mut log_uart);
    loop {
        unsafe {
            esp_idf_svc::sys::vTaskDelay(1000);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> std::process::ExitCode {
    use host::{HostPort, HostTimer};
    use uart_baud_echo::hal::Timer;
    use uart_baud_echo::uart_logger::drain_logs;

    let config = EchoConfig::from_features();
    LOG_STREAM.set_level(config.log_level);

    let mut port = HostPort::new();
    let mut timer = HostTimer::new();

    log_info!(LOG_STREAM, timer.now_us(), "{} up at {} baud", VERSION, config.default_baud_rate);

    let mut console = Console::new(config);
    let result = console.run(&mut port, &mut timer, |port, _| {
        drain_logs(&LOG_STREAM, host::write_stderr);
        if port.at_eof() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    port.flush();
    drain_logs(&LOG_STREAM, host::write_stderr);

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(_) => std::process::ExitCode::FAILURE,
    }
}

/// stdin/stdout stand-ins for the UART and timer.
#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{self, Bytes, Read, StdinLock, Stdout, Write};
    use std::time::{Duration, Instant};

    use uart_baud_echo::hal::{HalResult, SerialPort, Timer, UartConfig};

    pub struct HostPort {
        input: Bytes<StdinLock<'static>>,
        output: Stdout,
        eof: bool,
    }

    impl HostPort {
        pub fn new() -> Self {
            Self {
                input: io::stdin().lock().bytes(),
                output: io::stdout(),
                eof: false,
            }
        }

        pub fn at_eof(&self) -> bool {
            self.eof
        }

        pub fn flush(&mut self) {
            let _ = self.output.flush();
        }
    }

    impl SerialPort for HostPort {
        fn poll_byte(&mut self) -> Option<u8> {
            // Reading blocks, so pending output must go out first
            self.flush();
            match self.input.next() {
                Some(Ok(byte)) => Some(byte),
                _ => {
                    self.eof = true;
                    None
                }
            }
        }

        fn write_byte(&mut self, byte: u8) {
            let _ = self.output.write_all(&[byte]);
        }

        fn configure(&mut self, _config: &UartConfig) -> HalResult<()> {
            // A pipe has no line rate
            Ok(())
        }
    }

    pub struct HostTimer {
        start: Instant,
    }

    impl HostTimer {
        pub fn new() -> Self {
            Self { start: Instant::now() }
        }
    }

    impl Timer for HostTimer {
        fn delay_ms(&mut self, ms: u32) {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }

        fn now_us(&self) -> i64 {
            self.start.elapsed().as_micros() as i64
        }
    }

    pub fn write_stderr(line: &[u8]) {
        let _ = io::stderr().write_all(line);
    }
}
