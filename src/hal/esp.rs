//! ESP-IDF UART and timer.
//!
//! The driver is installed 8N1 without flow control; only the baud rate is
//! changed at runtime.

use esp_idf_svc::hal::delay::{FreeRtos, NON_BLOCK};
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use super::{DataBits, FlowControl, HalError, HalResult, Parity, SerialPort, StopBits, Timer, UartConfig};

/// Data UART backed by the ESP-IDF driver.
pub struct EspSerial<'d> {
    driver: UartDriver<'d>,
}

impl<'d> EspSerial<'d> {
    /// Install the driver with `config`.
    pub fn new<U: uart::Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
        config: &UartConfig,
    ) -> Result<Self, EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(Hertz(config.baud_rate))
            .data_bits(uart::config::DataBits::DataBits8)
            .parity_none()
            .stop_bits(uart::config::StopBits::STOP1)
            .flow_control(uart::config::FlowControl::None);

        let driver = UartDriver::new(
            uart,
            tx_pin,
            rx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self { driver })
    }
}

impl SerialPort for EspSerial<'_> {
    fn poll_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.driver.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_byte(&mut self, byte: u8) {
        // Blocking: retry until the TX FIFO accepts the byte
        while let Ok(0) = self.driver.write(&[byte]) {}
    }

    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        let frame_ok = config.data_bits == DataBits::Eight
            && config.stop_bits == StopBits::One
            && config.parity == Parity::None
            && config.flow_control == FlowControl::None;
        if !frame_ok {
            return Err(HalError::NotSupported);
        }
        if config.baud_rate == 0 {
            return Err(HalError::InvalidParameter);
        }

        self.driver
            .change_baudrate(Hertz(config.baud_rate))
            .map(|_| ())
            .map_err(|e| HalError::VendorError(e.code()))
    }
}

/// FreeRTOS delay, `esp_timer` clock.
pub struct EspTimer;

impl Timer for EspTimer {
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }

    fn now_us(&self) -> i64 {
        // SAFETY: esp_timer_get_time is always safe to call after boot
        unsafe { esp_idf_svc::sys::esp_timer_get_time() }
    }
}
