//! Register-mapped soft-core UART ("reg32").
//!
//! Four 32-bit registers, addressed by word offset from the block base:
//!
//! ```text
//! 0  CONTROL   [31:16] clock divider  [13:10] data bits  [9] stop  [8] parity  [2:0] enable
//! 1  STATUS    [31] RX data ready
//! 2  TX        [7:0] byte to send
//! 3  RX        [7:0] received byte
//! ```
//!
//! The divider is `clock_hz / baud_rate` and must fit in 16 bits.

use core::ptr::{read_volatile, write_volatile};

use super::{FlowControl, HalError, HalResult, Parity, SerialPort, StopBits, UartConfig};

/// Input clock of the reference design.
pub const UART_CLK_HZ: u32 = 50_000_000;

pub const CONTROL_REG: usize = 0x0;
pub const STATUS_REG: usize = 0x1;
pub const TX_REG: usize = 0x2;
pub const RX_REG: usize = 0x3;

const ENABLE: u32 = 0x7;
const ENABLE_MASK: u32 = 0x0000_0007;

const PARITY_BIT_OFFSET: u32 = 8;
const STOP_BIT_OFFSET: u32 = 9;

const DATA_BITS_OFFSET: u32 = 10;
const DATA_BITS_MASK: u32 = 0x0000_3C00;

const CLK_DIV_OFFSET: u32 = 16;
const CLK_DIV_MASK: u32 = 0xFFFF_0000;

const STATUS_RX_READY: u32 = 0x8000_0000;

/// Word-addressed access to a 32-bit register block.
pub trait RegisterBus {
    fn read(&mut self, offset: usize) -> u32;
    fn write(&mut self, offset: usize, value: u32);
}

/// Memory-mapped register block.
pub struct MmioBus {
    base: *mut u32,
}

impl MmioBus {
    /// # Safety
    ///
    /// `base` must point at a reg32 register block that stays mapped for the
    /// lifetime of the bus, and nothing else may access it concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base: base as *mut u32 }
    }
}

impl RegisterBus for MmioBus {
    #[inline(always)]
    fn read(&mut self, offset: usize) -> u32 {
        // SAFETY: base validity is the contract of `MmioBus::new`
        unsafe { read_volatile(self.base.add(offset)) }
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: base validity is the contract of `MmioBus::new`
        unsafe { write_volatile(self.base.add(offset), value) }
    }
}

/// Divider field for `baud_rate`, or `InvalidParameter` if it does not fit.
pub fn clock_divider(clock_hz: u32, baud_rate: u32) -> HalResult<u32> {
    if baud_rate == 0 {
        return Err(HalError::InvalidParameter);
    }

    let divider = clock_hz / baud_rate;
    if divider == 0 || divider > (CLK_DIV_MASK >> CLK_DIV_OFFSET) {
        return Err(HalError::InvalidParameter);
    }

    Ok(divider)
}

/// Full control word for `config`, UART enabled.
pub fn control_word(clock_hz: u32, config: &UartConfig) -> HalResult<u32> {
    let parity = match config.parity {
        Parity::None => 0,
        Parity::Even => 1,
        Parity::Odd => return Err(HalError::NotSupported),
    };

    if config.flow_control != FlowControl::None {
        return Err(HalError::NotSupported);
    }

    let stop = match config.stop_bits {
        StopBits::One => 0,
        StopBits::Two => 1,
    };

    let divider = clock_divider(clock_hz, config.baud_rate)?;

    Ok((parity << PARITY_BIT_OFFSET)
        | (stop << STOP_BIT_OFFSET)
        | (divider << CLK_DIV_OFFSET)
        | (ENABLE & ENABLE_MASK)
        | ((config.data_bits.count() << DATA_BITS_OFFSET) & DATA_BITS_MASK))
}

/// Polled driver for the reg32 UART.
pub struct Reg32Uart<B: RegisterBus> {
    bus: B,
    clock_hz: u32,
}

impl<B: RegisterBus> Reg32Uart<B> {
    /// Wrap a register block clocked at [`UART_CLK_HZ`].
    pub fn new(bus: B) -> Self {
        Self::with_clock(bus, UART_CLK_HZ)
    }

    pub fn with_clock(bus: B, clock_hz: u32) -> Self {
        Self { bus, clock_hz }
    }

    /// Program 115200 8N1 and enable the UART.
    pub fn init(&mut self) -> HalResult<()> {
        let word = control_word(self.clock_hz, &UartConfig::default())?;
        self.bus.write(CONTROL_REG, word);
        Ok(())
    }

    /// Change only the divider field, leaving the frame format as is.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> HalResult<()> {
        let divider = clock_divider(self.clock_hz, baud_rate)?;

        let mut control = self.bus.read(CONTROL_REG);
        control &= !CLK_DIV_MASK;
        control |= divider << CLK_DIV_OFFSET;
        self.bus.write(CONTROL_REG, control);
        Ok(())
    }

    /// Current control register value.
    pub fn control(&mut self) -> u32 {
        self.bus.read(CONTROL_REG)
    }

    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> SerialPort for Reg32Uart<B> {
    fn poll_byte(&mut self) -> Option<u8> {
        if self.bus.read(STATUS_REG) & STATUS_RX_READY != 0 {
            Some(self.bus.read(RX_REG) as u8)
        } else {
            None
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.bus.write(TX_REG, u32::from(byte));
    }

    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        let word = control_word(self.clock_hz, config)?;
        let current = self.bus.read(CONTROL_REG);

        // Same frame format: only the divider needs to move
        if current & !CLK_DIV_MASK == word & !CLK_DIV_MASK {
            return self.set_baud_rate(config.baud_rate);
        }

        self.bus.write(CONTROL_REG, word);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::DataBits;

    #[test]
    fn test_divider_for_default_rate() {
        assert_eq!(clock_divider(UART_CLK_HZ, 115_200), Ok(434));
    }

    #[test]
    fn test_divider_rejects_out_of_range() {
        assert_eq!(clock_divider(UART_CLK_HZ, 0), Err(HalError::InvalidParameter));
        // Divider would be 0
        assert_eq!(clock_divider(UART_CLK_HZ, 60_000_000), Err(HalError::InvalidParameter));
        // Divider would exceed 16 bits
        assert_eq!(clock_divider(UART_CLK_HZ, 700), Err(HalError::InvalidParameter));
    }

    #[test]
    fn test_control_word_8n1() {
        let word = control_word(UART_CLK_HZ, &UartConfig::default()).unwrap();
        assert_eq!(word, (434 << 16) | (8 << 10) | 0x7);
    }

    #[test]
    fn test_control_word_unsupported() {
        let mut cfg = UartConfig::default();
        cfg.parity = Parity::Odd;
        assert_eq!(control_word(UART_CLK_HZ, &cfg), Err(HalError::NotSupported));

        let mut cfg = UartConfig::default();
        cfg.flow_control = FlowControl::RtsCts;
        assert_eq!(control_word(UART_CLK_HZ, &cfg), Err(HalError::NotSupported));
    }

    #[test]
    fn test_mmio_bus_word_offsets() {
        let mut regs = [0u32; 4];
        regs[STATUS_REG] = STATUS_RX_READY;
        regs[RX_REG] = u32::from(b'z');

        // SAFETY: regs outlives the driver and is not touched while it lives
        let bus = unsafe { MmioBus::new(regs.as_mut_ptr() as usize) };
        let mut uart = Reg32Uart::new(bus);
        uart.init().unwrap();
        uart.write_byte(b'k');
        assert_eq!(uart.poll_byte(), Some(b'z'));
        drop(uart);

        assert_eq!(regs[TX_REG], u32::from(b'k'));
        assert_eq!(regs[CONTROL_REG] >> 16, 434);
    }

    #[test]
    fn test_control_word_frame_bits() {
        let mut cfg = UartConfig::default();
        cfg.parity = Parity::Even;
        cfg.stop_bits = StopBits::Two;
        cfg.data_bits = DataBits::Seven;

        let word = control_word(UART_CLK_HZ, &cfg).unwrap();
        assert_eq!(word & (1 << 8), 1 << 8);
        assert_eq!(word & (1 << 9), 1 << 9);
        assert_eq!((word & DATA_BITS_MASK) >> DATA_BITS_OFFSET, 7);
    }
}
