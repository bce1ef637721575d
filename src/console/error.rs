//! Console error types

/// Console error with code and wire message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Line exceeds the buffer; the byte was dropped
    BufferOverflow,
    /// E02: Prefix matched but the rate is not a positive integer
    MalformedBaudCommand,
    /// E03: The UART rejected the new configuration
    HardwareConfigureFailure,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::BufferOverflow => "E01",
            Self::MalformedBaudCommand => "E02",
            Self::HardwareConfigureFailure => "E03",
        }
    }

    /// Exact text sent to the host on the data UART
    pub fn message(&self) -> &'static str {
        match self {
            Self::BufferOverflow => "ERROR: msg too long. Character dropped\r\n",
            Self::MalformedBaudCommand => "ERROR: received incorrect baudrate\r\n",
            Self::HardwareConfigureFailure => "ERROR: can not set baudrate\r\n",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message().trim_end())
    }
}
