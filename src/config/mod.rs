//! Module: config
//!
//! Purpose: Configuration for the line command processor.
//!
//! Architecture:
//! - Protocol constants (line length, default baud, ACK delay) are fixed
//! - Behaviour switches live in [`EchoConfig`], const-constructible
//! - Cargo features choose the build-time defaults used by the firmware binary
//!
//! Safety: Plain data, no interior mutability.

use crate::logging::LogLevel;

/// Maximum line length, excluding the terminator.
pub const MAX_LINE_LEN: usize = 32;

/// Baud rate applied at startup.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Time given to the host to switch its own baud rate after "ACK".
pub const ACK_DELAY_MS: u32 = 1000;

/// Literal that introduces a baud change in the prefixed dialect.
pub const BAUD_PREFIX: &str = "change baudrate to ";

/// How a completed line is recognized as a baud-rate change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// The whole line is a positive integer. Acknowledged with "ACK" and
    /// applied after [`ACK_DELAY_MS`].
    Numeric,
    /// The line starts with [`BAUD_PREFIX`] followed by a positive integer.
    /// Applied immediately; a bad number after the prefix is an error.
    Prefixed,
}

/// Number parsing applied to a candidate baud rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberParsing {
    /// Leading digits only, anything after them is ignored (`"42abc"` is 42).
    Lenient,
    /// The trimmed text must consist of digits only.
    Strict,
}

/// What the polling loop does when a dispatched line fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Report and keep polling.
    Continue,
    /// Report and leave the polling loop.
    Halt,
}

/// Processor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoConfig {
    pub dialect: Dialect,
    pub parsing: NumberParsing,
    pub error_policy: ErrorPolicy,
    /// Baud rate the UART is brought up with.
    pub default_baud_rate: u32,
    /// Delay between "ACK" and reconfiguration (numeric dialect).
    pub ack_delay_ms: u32,
    /// Minimum level accepted by the diagnostic log.
    pub log_level: LogLevel,
}

impl EchoConfig {
    /// Defaults matching the numeric-dialect firmware.
    pub const fn new() -> Self {
        Self {
            dialect: Dialect::Numeric,
            parsing: NumberParsing::Lenient,
            error_policy: ErrorPolicy::Continue,
            default_baud_rate: DEFAULT_BAUD_RATE,
            ack_delay_ms: ACK_DELAY_MS,
            log_level: LogLevel::Info,
        }
    }

    /// Defaults selected by Cargo features.
    pub const fn from_features() -> Self {
        let mut cfg = Self::new();

        if cfg!(feature = "prefixed-dialect") {
            cfg.dialect = Dialect::Prefixed;
        }
        if cfg!(feature = "strict-numbers") {
            cfg.parsing = NumberParsing::Strict;
        }
        if cfg!(feature = "halt-on-error") {
            cfg.error_policy = ErrorPolicy::Halt;
        }

        cfg
    }

    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub const fn with_parsing(mut self, parsing: NumberParsing) -> Self {
        self.parsing = parsing;
        self
    }

    pub const fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub const fn with_ack_delay_ms(mut self, ms: u32) -> Self {
        self.ack_delay_ms = ms;
        self
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self::new()
    }
}
