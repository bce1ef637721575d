//! Host doubles for the serial port and timer.
//!
//! Port and timer share one event log so tests can check ordering
//! (e.g. "ACK" written before the delay, delay before configure).

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use uart_baud_echo::hal::{HalError, HalResult, SerialPort, Timer, UartConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(u8),
    Delay(u32),
    Configure(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub struct MockPort {
    input: VecDeque<u8>,
    events: EventLog,
    fail_configure: bool,
}

impl MockPort {
    pub fn new(events: &EventLog) -> Self {
        Self {
            input: VecDeque::new(),
            events: Rc::clone(events),
            fail_configure: false,
        }
    }

    pub fn with_input(events: &EventLog, input: &[u8]) -> Self {
        let mut port = Self::new(events);
        port.input.extend(input);
        port
    }

    pub fn failing(mut self) -> Self {
        self.fail_configure = true;
        self
    }
}

impl SerialPort for MockPort {
    fn poll_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) {
        self.events.borrow_mut().push(Event::Write(byte));
    }

    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        if self.fail_configure {
            return Err(HalError::VendorError(-1));
        }
        self.events.borrow_mut().push(Event::Configure(config.baud_rate));
        Ok(())
    }
}

pub struct MockTimer {
    events: EventLog,
    now_us: i64,
}

impl MockTimer {
    pub fn new(events: &EventLog) -> Self {
        Self { events: Rc::clone(events), now_us: 0 }
    }
}

impl Timer for MockTimer {
    fn delay_ms(&mut self, ms: u32) {
        self.now_us += i64::from(ms) * 1000;
        self.events.borrow_mut().push(Event::Delay(ms));
    }

    fn now_us(&self) -> i64 {
        self.now_us
    }
}

pub fn new_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Every byte written so far, in order.
pub fn output(events: &EventLog) -> Vec<u8> {
    events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(b) => Some(*b),
            _ => None,
        })
        .collect()
}

/// Baud rates passed to `configure`, in order.
pub fn configured(events: &EventLog) -> Vec<u32> {
    events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Configure(rate) => Some(*rate),
            _ => None,
        })
        .collect()
}

/// Delays requested, in order.
pub fn delays(events: &EventLog) -> Vec<u32> {
    events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Delay(ms) => Some(*ms),
            _ => None,
        })
        .collect()
}

/// Events with consecutive writes folded into strings, for ordering checks.
pub fn timeline(events: &EventLog) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut text = Vec::new();

    for e in events.borrow().iter() {
        match e {
            Event::Write(b) => text.push(*b),
            other => {
                if !text.is_empty() {
                    out.push(String::from_utf8_lossy(&text).into_owned());
                    text.clear();
                }
                out.push(match other {
                    Event::Delay(ms) => format!("delay {}", ms),
                    Event::Configure(rate) => format!("configure {}", rate),
                    Event::Write(_) => unreachable!(),
                });
            }
        }
    }
    if !text.is_empty() {
        out.push(String::from_utf8_lossy(&text).into_owned());
    }

    out
}
