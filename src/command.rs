//! Host command channel and alert output.

use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::log::{debug, info};

/// Longest accepted command line, terminator excluded.
pub const LINE_CAPACITY: usize = 16;

/// Command received from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Raise the alert output.
    Alert,
    /// Clear the alert output.
    NoAlert,
}

impl Command {
    /// Parses a line without its `\n` terminator.
    ///
    /// Matching is exact apart from one trailing `\r`.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        match line {
            b"ALERT" => Some(Self::Alert),
            b"NO_ALERT" => Some(Self::NoAlert),
            _ => None,
        }
    }
}

/// Assembles newline-terminated commands from received bytes.
///
/// A line longer than `N` bytes is discarded up to and including its
/// terminator.
#[derive(Debug, Default)]
pub struct LineReader<const N: usize = LINE_CAPACITY> {
    line: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineReader<N> {
    /// Creates an empty reader.
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Feeds one byte, returning the command completed by it, if any.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        if byte != b'\n' {
            if self.line.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let command = if self.overflowed {
            debug!("dropping over-long command line");
            None
        } else {
            Command::parse(&self.line)
        };
        self.line.clear();
        self.overflowed = false;
        command
    }

    /// Bytes of the line assembled so far.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}

/// Digital output driven by [`Command`]s.
pub struct AlertOutput<P> {
    pin: P,
    active: bool,
}

impl<P: OutputPin> AlertOutput<P> {
    /// Wraps `pin`, assumed low.
    pub fn new(pin: P) -> Self {
        Self { pin, active: false }
    }

    /// Drives the pin high for [`Command::Alert`], low for [`Command::NoAlert`].
    pub fn apply(&mut self, command: Command) -> Result<(), P::Error> {
        match command {
            Command::Alert => self.pin.set_high()?,
            Command::NoAlert => self.pin.set_low()?,
        }
        self.active = command == Command::Alert;
        info!("alert output {}", self.active);
        Ok(())
    }

    /// Whether the last applied command raised the alert.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consumes the output and returns the pin.
    pub fn release(self) -> P {
        self.pin
    }
}
