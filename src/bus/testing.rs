//! Scripted two-wire peripheral and stepping clock for unit tests.

use core::cell::Cell;

use heapless::Vec;

use super::TwiRegisters;
use crate::clock::Millis;
use crate::params::TwiPrescaler;
use crate::registers::Control;

/// Fake peripheral completing each job with the next scripted status.
///
/// Once the script is exhausted jobs never complete, which stalls the
/// engine until its timeout fires.
pub(crate) struct FakeTwi {
    control: Control,
    status: u8,
    script: Vec<u8, 64>,
    next: usize,
    rx: Vec<u8, 64>,
    rx_next: usize,
    busy_polls: u8,
    pending: u8,
    stall_stop: bool,
    controls: Vec<u8, 96>,
    pub(crate) sent: Vec<u8, 64>,
    pub(crate) bit_rate: Option<(u8, TwiPrescaler)>,
}

impl FakeTwi {
    pub(crate) fn new(script: &[u8]) -> Self {
        let mut fake = Self {
            control: Control::new(),
            status: 0xF8,
            script: Vec::new(),
            next: 0,
            rx: Vec::new(),
            rx_next: 0,
            busy_polls: 0,
            pending: 0,
            stall_stop: false,
            controls: Vec::new(),
            sent: Vec::new(),
            bit_rate: None,
        };
        fake.script_more(script);
        fake
    }

    pub(crate) fn with_rx(mut self, rx: &[u8]) -> Self {
        self.rx.extend_from_slice(rx).unwrap();
        self
    }

    pub(crate) fn with_busy_polls(mut self, polls: u8) -> Self {
        self.busy_polls = polls;
        self
    }

    pub(crate) fn stalling_stop(mut self) -> Self {
        self.stall_stop = true;
        self
    }

    pub(crate) fn script_more(&mut self, statuses: &[u8]) {
        self.script.extend_from_slice(statuses).unwrap();
    }

    pub(crate) fn control_log(&self) -> &[u8] {
        &self.controls
    }

    pub(crate) fn last_control(&self) -> u8 {
        self.controls.last().copied().unwrap_or(0)
    }
}

impl TwiRegisters for FakeTwi {
    fn control(&mut self) -> Control {
        if self.pending > 0 {
            self.pending -= 1;
            if self.pending == 0 {
                self.control.set_twint(true);
            }
        }
        self.control
    }

    fn set_control(&mut self, control: Control) {
        self.controls.push(u8::from(control)).unwrap();
        self.control = control;
        if !control.twint() {
            return;
        }
        self.control.set_twint(false);

        if control.twsto() {
            if !self.stall_stop {
                self.control.set_twsto(false);
            }
            self.status = 0xF8;
            return;
        }

        if let Some(&status) = self.script.get(self.next) {
            self.next += 1;
            self.status = status;
            self.pending = self.busy_polls;
            if self.pending == 0 {
                self.control.set_twint(true);
            }
        }
    }

    fn status(&mut self) -> u8 {
        self.status
    }

    fn data(&mut self) -> u8 {
        let byte = self.rx.get(self.rx_next).copied().unwrap_or(0xFF);
        self.rx_next += 1;
        byte
    }

    fn set_data(&mut self, value: u8) {
        self.sent.push(value).unwrap();
    }

    fn set_bit_rate(&mut self, bit_rate: u8, prescaler: TwiPrescaler) {
        self.bit_rate = Some((bit_rate, prescaler));
    }
}

/// Clock advancing by a fixed step on every reading.
pub(crate) struct StepClock {
    now: Cell<u32>,
    step: u32,
}

impl StepClock {
    pub(crate) fn new(step: u32) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }

    /// Time consumed by all readings so far.
    pub(crate) fn elapsed(&self) -> u32 {
        self.now.get()
    }
}

impl Millis for StepClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}
