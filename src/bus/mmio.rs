//! Memory-mapped two-wire peripheral.

use core::ptr;

use super::TwiRegisters;
use crate::params::TwiPrescaler;
use crate::registers::{Control, REG_TWBR, REG_TWDR, Register, StatusRegister};

/// Data-space addresses of the two-wire interface registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwiRegisterMap {
    /// Bit-rate register `TWBR`.
    pub twbr: usize,
    /// Status register `TWSR`.
    pub twsr: usize,
    /// Data register `TWDR`.
    pub twdr: usize,
    /// Control register `TWCR`.
    pub twcr: usize,
}

impl TwiRegisterMap {
    /// Register layout of the ATmega328P.
    pub const ATMEGA328P: Self = Self {
        twbr: REG_TWBR as usize,
        twsr: StatusRegister::ADDRESS as usize,
        twdr: REG_TWDR as usize,
        twcr: Control::ADDRESS as usize,
    };
}

/// [`TwiRegisters`] backed by volatile accesses to the peripheral registers.
#[derive(Debug)]
pub struct MmioTwi {
    map: TwiRegisterMap,
}

impl MmioTwi {
    /// Creates a handle for the registers at `map`.
    ///
    /// # Safety
    ///
    /// Every address in `map` must be valid for volatile byte reads and
    /// writes for the lifetime of the handle, and no other code may drive the
    /// same peripheral while the handle exists.
    pub const unsafe fn new(map: TwiRegisterMap) -> Self {
        Self { map }
    }

    fn read(&self, address: usize) -> u8 {
        // SAFETY: validity of the address is a precondition of `new`.
        unsafe { ptr::read_volatile(address as *const u8) }
    }

    fn write(&mut self, address: usize, value: u8) {
        // SAFETY: validity of the address is a precondition of `new`.
        unsafe { ptr::write_volatile(address as *mut u8, value) }
    }
}

impl TwiRegisters for MmioTwi {
    fn control(&mut self) -> Control {
        Control::from(self.read(self.map.twcr))
    }

    fn set_control(&mut self, control: Control) {
        self.write(self.map.twcr, u8::from(control));
    }

    fn status(&mut self) -> u8 {
        StatusRegister::from(self.read(self.map.twsr)).masked()
    }

    fn data(&mut self) -> u8 {
        self.read(self.map.twdr)
    }

    fn set_data(&mut self, value: u8) {
        self.write(self.map.twdr, value);
    }

    fn set_bit_rate(&mut self, bit_rate: u8, prescaler: TwiPrescaler) {
        let status = StatusRegister::from(self.read(self.map.twsr)).with_prescaler(prescaler);
        self.write(self.map.twsr, u8::from(status));
        self.write(self.map.twbr, bit_rate);
    }
}
