//! Memory-mapped 16-bit sampling timer.

use core::ptr;

use super::TimerRegisters;
use crate::registers::{
    REG_TCCR1A,
    REG_TCNT1H,
    REG_TCNT1L,
    REG_TIMSK1,
    Register,
    TimerControlB,
};

// Overflow interrupt enable in `TIMSK1`.
const TOIE1: u8 = 1 << 0;

/// Data-space addresses of the timer registers used for sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer1RegisterMap {
    /// Control register `TCCR1A`.
    pub tccr1a: usize,
    /// Control register `TCCR1B`.
    pub tccr1b: usize,
    /// Counter low byte `TCNT1L`.
    pub tcnt1l: usize,
    /// Counter high byte `TCNT1H`.
    pub tcnt1h: usize,
    /// Interrupt mask `TIMSK1`.
    pub timsk1: usize,
}

impl Timer1RegisterMap {
    /// Register layout of the ATmega328P.
    pub const ATMEGA328P: Self = Self {
        tccr1a: REG_TCCR1A as usize,
        tccr1b: TimerControlB::ADDRESS as usize,
        tcnt1l: REG_TCNT1L as usize,
        tcnt1h: REG_TCNT1H as usize,
        timsk1: REG_TIMSK1 as usize,
    };
}

/// [`TimerRegisters`] backed by volatile accesses to the timer registers.
#[derive(Debug)]
pub struct MmioTimer1 {
    map: Timer1RegisterMap,
}

impl MmioTimer1 {
    /// Creates a handle for the registers at `map`.
    ///
    /// # Safety
    ///
    /// Every address in `map` must be valid for volatile byte reads and
    /// writes for the lifetime of the handle, and no other code may drive the
    /// same timer while the handle exists.
    pub const unsafe fn new(map: Timer1RegisterMap) -> Self {
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

impl TimerRegisters for MmioTimer1 {
    fn set_control_a(&mut self, value: u8) {
        self.write(self.map.tccr1a, value);
    }

    fn set_control_b(&mut self, control: TimerControlB) {
        self.write(self.map.tccr1b, u8::from(control));
    }

    // The high byte goes through the shared TEMP register and must be
    // written first.
    fn set_counter(&mut self, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.write(self.map.tcnt1h, high);
        self.write(self.map.tcnt1l, low);
    }

    fn enable_overflow_interrupt(&mut self) {
        let mask = self.read(self.map.timsk1);
        self.write(self.map.timsk1, mask | TOIE1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::SamplingTimer;

    fn backed_by(regs: &mut [u8; 5]) -> MmioTimer1 {
        let base = regs.as_mut_ptr() as usize;
        let map = Timer1RegisterMap {
            tccr1a: base,
            tccr1b: base + 1,
            tcnt1l: base + 2,
            tcnt1h: base + 3,
            timsk1: base + 4,
        };
        unsafe { MmioTimer1::new(map) }
    }

    #[test]
    fn start_programs_normal_mode_at_the_reload_value() {
        let mut regs = [0xFFu8, 0x00, 0x00, 0x00, 0b0000_0110];
        let mut timer = backed_by(&mut regs);

        SamplingTimer::for_frequency(16_000_000, 200)
            .unwrap()
            .start(&mut timer);

        assert_eq!(regs[0], 0x00);
        assert_eq!(regs[1], 0b0000_0010);
        assert_eq!(u16::from_le_bytes([regs[2], regs[3]]), 55_536);
        assert_eq!(regs[4], 0b0000_0111);
    }

    #[test]
    fn rearm_rewrites_both_counter_bytes() {
        let mut regs = [0u8; 5];
        let mut timer = backed_by(&mut regs);

        SamplingTimer::for_frequency(16_000_000, 1)
            .unwrap()
            .rearm(&mut timer);

        assert_eq!(u16::from_le_bytes([regs[2], regs[3]]), 3_036);
        assert_eq!(regs[1], 0x00);
    }

    #[test]
    fn atmega328p_map_matches_the_datasheet() {
        let map = Timer1RegisterMap::ATMEGA328P;
        assert_eq!(
            (map.tccr1a, map.tccr1b, map.tcnt1l, map.tcnt1h, map.timsk1),
            (0x80, 0x81, 0x84, 0x85, 0x6F)
        );
    }
}
