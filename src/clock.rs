//! Millisecond time base used to bound bus waits.
//!
//! An 8-bit timer in CTC mode fires a compare-match interrupt every
//! millisecond; its handler calls [`TickCounter::tick`].

use core::cell::Cell;
use core::ptr;

use critical_section::Mutex;

use crate::registers::{REG_OCR0A, REG_TCCR0A, REG_TCCR0B, REG_TIMSK0};

/// Prescaler applied to the tick timer when deriving a 1 ms compare period.
pub const TICK_PRESCALER: u32 = 64;

// `TCCR0A.WGM01`: clear timer on compare match.
const CTC_MODE: u8 = 0b0000_0010;
// `TCCR0B.CS0`: clock / 64, matching `TICK_PRESCALER`.
const CLOCK_DIV64: u8 = 0b0000_0011;
// `TIMSK0.OCIE0A`.
const OCIE0A: u8 = 1 << 1;

/// Source of elapsed milliseconds.
///
/// The value is free-running and wraps; consumers compare instants with
/// `wrapping_sub`.
pub trait Millis {
    /// Milliseconds elapsed since an arbitrary epoch.
    fn now_ms(&self) -> u32;
}

impl<T: Millis + ?Sized> Millis for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Millisecond counter advanced from a periodic 1 kHz interrupt.
///
/// Place it in a `static` and call [`TickCounter::tick`] from the compare-match
/// handler. Reads happen inside a critical section so a 32-bit value is never
/// observed half-updated on 8-bit targets.
///
/// # Interrupt latency
///
/// [`now_ms`](Millis::now_ms) runs inside `critical_section::with`, which on
/// single-core AVR masks every interrupt, the sampling overflow included, for
/// the few cycles of a 4-byte copy. A sampling interrupt arriving meanwhile is
/// delayed, not lost. Boards that must not delay other sources implement
/// [`Millis`] themselves, masking only the tick interrupt (`TIMSK0.OCIE0A`)
/// around the read.
pub struct TickCounter {
    millis: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Creates a counter starting at zero.
    pub const fn new() -> Self {
        Self {
            millis: Mutex::new(Cell::new(0)),
        }
    }

    /// Advances the counter by one millisecond. Interrupt context.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let millis = self.millis.borrow(cs);
            millis.set(millis.get().wrapping_add(1));
        });
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Millis for TickCounter {
    fn now_ms(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}

/// Register-level access to the 8-bit tick timer.
pub trait TickTimerRegisters {
    /// Writes control register A (`TCCR0A`).
    fn set_control_a(&mut self, value: u8);

    /// Writes control register B (`TCCR0B`).
    fn set_control_b(&mut self, value: u8);

    /// Writes the compare register (`OCR0A`).
    fn set_compare(&mut self, value: u8);

    /// Sets the compare-match interrupt enable, leaving the other mask bits
    /// untouched.
    fn enable_compare_interrupt(&mut self);
}

/// Starts the 1 kHz tick: CTC mode, [`TICK_PRESCALER`], compare-match
/// interrupt enabled. Returns the programmed compare value.
///
/// Returns `None` without touching the timer when `cpu_hz` cannot produce a
/// 1 ms period.
pub fn start_tick_timer<T>(timer: &mut T, cpu_hz: u32) -> Option<u8>
where
    T: TickTimerRegisters + ?Sized,
{
    let compare = millis_compare_value(cpu_hz)?;
    timer.set_control_b(0);
    timer.set_control_a(CTC_MODE);
    timer.set_compare(compare);
    timer.enable_compare_interrupt();
    timer.set_control_b(CLOCK_DIV64);
    Some(compare)
}

/// Data-space addresses of the tick timer registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer0RegisterMap {
    /// Control register `TCCR0A`.
    pub tccr0a: usize,
    /// Control register `TCCR0B`.
    pub tccr0b: usize,
    /// Compare register `OCR0A`.
    pub ocr0a: usize,
    /// Interrupt mask `TIMSK0`.
    pub timsk0: usize,
}

impl Timer0RegisterMap {
    /// Register layout of the ATmega328P.
    pub const ATMEGA328P: Self = Self {
        tccr0a: REG_TCCR0A as usize,
        tccr0b: REG_TCCR0B as usize,
        ocr0a: REG_OCR0A as usize,
        timsk0: REG_TIMSK0 as usize,
    };
}

/// [`TickTimerRegisters`] backed by volatile register accesses.
#[derive(Debug)]
pub struct MmioTimer0 {
    map: Timer0RegisterMap,
}

impl MmioTimer0 {
    /// Creates a handle for the registers at `map`.
    ///
    /// # Safety
    ///
    /// Every address in `map` must be valid for volatile byte reads and
    /// writes for the lifetime of the handle, and no other code may drive the
    /// same timer while the handle exists.
    pub const unsafe fn new(map: Timer0RegisterMap) -> Self {
        Self { map }
    }

    fn write(&mut self, address: usize, value: u8) {
        // SAFETY: validity of the address is a precondition of `new`.
        unsafe { ptr::write_volatile(address as *mut u8, value) }
    }
}

impl TickTimerRegisters for MmioTimer0 {
    fn set_control_a(&mut self, value: u8) {
        self.write(self.map.tccr0a, value);
    }

    fn set_control_b(&mut self, value: u8) {
        self.write(self.map.tccr0b, value);
    }

    fn set_compare(&mut self, value: u8) {
        self.write(self.map.ocr0a, value);
    }

    fn enable_compare_interrupt(&mut self) {
        // SAFETY: validity of the address is a precondition of `new`.
        let mask = unsafe { ptr::read_volatile(self.map.timsk0 as *const u8) };
        self.write(self.map.timsk0, mask | OCIE0A);
    }
}

/// Compare-match value giving a 1 ms period at [`TICK_PRESCALER`] in CTC mode.
///
/// Returns `None` when the CPU clock cannot produce a 1 ms period with an
/// 8-bit compare register.
pub const fn millis_compare_value(cpu_hz: u32) -> Option<u8> {
    let counts = cpu_hz / TICK_PRESCALER / 1_000;
    if counts == 0 || counts > 256 {
        return None;
    }
    Some((counts - 1) as u8)
}
