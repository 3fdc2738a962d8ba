//! Sampling timer programming.

use crate::params::ClockSelect;
use crate::registers::TimerControlB;

/// Lowest supported sampling frequency.
pub const MIN_SAMPLING_HZ: u16 = 1;
/// Highest supported sampling frequency.
pub const MAX_SAMPLING_HZ: u16 = 1_000;

// Counts in one overflow period of the 16-bit timer.
const TIMER_PERIOD: u32 = 1 << 16;

/// Register-level access to the 16-bit sampling timer.
///
/// Implementations perform plain register writes; the programming sequence
/// lives in [`SamplingTimer::start`].
pub trait TimerRegisters {
    /// Writes control register A (`TCCR1A`).
    fn set_control_a(&mut self, value: u8);

    /// Writes control register B (`TCCR1B`).
    fn set_control_b(&mut self, control: TimerControlB);

    /// Writes the 16-bit counter (`TCNT1`).
    fn set_counter(&mut self, value: u16);

    /// Sets the overflow interrupt enable (`TOIE1`), leaving the other mask
    /// bits untouched.
    fn enable_overflow_interrupt(&mut self);
}

/// Prescaler and reload value making the 16-bit timer overflow at the
/// sampling frequency.
///
/// The timer runs in normal mode: the overflow handler writes [`reload`]
/// back into the counter so the next overflow occurs one period later.
///
/// ```rust
/// use vibroguard::params::ClockSelect;
/// use vibroguard::sampling::SamplingTimer;
///
/// let timer = SamplingTimer::for_frequency(16_000_000, 200).unwrap();
/// assert_eq!(timer.clock_select(), ClockSelect::Div8);
/// assert_eq!(timer.reload(), 55_536);
/// ```
///
/// [`reload`]: SamplingTimer::reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingTimer {
    clock_select: ClockSelect,
    reload: u16,
    frequency_hz: u16,
}

impl SamplingTimer {
    /// Derives the timer settings for `hz`, clamped to
    /// `MIN_SAMPLING_HZ..=MAX_SAMPLING_HZ`.
    ///
    /// Returns `None` when no internal prescaler fits the period into the
    /// 16-bit counter.
    pub fn for_frequency(cpu_hz: u32, hz: u16) -> Option<Self> {
        let frequency_hz = hz.clamp(MIN_SAMPLING_HZ, MAX_SAMPLING_HZ);
        let mut clock_select = match frequency_hz {
            0..=10 => ClockSelect::Div256,
            11..=50 => ClockSelect::Div64,
            51..=500 => ClockSelect::Div8,
            _ => ClockSelect::Div1,
        };

        loop {
            let count = cpu_hz / clock_select.divisor()? / u32::from(frequency_hz);
            if count == 0 {
                return None;
            }
            if count <= TIMER_PERIOD {
                return Some(Self {
                    clock_select,
                    reload: (TIMER_PERIOD - count) as u16,
                    frequency_hz,
                });
            }
            clock_select = clock_select.coarser()?;
        }
    }

    /// Programs the timer in normal mode, loads the counter and enables the
    /// overflow interrupt. The clock is selected last, so counting starts
    /// from [`reload`](Self::reload).
    pub fn start<T: TimerRegisters + ?Sized>(&self, timer: &mut T) {
        timer.set_control_a(0);
        timer.set_control_b(TimerControlB::new());
        timer.set_counter(self.reload);
        timer.enable_overflow_interrupt();
        timer.set_control_b(self.control_b());
    }

    /// Reloads the counter. Call first thing in the overflow handler.
    pub fn rearm<T: TimerRegisters + ?Sized>(&self, timer: &mut T) {
        timer.set_counter(self.reload);
    }

    /// Selected prescaler.
    pub fn clock_select(&self) -> ClockSelect {
        self.clock_select
    }

    /// `TCCR1B` value starting the timer in normal mode.
    pub fn control_b(&self) -> TimerControlB {
        TimerControlB::new().with_clock_select(self.clock_select)
    }

    /// Counter value to write on start and after every overflow.
    pub fn reload(&self) -> u16 {
        self.reload
    }

    /// Effective (clamped) sampling frequency.
    pub fn frequency_hz(&self) -> u16 {
        self.frequency_hz
    }
}
