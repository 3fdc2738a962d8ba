//! Register map definitions.
//!
//! Covers the MPU-6050 registers used by the accelerometer client and the
//! microcontroller registers driven by the bus engine (`TWCR`, `TWSR`) and
//! the sampling timer (`TCCR1B`).
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AccelRange, ClockSelect, ClockSource, TwiPrescaler};

/// Default 7-bit bus address of the MPU-6050 (`AD0` low).
pub const DEFAULT_ADDRESS: u8 = 0x68;
/// Alternate 7-bit bus address of the MPU-6050 (`AD0` high).
pub const ALTERNATE_ADDRESS: u8 = 0x69;

/// Register address of `ACCEL_CONFIG`.
pub const REG_ACCEL_CONFIG: u8 = 0x1C;
/// Register address of `ACCEL_XOUT_H`, the first byte of the big-endian
/// X, Y, Z block read in one burst.
pub const REG_ACCEL_XOUT_H: u8 = 0x3B;
/// Register address of `PWR_MGMT_1`.
pub const REG_PWR_MGMT_1: u8 = 0x6B;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x75;

/// Value reported by `WHO_AM_I`.
pub const EXPECTED_WHO_AM_I: u8 = 0x68;
/// Number of consecutive bytes spanning the X, Y, Z acceleration block.
pub const ACCEL_BLOCK_LEN: usize = 6;

/// Data-space address of `TWBR` on the ATmega328P.
pub const REG_TWBR: u8 = 0xB8;
/// Data-space address of `TWSR` on the ATmega328P.
pub const REG_TWSR: u8 = 0xB9;
/// Data-space address of `TWDR` on the ATmega328P.
pub const REG_TWDR: u8 = 0xBB;
/// Data-space address of `TWCR` on the ATmega328P.
pub const REG_TWCR: u8 = 0xBC;

/// Data-space address of `TCCR1A` on the ATmega328P.
pub const REG_TCCR1A: u8 = 0x80;
/// Data-space address of `TCCR1B` on the ATmega328P.
pub const REG_TCCR1B: u8 = 0x81;
/// Data-space address of `TCNT1L` on the ATmega328P.
pub const REG_TCNT1L: u8 = 0x84;
/// Data-space address of `TCNT1H` on the ATmega328P.
pub const REG_TCNT1H: u8 = 0x85;
/// Data-space address of `TIMSK1` on the ATmega328P.
pub const REG_TIMSK1: u8 = 0x6F;

/// Data-space address of `TCCR0A` on the ATmega328P.
pub const REG_TCCR0A: u8 = 0x44;
/// Data-space address of `TCCR0B` on the ATmega328P.
pub const REG_TCCR0B: u8 = 0x45;
/// Data-space address of `OCR0A` on the ATmega328P.
pub const REG_OCR0A: u8 = 0x47;
/// Data-space address of `TIMSK0` on the ATmega328P.
pub const REG_TIMSK0: u8 = 0x6E;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `PWR_MGMT_1` register (address `0x6B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerManagement1 {
    // Clock source selection (bits 2:0).
    pub clock_source: ClockSource,
    // Temperature sensor disable (bit 3).
    pub temp_disable: bool,
    #[skip]
    __: B1,
    // Cycle between sleep and single samples (bit 5).
    pub cycle: bool,
    // Sleep mode (bit 6), set after power-on.
    pub sleep: bool,
    // Resets all internal registers (bit 7).
    pub device_reset: bool,
}

impl From<u8> for PowerManagement1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerManagement1> for u8 {
    fn from(value: PowerManagement1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACCEL_CONFIG` register (address `0x1C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig {
    #[skip]
    __: B3,
    // Full-scale range (bits 4:3).
    pub range: AccelRange,
    // Z axis self-test (bit 5).
    pub z_self_test: bool,
    // Y axis self-test (bit 6).
    pub y_self_test: bool,
    // X axis self-test (bit 7).
    pub x_self_test: bool,
}

impl From<u8> for AccelConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<AccelConfig> for u8 {
    fn from(value: AccelConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the two-wire control register `TWCR`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    // Interrupt enable (bit 0).
    pub twie: bool,
    #[skip]
    __: B1,
    // Peripheral enable (bit 2).
    pub twen: bool,
    // Write collision flag (bit 3).
    pub twwc: bool,
    // STOP condition request, cleared by hardware (bit 4).
    pub twsto: bool,
    // START condition request (bit 5).
    pub twsta: bool,
    // Acknowledge enable (bit 6).
    pub twea: bool,
    // Job complete flag, cleared by writing one (bit 7).
    pub twint: bool,
}

impl Control {
    /// Idle, enabled, acknowledging: the state restored by lock-up recovery.
    pub fn enabled() -> Self {
        Self::new().with_twen(true).with_twea(true)
    }

    /// Request a START (or repeated START) condition.
    pub fn start() -> Self {
        Self::new().with_twint(true).with_twsta(true).with_twen(true)
    }

    /// Clock the data register out (or in, without acknowledging).
    pub fn transfer() -> Self {
        Self::new().with_twint(true).with_twen(true)
    }

    /// Clock a byte in and acknowledge it.
    pub fn transfer_ack() -> Self {
        Self::transfer().with_twea(true)
    }

    /// Request a STOP condition.
    pub fn stop() -> Self {
        Self::new().with_twint(true).with_twen(true).with_twsto(true)
    }
}

impl From<u8> for Control {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Control> for u8 {
    fn from(value: Control) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the two-wire status register `TWSR`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister {
    // Bit-rate prescaler (bits 1:0).
    pub prescaler: TwiPrescaler,
    #[skip]
    __: B1,
    // Status code, upper five bits (bits 7:3).
    pub code: B5,
}

impl StatusRegister {
    /// Status value as documented in the datasheet tables (`TWSR & 0xF8`).
    pub fn masked(self) -> u8 {
        self.code() << 3
    }
}

impl From<u8> for StatusRegister {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<StatusRegister> for u8 {
    fn from(value: StatusRegister) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the timer control register `TCCR1B`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerControlB {
    // Clock select (bits 2:0).
    pub clock_select: ClockSelect,
    // Waveform generation mode bit 2 (bit 3).
    pub wgm12: bool,
    // Waveform generation mode bit 3 (bit 4).
    pub wgm13: bool,
    #[skip]
    __: B1,
    // Input capture edge select (bit 6).
    pub input_capture_edge: bool,
    // Input capture noise canceler (bit 7).
    pub input_capture_noise_cancel: bool,
}

impl From<u8> for TimerControlB {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<TimerControlB> for u8 {
    fn from(value: TimerControlB) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for PowerManagement1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_PWR_MGMT_1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x40);
}

impl Register for AccelConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_ACCEL_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Control {
    type Raw = u8;
    const ADDRESS: u8 = REG_TWCR;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for StatusRegister {
    type Raw = u8;
    const ADDRESS: u8 = REG_TWSR;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0xF8);
}

impl Register for TimerControlB {
    type Raw = u8;
    const ADDRESS: u8 = REG_TCCR1B;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_commands_match_datasheet_bit_patterns() {
        assert_eq!(u8::from(Control::start()), 0b1010_0100);
        assert_eq!(u8::from(Control::transfer()), 0b1000_0100);
        assert_eq!(u8::from(Control::transfer_ack()), 0b1100_0100);
        assert_eq!(u8::from(Control::stop()), 0b1001_0100);
        assert_eq!(u8::from(Control::enabled()), 0b0100_0100);
    }

    #[test]
    fn status_register_masks_prescaler_bits() {
        let status = StatusRegister::from(0x51);
        assert_eq!(status.masked(), 0x50);
        assert_eq!(status.prescaler(), TwiPrescaler::Div4);

        assert_eq!(StatusRegister::from(0xF8).masked(), 0xF8);
    }

    #[test]
    fn power_management_reset_value_is_sleeping() {
        let power = PowerManagement1::from(0x40);
        assert!(power.sleep());
        assert!(!power.device_reset());
        assert_eq!(power.clock_source(), ClockSource::Internal8MHz);
        assert_eq!(u8::from(PowerManagement1::new()), 0x00);
    }

    #[test]
    fn accel_config_places_range_in_bits_4_3() {
        let config = AccelConfig::new().with_range(AccelRange::G8);
        assert_eq!(u8::from(config), 0b0001_0000);
        assert_eq!(AccelConfig::from(0b0001_1000).range(), AccelRange::G16);
    }

    #[test]
    fn reset_values_decode_to_idle_registers() {
        fn reset<R: Register<Raw = u8>>() -> u8 {
            R::RESET_VALUE.unwrap()
        }

        assert!(PowerManagement1::from(reset::<PowerManagement1>()).sleep());
        assert_eq!(AccelConfig::from(reset::<AccelConfig>()).range(), AccelRange::G2);
        assert_eq!(Control::from(reset::<Control>()), Control::new());
        assert_eq!(StatusRegister::from(reset::<StatusRegister>()).masked(), 0xF8);
        assert_eq!(
            TimerControlB::from(reset::<TimerControlB>()).clock_select(),
            ClockSelect::Stopped
        );
    }

    #[test]
    fn register_metadata_points_at_datasheet_addresses() {
        assert_eq!(PowerManagement1::ADDRESS, 0x6B);
        assert_eq!(AccelConfig::ADDRESS, 0x1C);
        assert_eq!(Control::ADDRESS, 0xBC);
        assert_eq!(StatusRegister::ADDRESS, 0xB9);
        assert_eq!(TimerControlB::ADDRESS, 0x81);
        assert_eq!(Control::ACCESS, RegisterAccess::ReadWrite);
    }

    #[test]
    fn timer_control_b_encodes_clock_select() {
        let control = TimerControlB::new().with_clock_select(ClockSelect::Div64);
        assert_eq!(u8::from(control), 0b0000_0011);
        let control = TimerControlB::new().with_clock_select(ClockSelect::Div256);
        assert_eq!(u8::from(control), 0b0000_0100);
    }
}
