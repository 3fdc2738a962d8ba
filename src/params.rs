//! Strongly typed parameter enumerations.
//!
//! These enums map directly to datasheet field encodings of the MPU-6050 and
//! of the microcontroller peripherals driven by this crate (two-wire
//! interface and the 16-bit sampling timer). They are used across
//! [`Config`](crate::config::Config) and the register bitfields.
//!
//! # Examples
//!
//! ```rust
//! use vibroguard::params::{AccelRange, ClockSelect};
//!
//! assert_eq!(AccelRange::G2.divisor(), 16_384.0);
//! assert_eq!(ClockSelect::Div64.divisor(), Some(64));
//! ```

use modular_bitfield::prelude::Specifier;

/// Accelerometer full-scale range (`ACCEL_CONFIG.AFS_SEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AccelRange {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl AccelRange {
    /// Returns the full-scale divisor (LSB per g) for this range.
    pub const fn divisor(self) -> f32 {
        match self {
            Self::G2 => 16_384.0,
            Self::G4 => 8_192.0,
            Self::G8 => 4_096.0,
            Self::G16 => 2_048.0,
        }
    }
}

/// Clock source selection (`PWR_MGMT_1.CLKSEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum ClockSource {
    /// Internal 8 MHz oscillator.
    Internal8MHz = 0b000,
    /// PLL referenced to the X axis gyroscope.
    PllGyroX = 0b001,
    /// PLL referenced to the Y axis gyroscope.
    PllGyroY = 0b010,
    /// PLL referenced to the Z axis gyroscope.
    PllGyroZ = 0b011,
    /// PLL referenced to an external 32.768 kHz clock.
    PllExternal32k = 0b100,
    /// PLL referenced to an external 19.2 MHz clock.
    PllExternal19M = 0b101,
    /// Reserved encoding.
    Reserved = 0b110,
    /// Clock stopped, timing generator held in reset.
    Stopped = 0b111,
}

/// Two-wire bit-rate prescaler (`TWSR.TWPS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum TwiPrescaler {
    /// Divide by 1.
    Div1 = 0b00,
    /// Divide by 4.
    Div4 = 0b01,
    /// Divide by 16.
    Div16 = 0b10,
    /// Divide by 64.
    Div64 = 0b11,
}

impl TwiPrescaler {
    /// Returns the prescaler factor.
    pub const fn factor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
        }
    }
}

/// Timer clock selection (`TCCR1B.CS1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum ClockSelect {
    /// Timer stopped.
    Stopped = 0b000,
    /// CPU clock, no prescaling.
    Div1 = 0b001,
    /// CPU clock / 8.
    Div8 = 0b010,
    /// CPU clock / 64.
    Div64 = 0b011,
    /// CPU clock / 256.
    Div256 = 0b100,
    /// CPU clock / 1024.
    Div1024 = 0b101,
    /// External clock on T1, falling edge.
    ExternalFalling = 0b110,
    /// External clock on T1, rising edge.
    ExternalRising = 0b111,
}

impl ClockSelect {
    /// Returns the prescaler divisor, or `None` when the timer is stopped or
    /// clocked externally.
    pub const fn divisor(self) -> Option<u32> {
        match self {
            Self::Div1 => Some(1),
            Self::Div8 => Some(8),
            Self::Div64 => Some(64),
            Self::Div256 => Some(256),
            Self::Div1024 => Some(1_024),
            Self::Stopped | Self::ExternalFalling | Self::ExternalRising => None,
        }
    }

    /// Next larger internal prescaler, if any.
    pub const fn coarser(self) -> Option<Self> {
        match self {
            Self::Div1 => Some(Self::Div8),
            Self::Div8 => Some(Self::Div64),
            Self::Div64 => Some(Self::Div256),
            Self::Div256 => Some(Self::Div1024),
            _ => None,
        }
    }
}
