//! Two-wire bus master engine.
//!
//! [`TwoWireMaster`] drives the microcontroller's two-wire interface through
//! the [`TwiRegisters`] seam, one phase at a time, and recovers the
//! controller when a phase stalls or arbitration is lost. Register-level
//! access for real silicon is provided by [`mmio::MmioTwi`].

mod buffer;
mod error;
mod master;
pub mod mmio;
mod status;
#[cfg(test)]
pub(crate) mod testing;

pub use self::buffer::{RECEIVE_CAPACITY, ReceiveBuffer};
pub use self::error::{BUS_FAULT_CODE, BusError, Phase, TIMEOUT_CODE, TransactionError};
pub use self::master::TwoWireMaster;
pub use self::status::TwiStatus;

use crate::params::TwiPrescaler;
use crate::registers::Control;

/// Register-level access to a two-wire interface peripheral.
///
/// Implementations perform plain register reads and writes; all sequencing
/// lives in [`TwoWireMaster`].
pub trait TwiRegisters {
    /// Reads the control register.
    fn control(&mut self) -> Control;

    /// Writes the control register.
    fn set_control(&mut self, control: Control);

    /// Reads the status register with the prescaler bits masked off.
    fn status(&mut self) -> u8;

    /// Reads the data register.
    fn data(&mut self) -> u8;

    /// Writes the data register.
    fn set_data(&mut self, value: u8);

    /// Programs the bit-rate register and prescaler.
    fn set_bit_rate(&mut self, bit_rate: u8, prescaler: TwiPrescaler);
}

/// 7-bit bus address of a slave device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

impl BusAddress {
    /// Wraps a 7-bit address, rejecting values above `0x7F`.
    pub const fn new(address: u8) -> Option<Self> {
        if address > 0x7F {
            return None;
        }
        Some(Self(address))
    }

    /// The 7-bit address.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// On-wire address byte for a write (SLA+W).
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }

    /// On-wire address byte for a read (SLA+R).
    pub const fn read_byte(self) -> u8 {
        (self.0 << 1) | 0x01
    }
}

/// Bit-rate register value for `bus_hz` at prescaler 1:
/// `((cpu_hz / bus_hz) - 16) / 2`.
///
/// Returns `None` when the frequency cannot be reached.
pub const fn bit_rate_register(cpu_hz: u32, bus_hz: u32) -> Option<u8> {
    if bus_hz == 0 {
        return None;
    }
    let ratio = cpu_hz / bus_hz;
    if ratio < 16 {
        return None;
    }
    let bit_rate = (ratio - 16) / (2 * TwiPrescaler::Div1.factor());
    if bit_rate > u8::MAX as u32 {
        return None;
    }
    Some(bit_rate as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_bytes_carry_direction_bit() {
        let address = BusAddress::new(0x68).unwrap();
        assert_eq!(address.write_byte(), 0xD0);
        assert_eq!(address.read_byte(), 0xD1);
        assert_eq!(address.get(), 0x68);
    }

    #[test]
    fn eight_bit_addresses_are_rejected() {
        assert!(BusAddress::new(0x80).is_none());
        assert!(BusAddress::new(0x7F).is_some());
    }

    #[test]
    fn bit_rate_for_standard_mode_at_16mhz() {
        assert_eq!(bit_rate_register(16_000_000, 100_000), Some(72));
        assert_eq!(bit_rate_register(16_000_000, 400_000), Some(12));
        assert_eq!(bit_rate_register(16_000_000, 2_000_000), None);
        assert_eq!(bit_rate_register(16_000_000, 10_000), None);
        assert_eq!(bit_rate_register(16_000_000, 0), None);
    }
}
