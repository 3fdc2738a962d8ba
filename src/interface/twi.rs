//! Register interface over the crate's own two-wire master.

use super::RegisterInterface;
use crate::bus::{BusAddress, RECEIVE_CAPACITY, TransactionError, TwiRegisters, TwoWireMaster};
use crate::clock::Millis;

/// Binds a [`TwoWireMaster`] to one slave address.
pub struct TwiInterface<HW, CLK> {
    bus: TwoWireMaster<HW, CLK>,
    address: BusAddress,
}

impl<HW, CLK> TwiInterface<HW, CLK> {
    /// Creates an interface talking to `address` over `bus`.
    pub const fn new(bus: TwoWireMaster<HW, CLK>, address: BusAddress) -> Self {
        Self { bus, address }
    }

    /// Slave address used for every transaction.
    pub fn address(&self) -> BusAddress {
        self.address
    }

    /// Provides mutable access to the wrapped bus engine.
    pub fn bus_mut(&mut self) -> &mut TwoWireMaster<HW, CLK> {
        &mut self.bus
    }

    /// Consumes the interface and returns the owned bus engine.
    pub fn release(self) -> TwoWireMaster<HW, CLK> {
        self.bus
    }
}

impl<HW, CLK> RegisterInterface for TwiInterface<HW, CLK>
where
    HW: TwiRegisters,
    CLK: Millis,
{
    type Error = TransactionError;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.bus.write(self.address, register, value)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    /// Bursts longer than the engine's receive buffer are truncated to it;
    /// the remainder of `buf` is left untouched.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let count = buf.len().min(RECEIVE_CAPACITY) as u8;
        self.bus.read(self.address, register, count)?;
        for slot in buf.iter_mut().take(usize::from(count)) {
            *slot = self.bus.receive();
        }
        Ok(())
    }
}
