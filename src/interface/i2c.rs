//! Register interface over any `embedded-hal` I2C bus.

use embedded_hal::i2c::I2c;

use super::RegisterInterface;

/// I2C-based interface implementation for the MPU-6050 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to the 7-bit `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }
        self.i2c.write_read(self.address, &[register], buf)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use std::vec;

    const ADDRESS: u8 = 0x68;

    #[test]
    fn write_register_sends_register_then_value() {
        let expectations = [Transaction::write(ADDRESS, vec![0x6B, 0x00])];
        let mut interface = I2cInterface::new(Mock::new(&expectations), ADDRESS);

        interface.write_register(0x6B, 0x00).unwrap();
        interface.release().done();
    }

    #[test]
    fn read_many_uses_a_repeated_start() {
        let expectations = [Transaction::write_read(
            ADDRESS,
            vec![0x3B],
            vec![0x10, 0x00, 0x00, 0x00, 0xF0, 0x00],
        )];
        let mut interface = I2cInterface::new(Mock::new(&expectations), ADDRESS);

        let mut buf = [0u8; 6];
        interface.read_many(0x3B, &mut buf).unwrap();
        assert_eq!(buf, [0x10, 0x00, 0x00, 0x00, 0xF0, 0x00]);
        interface.release().done();
    }

    #[test]
    fn read_register_reuses_read_many() {
        let expectations = [Transaction::write_read(ADDRESS, vec![0x75], vec![0x68])];
        let mut interface = I2cInterface::new(Mock::new(&expectations), ADDRESS);

        assert_eq!(interface.read_register(0x75).unwrap(), 0x68);
        interface.release().done();
    }

    #[test]
    fn bus_errors_are_propagated() {
        let expectations =
            [Transaction::write(ADDRESS, vec![0x6B, 0x00]).with_error(ErrorKind::Other)];
        let mut interface = I2cInterface::new(Mock::new(&expectations), ADDRESS);

        assert_eq!(interface.write_register(0x6B, 0x00), Err(ErrorKind::Other));
        interface.release().done();
    }
}
