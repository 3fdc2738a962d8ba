//! Register access abstraction for the MPU-6050 driver.

pub mod i2c;
pub mod twi;

pub use self::i2c::I2cInterface;
pub use self::twi::TwiInterface;

/// Abstraction over the register-level bus access required by the driver.
pub trait RegisterInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}
