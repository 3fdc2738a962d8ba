//! High-level MPU-6050 accelerometer client.

use embedded_hal::i2c::I2c;

use crate::bus::{TwiRegisters, TwoWireMaster};
use crate::clock::Millis;
use crate::config::{Config, ConfigError};
use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface, TwiInterface};
use crate::log::{debug, info};
use crate::mapping::quantize;
use crate::registers::{
    ACCEL_BLOCK_LEN,
    AccelConfig,
    EXPECTED_WHO_AM_I,
    PowerManagement1,
    REG_ACCEL_XOUT_H,
    REG_WHO_AM_I,
    Register,
};

/// Acceleration along the three axes, in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerationSample {
    /// X axis.
    pub x: f32,
    /// Y axis.
    pub y: f32,
    /// Z axis.
    pub z: f32,
}

/// One byte per axis after range mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuantizedSample {
    /// X axis.
    pub x: u8,
    /// Y axis.
    pub y: u8,
    /// Z axis.
    pub z: u8,
}

impl QuantizedSample {
    /// Builds a sample from per-axis bytes.
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Quantises every axis of `sample`.
    pub fn from_acceleration(sample: AccelerationSample) -> Self {
        Self {
            x: quantize(sample.x),
            y: quantize(sample.y),
            z: quantize(sample.z),
        }
    }
}

/// High-level synchronous driver for the MPU-6050 accelerometer.
pub struct Mpu6050<IFACE> {
    interface: IFACE,
    config: Config,
    acceleration: AccelerationSample,
}

impl<IFACE> Mpu6050<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            acceleration: AccelerationSample::default(),
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last successfully read acceleration, all zero before the first read.
    pub fn acceleration(&self) -> AccelerationSample {
        self.acceleration
    }
}

impl<HW, CLK> Mpu6050<TwiInterface<HW, CLK>>
where
    HW: TwiRegisters,
    CLK: Millis,
{
    // ==================================================================
    // == Bus Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor over the crate's two-wire master.
    ///
    /// Applies the configured timeout budget to `bus`. Fails when `config`
    /// does not validate, since the address and timing must be usable before
    /// the first transaction.
    pub fn new_twi(
        mut bus: TwoWireMaster<HW, CLK>,
        config: Config,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let address = config.bus_address().ok_or(ConfigError::InvalidAddress)?;
        bus.set_timeout(config.timeout_ms);
        Ok(Self::new(TwiInterface::new(bus, address), config))
    }

    /// Releases the driver, returning the bus engine and configuration.
    pub fn release_twi(self) -> (TwoWireMaster<HW, CLK>, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<I2C> Mpu6050<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for `embedded-hal` I2C buses.
    pub fn new_i2c(i2c: I2C, config: Config) -> Self {
        let address = config.address;
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I2C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Mpu6050<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Wakes the sensor and programs the configured full-scale range.
    ///
    /// The sensor powers up asleep; clearing `PWR_MGMT_1` selects the
    /// internal oscillator and starts conversions.
    pub fn begin(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        self.interface
            .write_register(PowerManagement1::ADDRESS, u8::from(PowerManagement1::new()))?;
        let accel = AccelConfig::new().with_range(self.config.range);
        self.interface
            .write_register(AccelConfig::ADDRESS, u8::from(accel))?;

        info!("accelerometer awake, range {}", self.config.range);
        Ok(())
    }

    /// Verifies `WHO_AM_I` against the expected MPU-6050 identity.
    pub fn check_id(&mut self) -> Result<u8, CommE> {
        let id = self.interface.read_register(REG_WHO_AM_I)?;
        if id != EXPECTED_WHO_AM_I {
            return Err(Error::DeviceIdMismatch);
        }
        Ok(id)
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads the accelerometer and returns the quantised sample.
    ///
    /// On a bus failure the previous acceleration is kept and
    /// [`Error::Interface`] reports that no fresh sample is available.
    pub fn get_acceleration(&mut self) -> Result<QuantizedSample, CommE> {
        self.read_acceleration()?;
        Ok(QuantizedSample::from_acceleration(self.acceleration))
    }

    fn read_acceleration(&mut self) -> Result<(), CommE> {
        let mut raw = [0u8; ACCEL_BLOCK_LEN];
        if let Err(err) = self.interface.read_many(REG_ACCEL_XOUT_H, &mut raw) {
            debug!("acceleration read failed, keeping last sample");
            return Err(Error::Interface(err));
        }

        let divisor = self.config.range.divisor();
        self.acceleration = AccelerationSample {
            x: f32::from(i16::from_be_bytes([raw[0], raw[1]])) / divisor,
            y: f32::from(i16::from_be_bytes([raw[2], raw[3]])) / divisor,
            z: f32::from(i16::from_be_bytes([raw[4], raw[5]])) / divisor,
        };
        Ok(())
    }
}
