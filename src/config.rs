//! Configuration primitives for the vibration monitor.

use crate::bus::{BusAddress, bit_rate_register};
use crate::params::AccelRange;
use crate::registers::DEFAULT_ADDRESS;
use crate::sampling::{MAX_SAMPLING_HZ, MIN_SAMPLING_HZ, SamplingTimer};

/// User-facing configuration for the bus, the sensor and the sampling timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit bus address of the sensor.
    pub address: u8,
    /// Core clock frequency feeding the bus and timer prescalers.
    pub cpu_hz: u32,
    /// Two-wire clock frequency.
    pub bus_frequency_hz: u32,
    /// Budget for every blocking bus wait, `0` disables enforcement.
    pub timeout_ms: u16,
    /// Sampling timer frequency.
    pub sampling_hz: u16,
    /// Accelerometer full-scale range.
    pub range: AccelRange,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether the peripherals can realise this configuration.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if BusAddress::new(self.address).is_none() {
            return Err(ConfigError::InvalidAddress);
        }
        if self.bit_rate().is_none() {
            return Err(ConfigError::BusFrequencyOutOfRange);
        }
        if !(MIN_SAMPLING_HZ..=MAX_SAMPLING_HZ).contains(&self.sampling_hz)
            || self.sampling_timer().is_none()
        {
            return Err(ConfigError::SamplingFrequencyOutOfRange);
        }

        Ok(())
    }

    /// Typed sensor address, `None` if it does not fit in seven bits.
    pub fn bus_address(&self) -> Option<BusAddress> {
        BusAddress::new(self.address)
    }

    /// Two-wire bit-rate register value for this configuration.
    pub fn bit_rate(&self) -> Option<u8> {
        bit_rate_register(self.cpu_hz, self.bus_frequency_hz)
    }

    /// Sampling timer settings for this configuration, `None` if the core
    /// clock cannot reach the sampling rate.
    pub fn sampling_timer(&self) -> Option<SamplingTimer> {
        SamplingTimer::for_frequency(self.cpu_hz, self.sampling_hz)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the sensor address.
    pub fn address(mut self, address: u8) -> Self {
        self.config.address = address;
        self
    }

    /// Overrides the core clock frequency.
    pub fn cpu_hz(mut self, cpu_hz: u32) -> Self {
        self.config.cpu_hz = cpu_hz;
        self
    }

    /// Overrides the two-wire clock frequency.
    pub fn bus_frequency_hz(mut self, hz: u32) -> Self {
        self.config.bus_frequency_hz = hz;
        self
    }

    /// Overrides the bus timeout budget.
    pub fn timeout_ms(mut self, timeout_ms: u16) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Overrides the sampling frequency.
    pub fn sampling_hz(mut self, hz: u16) -> Self {
        self.config.sampling_hz = hz;
        self
    }

    /// Overrides the full-scale range.
    pub fn range(mut self, range: AccelRange) -> Self {
        self.config.range = range;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            cpu_hz: 16_000_000,
            bus_frequency_hz: 100_000,
            timeout_ms: 1_000,
            sampling_hz: 200,
            range: AccelRange::G2,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The sensor address does not fit in seven bits.
    InvalidAddress,
    /// The bus frequency cannot be produced from the core clock.
    BusFrequencyOutOfRange,
    /// The sampling frequency lies outside the timer's supported range.
    SamplingFrequencyOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::ALTERNATE_ADDRESS;

    #[test]
    fn defaults_describe_the_reference_board() {
        let config = Config::default();
        assert_eq!(config.address, 0x68);
        assert_eq!(config.bit_rate(), Some(72));
        assert_eq!(config.timeout_ms, 1_000);
        assert_eq!(config.sampling_hz, 200);
        assert_eq!(config.range, AccelRange::G2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .address(ALTERNATE_ADDRESS)
            .bus_frequency_hz(400_000)
            .timeout_ms(0)
            .sampling_hz(1_000)
            .range(AccelRange::G8)
            .build();

        assert_eq!(config.bus_address().map(BusAddress::get), Some(0x69));
        assert_eq!(config.bit_rate(), Some(12));
        assert_eq!(config.timeout_ms, 0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unreachable_settings() {
        let config = Config::new().address(0xD0).build();
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress));

        let config = Config::new().bus_frequency_hz(10_000).build();
        assert_eq!(config.validate(), Err(ConfigError::BusFrequencyOutOfRange));

        let config = Config::new().sampling_hz(0).build();
        assert_eq!(config.validate(), Err(ConfigError::SamplingFrequencyOutOfRange));

        let config = Config::new().sampling_hz(1_001).build();
        assert_eq!(config.validate(), Err(ConfigError::SamplingFrequencyOutOfRange));

        let config = Config::new().cpu_hz(100).bus_frequency_hz(1).build();
        assert_eq!(config.validate(), Err(ConfigError::SamplingFrequencyOutOfRange));
    }

    #[test]
    fn sampling_timer_follows_cpu_clock_and_rate() {
        let timer = Config::default().sampling_timer().unwrap();
        assert_eq!(timer.frequency_hz(), 200);
        assert_eq!(timer.reload(), 55_536);

        let timer = Config::new().cpu_hz(8_000_000).sampling_hz(100).build();
        assert_eq!(timer.sampling_timer().map(|t| t.reload()), Some(55_536));
    }
}
