//! Error handling primitives for the accelerometer client.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying bus interface failed; no fresh sample is available.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// `WHO_AM_I` did not return the expected identity.
    DeviceIdMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
