//! `#![no_std]` core of a vibration monitor built around an MPU-6050.
//!
//! * [`bus`] drives the microcontroller's two-wire interface phase by phase,
//!   bounding every wait and recovering the controller after a lock-up.
//! * [`Mpu6050`] wakes the sensor and turns raw readings into g-values and
//!   one-byte samples ([`mapping`]).
//! * [`sampling`] captures samples from a timer interrupt into a fixed
//!   buffer that the foreground drains as text frames ([`report`]).
//! * [`command`] parses host commands driving the alert output, and
//!   [`monitor`] runs the foreground loop.
#![no_std]

mod error;
mod log;

pub mod bus;
pub mod clock;
pub mod command;
pub mod config;
pub mod device;
pub mod interface;
pub mod mapping;
pub mod monitor;
pub mod params;
pub mod registers;
pub mod report;
pub mod sampling;

pub use crate::device::{AccelerationSample, Mpu6050, QuantizedSample};
pub use crate::error::{Error, Result};
