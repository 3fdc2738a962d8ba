//! Timer-driven sample capture.
//!
//! The foreground publishes the latest [`QuantizedSample`] into a
//! [`SamplePipeline`]; the sampling timer interrupt captures it into a
//! fixed per-axis buffer at the rate programmed through [`SamplingTimer`].
//! Once the buffer fills, the foreground drains it and capture resumes.
//! Register-level access for real silicon is provided by
//! [`mmio::MmioTimer1`].
//!
//! [`QuantizedSample`]: crate::device::QuantizedSample

mod buffer;
pub mod mmio;
mod pipeline;
mod timer;

pub use self::buffer::{Capture, SampleBuffer};
pub use self::pipeline::SamplePipeline;
pub use self::timer::{MAX_SAMPLING_HZ, MIN_SAMPLING_HZ, SamplingTimer, TimerRegisters};

/// Samples per axis held by the default pipeline.
pub const SAMPLE_CAPACITY: usize = 256;

/// Accelerometer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in transmission order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Label written ahead of the axis block in a serial frame.
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}
