//! Foreground loop tying the sensor, pipeline and host link together.

use core::fmt::Write;

use embedded_hal::digital::OutputPin;

use crate::command::{AlertOutput, Command, LINE_CAPACITY, LineReader};
use crate::device::Mpu6050;
use crate::interface::RegisterInterface;
use crate::log::warning;
use crate::report::FrameWriter;
use crate::sampling::SamplePipeline;

/// Failure of a foreground step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorError<S, P> {
    /// The serial sink rejected a frame.
    Serial(S),
    /// The alert pin could not be driven.
    Pin(P),
}

/// Counters kept by [`VibrationMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorStats {
    /// Samples read and published.
    pub samples: u32,
    /// Reads that failed; the previous sample stayed published.
    pub failed_reads: u32,
    /// Full blocks transmitted.
    pub blocks_sent: u32,
    /// Commands applied to the alert output.
    pub commands: u32,
}

/// One foreground context driving a [`Mpu6050`] into a [`SamplePipeline`].
///
/// The sampling timer interrupt is expected to call
/// [`SamplePipeline::on_tick`] on the same pipeline.
pub struct VibrationMonitor<'a, IFACE, W, P, const N: usize> {
    sensor: Mpu6050<IFACE>,
    frames: FrameWriter<W>,
    alert: AlertOutput<P>,
    commands: LineReader<LINE_CAPACITY>,
    pipeline: &'a SamplePipeline<N>,
    stats: MonitorStats,
}

impl<'a, IFACE, W, P, const N: usize> VibrationMonitor<'a, IFACE, W, P, N>
where
    IFACE: RegisterInterface,
    W: Write,
    P: OutputPin,
{
    /// Assembles a monitor from an initialised sensor, a serial sink and the
    /// alert pin.
    pub fn new(
        sensor: Mpu6050<IFACE>,
        serial: W,
        alert_pin: P,
        pipeline: &'a SamplePipeline<N>,
    ) -> Self {
        Self {
            sensor,
            frames: FrameWriter::new(serial),
            alert: AlertOutput::new(alert_pin),
            commands: LineReader::new(),
            pipeline,
            stats: MonitorStats::default(),
        }
    }

    /// Runs one loop iteration: sample the sensor, then transmit the block
    /// if the pipeline is full. Returns whether a block was sent.
    ///
    /// A failed read is counted and otherwise ignored; the timer keeps
    /// capturing the last published sample.
    pub fn poll(&mut self) -> Result<bool, MonitorError<core::fmt::Error, P::Error>> {
        match self.sensor.get_acceleration() {
            Ok(sample) => {
                self.pipeline.publish(sample);
                self.stats.samples = self.stats.samples.wrapping_add(1);
            }
            Err(_) => {
                self.stats.failed_reads = self.stats.failed_reads.wrapping_add(1);
                warning!("sample unavailable ({=u32} failures)", self.stats.failed_reads);
            }
        }

        let frames = &mut self.frames;
        let sent = self
            .pipeline
            .drain(|axis, index, byte| frames.write_sample(axis, index, byte))
            .map_err(MonitorError::Serial)?;
        if sent {
            self.stats.blocks_sent = self.stats.blocks_sent.wrapping_add(1);
        }
        Ok(sent)
    }

    /// Feeds one byte from the host link, applying any completed command.
    pub fn receive(
        &mut self,
        byte: u8,
    ) -> Result<Option<Command>, MonitorError<core::fmt::Error, P::Error>> {
        let Some(command) = self.commands.push(byte) else {
            return Ok(None);
        };
        self.alert.apply(command).map_err(MonitorError::Pin)?;
        self.stats.commands = self.stats.commands.wrapping_add(1);
        Ok(Some(command))
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Whether the alert output is raised.
    pub fn is_alerting(&self) -> bool {
        self.alert.is_active()
    }

    /// Provides mutable access to the sensor driver.
    pub fn sensor_mut(&mut self) -> &mut Mpu6050<IFACE> {
        &mut self.sensor
    }

    /// Consumes the monitor, returning the sensor, serial sink and pin.
    pub fn release(self) -> (Mpu6050<IFACE>, W, P) {
        (self.sensor, self.frames.release(), self.alert.release())
    }
}
