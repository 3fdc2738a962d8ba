//! Serial frame formatting of drained sample blocks.

use core::fmt::Write;

use crate::mapping::dequantize;
use crate::sampling::Axis;

/// Writes drained samples as labelled text blocks.
///
/// Each axis block starts with its label line (`x`, `y`, `z`) followed by one
/// line per sample holding the dequantised value with two decimals.
pub struct FrameWriter<W> {
    out: W,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps a text sink such as a serial port.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes one drained byte, preceded by the axis label at index 0.
    ///
    /// Suitable as the sink of [`SamplePipeline::drain`].
    ///
    /// [`SamplePipeline::drain`]: crate::sampling::SamplePipeline::drain
    pub fn write_sample(&mut self, axis: Axis, index: usize, byte: u8) -> core::fmt::Result {
        if index == 0 {
            writeln!(self.out, "{}", axis.label())?;
        }
        writeln!(self.out, "{:.2}", dequantize(byte))
    }

    /// Provides mutable access to the wrapped sink.
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consumes the writer and returns the sink.
    pub fn release(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn label_precedes_the_first_sample_of_each_axis() {
        let mut writer = FrameWriter::new(String::<64>::new());
        writer.write_sample(Axis::X, 0, 143).unwrap();
        writer.write_sample(Axis::X, 1, 255).unwrap();
        writer.write_sample(Axis::Y, 0, 127).unwrap();
        writer.write_sample(Axis::Z, 0, 0).unwrap();

        assert_eq!(writer.release().as_str(), "x\n0.24\n2.00\ny\n-0.01\nz\n-2.00\n");
    }

    #[test]
    fn full_sink_reports_an_error() {
        let mut writer = FrameWriter::new(String::<4>::new());
        assert!(writer.write_sample(Axis::X, 0, 143).is_err());
    }
}
