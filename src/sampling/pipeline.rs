//! Interrupt-shared sample pipeline.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use super::{Axis, Capture, SampleBuffer};
use crate::device::QuantizedSample;
use crate::log::debug;

/// Latest-sample slot and capture buffer shared between the foreground loop
/// and the sampling timer interrupt.
///
/// Place it in a `static`. The foreground calls [`publish`] and [`drain`],
/// the timer handler calls [`on_tick`]. Every access to shared state happens
/// inside a critical section, so the handler always captures a whole sample
/// and never observes a half-reset buffer.
///
/// [`publish`]: SamplePipeline::publish
/// [`drain`]: SamplePipeline::drain
/// [`on_tick`]: SamplePipeline::on_tick
pub struct SamplePipeline<const N: usize> {
    latest: Mutex<Cell<QuantizedSample>>,
    buffer: Mutex<RefCell<SampleBuffer<N>>>,
    skipped: Mutex<Cell<u32>>,
}

impl<const N: usize> SamplePipeline<N> {
    /// Creates an empty pipeline whose latest sample is all zero.
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Cell::new(QuantizedSample::new(0, 0, 0))),
            buffer: Mutex::new(RefCell::new(SampleBuffer::new())),
            skipped: Mutex::new(Cell::new(0)),
        }
    }

    /// Replaces the latest sample. Foreground context.
    pub fn publish(&self, sample: QuantizedSample) {
        critical_section::with(|cs| self.latest.borrow(cs).set(sample));
    }

    /// The sample the next tick will capture.
    pub fn latest(&self) -> QuantizedSample {
        critical_section::with(|cs| self.latest.borrow(cs).get())
    }

    /// Captures the latest sample. Timer interrupt context; never blocks.
    pub fn on_tick(&self) -> Capture {
        critical_section::with(|cs| {
            let sample = self.latest.borrow(cs).get();
            let capture = self.buffer.borrow_ref_mut(cs).capture(sample);
            if capture == Capture::Skipped {
                let skipped = self.skipped.borrow(cs);
                skipped.set(skipped.get().wrapping_add(1));
            }
            capture
        })
    }

    /// Whether a full block awaits [`drain`](Self::drain).
    pub fn is_full(&self) -> bool {
        critical_section::with(|cs| self.buffer.borrow_ref(cs).is_full())
    }

    /// Samples captured per axis since the last drain.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.buffer.borrow_ref(cs).len())
    }

    /// Whether nothing was captured since the last drain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ticks dropped because the buffer was full.
    pub fn skipped(&self) -> u32 {
        critical_section::with(|cs| self.skipped.borrow(cs).get())
    }

    /// Hands a full block to `sink` and rewinds the buffer.
    ///
    /// Bytes are delivered axis-major with their axis and per-axis index.
    /// Returns `Ok(false)` without calling `sink` when the buffer is not
    /// full. The first sink error stops delivery; the buffer is rewound
    /// regardless and the error returned.
    pub fn drain<E, F>(&self, mut sink: F) -> Result<bool, E>
    where
        F: FnMut(Axis, usize, u8) -> Result<(), E>,
    {
        if !self.is_full() {
            return Ok(false);
        }

        let mut outcome = Ok(true);
        'axes: for axis in Axis::ALL {
            for index in 0..N {
                // Capture is suspended until the rewind, so each byte is stable.
                let byte = critical_section::with(|cs| {
                    self.buffer.borrow_ref(cs).get(axis, index).unwrap_or(0)
                });
                if let Err(err) = sink(axis, index, byte) {
                    outcome = Err(err);
                    break 'axes;
                }
            }
        }

        critical_section::with(|cs| self.buffer.borrow_ref_mut(cs).reset());
        debug!("sample block drained");
        outcome
    }
}

impl<const N: usize> Default for SamplePipeline<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::SAMPLE_CAPACITY;

    #[test]
    fn ticks_capture_the_latest_published_sample() {
        let pipeline = SamplePipeline::<4>::new();
        assert_eq!(pipeline.latest(), QuantizedSample::default());

        pipeline.publish(QuantizedSample::new(143, 127, 111));
        assert_eq!(pipeline.on_tick(), Capture::Stored);
        assert_eq!(pipeline.on_tick(), Capture::Stored);
        pipeline.publish(QuantizedSample::new(1, 2, 3));
        assert_eq!(pipeline.on_tick(), Capture::Stored);
        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_full());
    }

    #[test]
    fn drain_is_a_no_op_until_full() {
        let pipeline = SamplePipeline::<4>::new();
        pipeline.on_tick();
        let drained = pipeline.drain(|_, _, _| -> Result<(), ()> { panic!("sink called") });
        assert_eq!(drained, Ok(false));
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn full_cycle_transmits_each_axis_in_order() {
        let pipeline = SamplePipeline::<SAMPLE_CAPACITY>::new();
        pipeline.publish(QuantizedSample::new(143, 127, 111));

        let mut drains = 0;
        let mut delivered = [0usize; 3];
        for _ in 0..SAMPLE_CAPACITY {
            pipeline.on_tick();
            let drained = pipeline
                .drain(|axis, index, byte| {
                    let expected = match axis {
                        Axis::X => 143,
                        Axis::Y => 127,
                        Axis::Z => 111,
                    };
                    assert_eq!(byte, expected);
                    assert_eq!(index, delivered[axis as usize]);
                    delivered[axis as usize] += 1;
                    Ok::<(), ()>(())
                })
                .unwrap();
            if drained {
                drains += 1;
            }
        }

        assert_eq!(drains, 1);
        assert_eq!(delivered, [SAMPLE_CAPACITY; 3]);
        assert!(pipeline.is_empty());
        assert!(!pipeline.is_full());
    }

    #[test]
    fn ticks_while_full_are_skipped_and_counted() {
        let pipeline = SamplePipeline::<2>::new();
        pipeline.publish(QuantizedSample::new(9, 9, 9));
        assert_eq!(pipeline.on_tick(), Capture::Stored);
        assert_eq!(pipeline.on_tick(), Capture::Filled);

        pipeline.publish(QuantizedSample::new(1, 1, 1));
        assert_eq!(pipeline.on_tick(), Capture::Skipped);
        assert_eq!(pipeline.on_tick(), Capture::Skipped);
        assert_eq!(pipeline.skipped(), 2);
        assert_eq!(pipeline.len(), 2);

        let mut bytes = heapless::Vec::<u8, 6>::new();
        pipeline
            .drain(|_, _, byte| bytes.push(byte).map_err(|_| ()))
            .unwrap();
        assert_eq!(bytes.as_slice(), &[9, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn sink_error_still_rewinds_the_buffer() {
        let pipeline = SamplePipeline::<2>::new();
        pipeline.on_tick();
        pipeline.on_tick();

        let mut calls = 0;
        let result = pipeline.drain(|axis, _, _| {
            calls += 1;
            if axis == Axis::Y { Err("serial") } else { Ok(()) }
        });

        assert_eq!(result, Err("serial"));
        assert_eq!(calls, 3);
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.on_tick(), Capture::Stored);
    }

    #[test]
    fn pipeline_lives_in_a_static() {
        static PIPELINE: SamplePipeline<8> = SamplePipeline::new();
        PIPELINE.publish(QuantizedSample::new(5, 6, 7));
        PIPELINE.on_tick();
        assert_eq!(PIPELINE.latest(), QuantizedSample::new(5, 6, 7));
        assert!(!PIPELINE.is_empty());
    }
}
