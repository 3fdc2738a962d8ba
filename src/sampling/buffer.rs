//! Fixed per-axis sample storage.

use super::Axis;
use crate::device::QuantizedSample;

/// Outcome of a single [`SampleBuffer::capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capture {
    /// The sample was stored and room remains.
    Stored,
    /// The sample was stored into the last slot; the buffer is now full.
    Filled,
    /// The buffer was already full; the sample was dropped.
    Skipped,
}

/// `N` samples per axis plus a fill index and a ready flag.
///
/// `ready` means the buffer accepts writes. It starts set, is cleared exactly
/// when the index reaches `N`, and only [`reset`](Self::reset) sets it again.
/// Nothing is stored while it is clear, so the index never exceeds `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer<const N: usize> {
    data: [[u8; N]; 3],
    index: usize,
    ready: bool,
}

impl<const N: usize> SampleBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            data: [[0; N]; 3],
            index: 0,
            ready: true,
        }
    }

    /// Stores `sample` at the current index unless the buffer is full.
    pub fn capture(&mut self, sample: QuantizedSample) -> Capture {
        if !self.ready {
            return Capture::Skipped;
        }

        let [x, y, z] = &mut self.data;
        x[self.index] = sample.x;
        y[self.index] = sample.y;
        z[self.index] = sample.z;
        self.index += 1;

        if self.index == N {
            self.ready = false;
            Capture::Filled
        } else {
            Capture::Stored
        }
    }

    /// Whether the buffer accepts samples.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether every slot holds a sample.
    pub fn is_full(&self) -> bool {
        self.index == N
    }

    /// Number of samples stored per axis.
    pub fn len(&self) -> usize {
        self.index
    }

    /// Whether no sample has been stored since the last reset.
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    /// Samples per axis.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Stored samples of one axis.
    pub fn axis(&self, axis: Axis) -> &[u8] {
        &self.data[axis.index()][..self.index]
    }

    /// Sample `index` of `axis`, if stored.
    pub fn get(&self, axis: Axis, index: usize) -> Option<u8> {
        self.axis(axis).get(index).copied()
    }

    /// Rewinds to empty and accepts samples again.
    pub fn reset(&mut self) {
        self.index = 0;
        self.ready = true;
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
