// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::time::Duration;

use super::sample_source::error::SampleSourceError;

/// A mono run of normalized samples at a fixed sample rate.
///
/// Buffers are never modified after construction. Slicing and resampling
/// produce new buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Creates a new buffer. The sample rate must be non-zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, SampleSourceError> {
        if sample_rate == 0 {
            return Err(SampleSourceError::InvalidSampleRate(sample_rate));
        }

        Ok(SampleBuffer {
            samples,
            sample_rate,
        })
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the playback duration of the buffer.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Returns the largest absolute amplitude, or 0.0 for an empty buffer.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Converts a millisecond offset into a sample count at this buffer's rate,
    /// truncating any fractional sample.
    pub fn ms_to_samples(&self, ms: u32) -> usize {
        (u64::from(ms) * u64::from(self.sample_rate) / 1000) as usize
    }

    /// Returns a new buffer holding `len` samples starting at `start`. Both ends are
    /// clamped to the buffer, so the result may be shorter than requested or empty.
    pub fn slice(&self, start: usize, len: usize) -> SampleBuffer {
        let start = start.min(self.samples.len());
        let end = start.saturating_add(len).min(self.samples.len());

        SampleBuffer {
            samples: self.samples[start..end].to_vec(),
            sample_rate: self.sample_rate,
        }
    }
}
