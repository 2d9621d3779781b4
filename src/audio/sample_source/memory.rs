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
use super::error::SampleSourceError;
use super::traits::{DecodedAudio, SampleSource, SourceInfo};
use crate::audio::SampleBuffer;

/// A sample source that produces already-normalized mono samples from memory.
/// Useful for exercising the pipeline without touching the filesystem.
pub struct MemorySampleSource {
    samples: Vec<f32>,
    sample_rate: u32,
    name: String,
}

impl MemorySampleSource {
    /// Creates a new memory sample source.
    pub fn new(samples: Vec<f32>, sample_rate: u32, name: &str) -> Self {
        Self {
            samples,
            sample_rate,
            name: name.to_string(),
        }
    }
}

impl SampleSource for MemorySampleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_mono(&mut self) -> Result<DecodedAudio, SampleSourceError> {
        let buffer = SampleBuffer::new(self.samples.clone(), self.sample_rate)?;
        let info = SourceInfo {
            channels: 1,
            bits_per_sample: 32, // Memory samples are 32-bit float
            frames: buffer.len(),
            peak: buffer.peak(),
        };
        Ok(DecodedAudio { buffer, info })
    }
}
