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
use serde::Serialize;

use super::error::SampleSourceError;
use crate::audio::SampleBuffer;

/// Container-level facts about a decoded source, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    /// Channel count of the container before collapsing to mono.
    pub channels: u16,
    /// Bits per sample of the container.
    pub bits_per_sample: u16,
    /// Frames (samples per channel) in the container.
    pub frames: usize,
    /// Largest absolute normalized amplitude of the retained channel.
    pub peak: f32,
}

/// The result of decoding a source: the mono buffer and what it came from.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub buffer: SampleBuffer,
    pub info: SourceInfo,
}

/// A source of samples that can be decoded into a single normalized mono buffer.
pub trait SampleSource {
    /// Get a displayable name for this source (usually the file name).
    fn name(&self) -> &str;

    /// Decode the whole source. Multi-channel sources keep only their first channel.
    fn read_mono(&mut self) -> Result<DecodedAudio, SampleSourceError>;
}
