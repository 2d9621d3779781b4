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
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::error::ExtractError;

pub mod linear;
pub mod sinc;

pub use linear::resample;

/// Which resampler converts the segments to the output rate.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerKind {
    /// Linear interpolation between neighbouring samples.
    #[default]
    Linear,
    /// Band-limited sinc interpolation.
    Sinc,
}

impl fmt::Display for ResamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResamplerKind::Linear => write!(f, "linear"),
            ResamplerKind::Sinc => write!(f, "sinc"),
        }
    }
}

/// Resamples `buffer` to `target_rate` with the given resampler.
pub fn resample_with(
    buffer: &SampleBuffer,
    target_rate: u32,
    kind: ResamplerKind,
) -> Result<SampleBuffer, ExtractError> {
    match kind {
        ResamplerKind::Linear => linear::resample(buffer, target_rate),
        ResamplerKind::Sinc => sinc::resample(buffer, target_rate),
    }
}

/// Number of output samples for `len` input samples converted from `source_rate` to
/// `target_rate`: `floor(len * target_rate / source_rate)`.
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    (len as u128 * u128::from(target_rate) / u128::from(source_rate)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampled_len() {
        assert_eq!(resampled_len(44100, 44100, 48000), 48000);
        assert_eq!(resampled_len(168, 44100, 48000), 182);
        assert_eq!(resampled_len(1984, 44100, 48000), 2159);
        assert_eq!(resampled_len(48000, 48000, 44100), 44100);
        assert_eq!(resampled_len(0, 48000, 44100), 0);
    }

    #[test]
    fn test_resample_with_dispatch() {
        let buffer = SampleBuffer::new(vec![0.0, 0.5, 1.0, 0.5], 4).unwrap();

        for kind in [ResamplerKind::Linear, ResamplerKind::Sinc] {
            let out = resample_with(&buffer, 4, kind).unwrap();
            assert_eq!(out, buffer, "{} should not touch a buffer at its own rate", kind);
        }

        let out = resample_with(&buffer, 8, ResamplerKind::Linear).unwrap();
        assert_eq!(out.len(), 8);
    }
}
