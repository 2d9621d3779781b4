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
use tracing::debug;

use super::resampled_len;
use crate::audio::SampleBuffer;
use crate::error::ExtractError;

/// Resamples a buffer to `target_rate` using linear interpolation.
///
/// A buffer already at `target_rate` is returned unchanged. There is no anti-aliasing
/// filter, so downsampling material with energy above the new Nyquist frequency will
/// alias.
pub fn resample(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer, ExtractError> {
    if target_rate == 0 {
        return Err(ExtractError::InvalidSampleRate(target_rate));
    }

    let source_rate = buffer.sample_rate();
    if source_rate == target_rate {
        return Ok(buffer.clone());
    }

    let samples = buffer.samples();
    let ratio = f64::from(source_rate) / f64::from(target_rate);
    let output_len = resampled_len(samples.len(), source_rate, target_rate);

    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let pos = i as f64 * ratio;
        let idx = (pos.floor() as usize).min(samples.len() - 1);
        let frac = pos - idx as f64;

        let value = match samples.get(idx + 1) {
            Some(&next) => f64::from(samples[idx]) * (1.0 - frac) + f64::from(next) * frac,
            // Past the last pair, hold the final sample.
            None => f64::from(samples[idx]),
        };
        output.push(value as f32);
    }

    debug!(
        source_rate,
        target_rate,
        input_len = samples.len(),
        output_len,
        "Linear resample"
    );

    Ok(SampleBuffer::new(output, target_rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sine;

    #[test]
    fn test_identity_is_exact() {
        let samples = sine(261.63, 44100, 0.1, 0.7);
        let buffer = SampleBuffer::new(samples, 44100).unwrap();

        let out = resample(&buffer, 44100).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_upsample_doubles_with_midpoints() {
        let buffer = SampleBuffer::new(vec![0.0, 1.0, 0.0, -1.0], 100).unwrap();

        let out = resample(&buffer, 200).unwrap();
        assert_eq!(out.sample_rate(), 200);
        assert_eq!(out.samples(), &[0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.0]);
    }

    #[test]
    fn test_downsample_picks_every_other() {
        let buffer = SampleBuffer::new(vec![0.1, 0.2, 0.3, 0.4, 0.5], 200).unwrap();

        let out = resample(&buffer, 100).unwrap();
        assert_eq!(out.samples(), &[0.1, 0.3]);
    }

    #[test]
    fn test_length_law() {
        let rates = [8000u32, 22050, 44100, 48000, 96000];
        for source_rate in rates {
            for target_rate in rates {
                if source_rate == target_rate {
                    continue;
                }
                for len in [0usize, 1, 2, 7, 168, 1984] {
                    let buffer = SampleBuffer::new(vec![0.25; len], source_rate).unwrap();
                    let out = resample(&buffer, target_rate).unwrap();
                    let expected = (len as u64 * target_rate as u64 / source_rate as u64) as usize;
                    assert_eq!(out.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_lengths() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 1.0, 0.8), 44100).unwrap();

        let up = resample(&buffer, 48000).unwrap();
        assert_eq!(up.len(), 48000);

        let down = resample(&up, 44100).unwrap();
        assert_eq!(down.len(), 44100);
        assert_eq!(down.sample_rate(), 44100);
    }

    #[test]
    fn test_preserves_waveform_shape() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 0.25, 0.8), 44100).unwrap();
        let out = resample(&buffer, 48000).unwrap();
        let expected = sine(261.63, 48000, 0.25, 0.8);

        let max_error = out
            .samples()
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_error < 0.01, "max error {}", max_error);
    }

    #[test]
    fn test_zero_target_rate() {
        let buffer = SampleBuffer::new(vec![0.0; 4], 100).unwrap();
        assert!(matches!(
            resample(&buffer, 0),
            Err(ExtractError::InvalidSampleRate(0))
        ));
    }
}
