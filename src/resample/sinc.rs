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
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use super::resampled_len;
use crate::audio::SampleBuffer;
use crate::error::ExtractError;

/// Input block size for the sinc resampler.
const INPUT_BLOCK_SIZE: usize = 1024;

fn resampling_error(source_rate: u32, target_rate: u32, e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Resampling(format!("{}Hz -> {}Hz: {}", source_rate, target_rate, e))
}

/// Resamples a buffer to `target_rate` with a band-limited sinc interpolator.
///
/// Output sample 0 lines up with input sample 0; `output_delay()` is already
/// compensated inside the resampler, so nothing is dropped from the front. The output
/// is trimmed (or zero padded) to the length the linear resampler produces, so both
/// kinds are interchangeable.
pub fn resample(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer, ExtractError> {
    if target_rate == 0 {
        return Err(ExtractError::InvalidSampleRate(target_rate));
    }

    let source_rate = buffer.sample_rate();
    if source_rate == target_rate {
        return Ok(buffer.clone());
    }

    let input = buffer.samples();
    let expected_len = resampled_len(input.len(), source_rate, target_rate);
    if input.is_empty() {
        return Ok(SampleBuffer::new(Vec::new(), target_rate)?);
    }

    let sinc_params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 128,
        interpolation: SincInterpolationType::Linear,
        window: WindowFunction::BlackmanHarris2,
    };
    let resample_ratio = f64::from(target_rate) / f64::from(source_rate);

    let mut resampler =
        SincFixedIn::<f32>::new(resample_ratio, 1.0, sinc_params, INPUT_BLOCK_SIZE, 1)
            .map_err(|e| resampling_error(source_rate, target_rate, e))?;

    let mut output: Vec<f32> = Vec::with_capacity(expected_len + 2 * INPUT_BLOCK_SIZE);

    // Full blocks first.
    let mut pos = 0;
    while input.len() - pos >= resampler.input_frames_next() {
        let frames = resampler.input_frames_next();
        let wave_in = [&input[pos..pos + frames]];
        let wave_out = resampler
            .process(&wave_in[..], None)
            .map_err(|e| resampling_error(source_rate, target_rate, e))?;
        output.extend_from_slice(&wave_out[0]);
        pos += frames;
    }

    // Then whatever is left, zero padded by the resampler.
    if pos < input.len() {
        let wave_in = [&input[pos..]];
        let wave_out = resampler
            .process_partial(Some(&wave_in[..]), None)
            .map_err(|e| resampling_error(source_rate, target_rate, e))?;
        output.extend_from_slice(&wave_out[0]);
    }

    // Flush the filter tail until the output covers the expected length.
    while output.len() < expected_len {
        let wave_out = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| resampling_error(source_rate, target_rate, e))?;
        if wave_out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&wave_out[0]);
    }

    output.resize(expected_len, 0.0);

    debug!(
        source_rate,
        target_rate,
        input_len = input.len(),
        output_len = output.len(),
        "Sinc resample"
    );

    Ok(SampleBuffer::new(output, target_rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::linear;
    use crate::segment::select_loop_cycle;
    use crate::testutil::sine;

    #[test]
    fn test_identity_is_exact() {
        let buffer = SampleBuffer::new(sine(440.0, 48000, 0.05, 0.5), 48000).unwrap();
        assert_eq!(resample(&buffer, 48000).unwrap(), buffer);
    }

    #[test]
    fn test_length_matches_linear() {
        for (source_rate, target_rate) in [(44100u32, 48000u32), (48000, 44100), (96000, 48000)] {
            for len in [1usize, 168, 1984, 5000] {
                let buffer = SampleBuffer::new(vec![0.1; len], source_rate).unwrap();
                let out = resample(&buffer, target_rate).unwrap();
                assert_eq!(out.len(), resampled_len(len, source_rate, target_rate));
                assert_eq!(out.sample_rate(), target_rate);
            }
        }
    }

    #[test]
    fn test_sine_is_aligned() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 0.5, 0.8), 44100).unwrap();
        let out = resample(&buffer, 48000).unwrap();
        let expected = sine(261.63, 48000, 0.5, 0.8);

        // Skip the filter's ramp at both ends.
        let middle = 2000..out.len() - 2000;
        let max_error = out.samples()[middle.clone()]
            .iter()
            .zip(expected[middle].iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_error < 0.05, "max error {}", max_error);
    }

    #[test]
    fn test_impulse_keeps_its_position() {
        // 441 samples at 44.1kHz is 10ms, which is sample 480 at 48kHz.
        let mut samples = vec![0.0f32; 4410];
        samples[441] = 1.0;
        let buffer = SampleBuffer::new(samples, 44100).unwrap();

        let out = resample(&buffer, 48000).unwrap();
        let peak_at = out
            .samples()
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, v)| if *v > best.1 { (i, *v) } else { best })
            .0;
        assert!(peak_at.abs_diff(480) <= 1, "impulse peak at {}", peak_at);
    }

    #[test]
    fn test_loop_cycle_matches_linear() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 1.0, 0.8), 44100).unwrap();
        let cycle = select_loop_cycle(&buffer, 200, 261.63).unwrap();

        let sinc = resample(&cycle.samples, 48000).unwrap();
        let linear = linear::resample(&cycle.samples, 48000).unwrap();
        assert_eq!(sinc.len(), linear.len());

        // The whole cycle carries signal, not just its first few samples.
        let near_zero = sinc.samples().iter().filter(|v| v.abs() < 0.01).count();
        assert!(near_zero < 10, "{} near-zero samples", near_zero);

        // Away from the edges, where the filter sees the cut, both agree.
        let middle = 24..sinc.len() - 24;
        let max_diff = sinc.samples()[middle.clone()]
            .iter()
            .zip(linear.samples()[middle].iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_diff < 0.05, "max difference {}", max_diff);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SampleBuffer::new(vec![], 44100).unwrap();
        let out = resample(&buffer, 48000).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.sample_rate(), 48000);
    }
}
