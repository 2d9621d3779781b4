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
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::WavReader;
use tracing::debug;

use super::error::SampleSourceError;
use super::traits::{DecodedAudio, SampleSource, SourceInfo};
use crate::audio::SampleBuffer;
use crate::util::filename_display;

/// Full scale of a signed 16-bit sample.
const I16_FULL_SCALE: f32 = 32768.0;

/// A sample source that reads 16-bit PCM WAV data, mono or stereo.
pub struct WavSampleSource<R: Read> {
    wav_reader: WavReader<R>,
    name: String,
}

impl WavSampleSource<BufReader<File>> {
    /// Opens a WAV file. The file stays open until the source is dropped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SampleSourceError> {
        let path = path.as_ref();
        let wav_reader = WavReader::open(path)?;
        Ok(Self {
            wav_reader,
            name: filename_display(path).to_string(),
        })
    }
}

impl<R: Read> WavSampleSource<R> {
    /// Creates a source over raw WAV container bytes.
    pub fn from_reader(reader: R, name: &str) -> Result<Self, SampleSourceError> {
        Ok(Self {
            wav_reader: WavReader::new(reader)?,
            name: name.to_string(),
        })
    }
}

impl<R: Read> SampleSource for WavSampleSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_mono(&mut self) -> Result<DecodedAudio, SampleSourceError> {
        let spec = self.wav_reader.spec();
        check_format(&spec)?;

        let channels = usize::from(spec.channels);
        let frames = self.wav_reader.duration() as usize;
        let mut mono = Vec::with_capacity(frames);

        // Samples arrive interleaved; only the first channel of each frame is kept.
        for (i, sample) in self.wav_reader.samples::<i16>().enumerate() {
            let sample = sample?;
            if i % channels == 0 {
                mono.push(normalize_i16(sample));
            }
        }

        let buffer = SampleBuffer::new(mono, spec.sample_rate)?;
        let info = SourceInfo {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            frames: buffer.len(),
            peak: buffer.peak(),
        };

        debug!(
            source = %self.name,
            channels = info.channels,
            sample_rate = buffer.sample_rate(),
            frames = info.frames,
            "Decoded WAV source"
        );

        Ok(DecodedAudio { buffer, info })
    }
}

/// Decodes a WAV file in one step. The file handle is released before this returns,
/// whether decoding succeeded or not.
pub fn decode_wav_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, SampleSourceError> {
    let mut source = WavSampleSource::from_file(path)?;
    source.read_mono()
}

/// Rejects anything other than 16-bit integer PCM with one or two channels.
fn check_format(spec: &hound::WavSpec) -> Result<(), SampleSourceError> {
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        let kind = match spec.sample_format {
            hound::SampleFormat::Int => "integer",
            hound::SampleFormat::Float => "float",
        };
        return Err(SampleSourceError::UnsupportedFormat(format!(
            "sample width {} bits ({}), only 16-bit integer PCM is supported",
            spec.bits_per_sample, kind
        )));
    }

    if spec.channels == 0 || spec.channels > 2 {
        return Err(SampleSourceError::UnsupportedFormat(format!(
            "{} channels, only mono or stereo is supported",
            spec.channels
        )));
    }

    Ok(())
}

/// Scales a signed 16-bit sample into [-1.0, 1.0).
pub fn normalize_i16(sample: i16) -> f32 {
    f32::from(sample) / I16_FULL_SCALE
}
