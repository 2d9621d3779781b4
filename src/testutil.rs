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

use std::{error::Error, f64::consts::PI, fs::File, io::Cursor, path::Path};

use hound::{SampleFormat, WavSpec, WavWriter};

/// A sine wave of the given length, computed in double precision.
pub fn sine(frequency: f64, sample_rate: u32, seconds: f64, amplitude: f32) -> Vec<f32> {
    let sample_count = (f64::from(sample_rate) * seconds) as usize;
    (0..sample_count)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            amplitude * (2.0 * PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Scales normalized samples to 16 bit integers.
pub fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

fn spec(channels: usize, sample_rate: u32, bits_per_sample: u16) -> WavSpec {
    assert!(channels <= u16::MAX.into(), "Too many channels!");
    WavSpec {
        channels: channels as u16,
        sample_rate,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    }
}

fn write_frames<W: std::io::Write + std::io::Seek>(
    mut writer: WavWriter<W>,
    channels: &[Vec<i16>],
) -> Result<(), Box<dyn Error>> {
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);

    // Interleave, padding short channels with silence.
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(channel.get(frame).copied().unwrap_or(0))?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Encodes integer PCM channels as an in-memory WAV file.
pub fn wav_bytes(
    channels: &[Vec<i16>],
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut cursor = Cursor::new(Vec::new());
    let writer = WavWriter::new(
        &mut cursor,
        spec(channels.len(), sample_rate, bits_per_sample),
    )?;
    write_frames(writer, channels)?;
    Ok(cursor.into_inner())
}

/// Writes 16 bit PCM channels to a WAV file.
pub fn write_wav(
    path: &Path,
    channels: &[Vec<i16>],
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let writer = WavWriter::new(file, spec(channels.len(), sample_rate, 16))?;
    write_frames(writer, channels)
}
