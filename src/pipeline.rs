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

//! The extraction pipeline: decode, cut, resample, render, write.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::audio::sample_source::{SampleSource, SourceInfo, WavSampleSource};
use crate::audio::SampleBuffer;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::resample::resample_with;
use crate::segment::{extract_attack, select_loop_cycle_with, CycleOrigin, LoopCycle};
use crate::table::HeaderDocument;
use crate::util::storage_kib;

/// Bytes per emitted sample (f32).
const BYTES_PER_SAMPLE: usize = 4;

/// Figures describing one extraction, for display by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub source_name: String,
    pub source: SourceInfo,
    pub source_sample_rate: u32,
    pub duration_secs: f64,

    pub attack_ms: u32,
    pub attack_samples: usize,
    pub attack_peak: f32,

    pub loop_start_ms: u32,
    pub loop_origin: CycleOrigin,
    pub loop_samples: usize,
    pub loop_peak: f32,
    pub loop_frequency_hz: Option<f64>,
    pub target_cycle_len: usize,
    pub base_frequency_hz: f64,
    pub note: String,

    pub output_sample_rate: u32,
    pub attack_output_samples: usize,
    pub loop_output_samples: usize,
    pub memory_bytes: usize,

    /// Where the header was written, when it was.
    pub output_path: Option<PathBuf>,
}

impl ExtractionReport {
    pub fn total_output_samples(&self) -> usize {
        self.attack_output_samples + self.loop_output_samples
    }
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== WAV File Analysis ===")?;
        writeln!(f, "Source: {}", self.source_name)?;
        writeln!(f, "Sample Rate: {} Hz", self.source_sample_rate)?;
        writeln!(f, "Channels: {}", self.source.channels)?;
        writeln!(f, "Total Samples: {}", self.source.frames)?;
        writeln!(f, "Duration: {:.3} seconds", self.duration_secs)?;
        writeln!(f, "Peak Level: {:.3}", self.source.peak)?;
        writeln!(f)?;

        writeln!(f, "=== Attack Extraction ===")?;
        writeln!(
            f,
            "Attack Length: {}ms = {} samples",
            self.attack_ms, self.attack_samples
        )?;
        writeln!(f, "Attack Peak: {:.3}", self.attack_peak)?;
        writeln!(f)?;

        writeln!(f, "=== Loop Cycle Extraction ===")?;
        writeln!(f, "Loop Start Search: {}ms", self.loop_start_ms)?;
        match self.loop_origin {
            CycleOrigin::Crossings(selection) => writeln!(
                f,
                "Found cycle from sample {} to {}",
                selection.start, selection.end
            )?,
            CycleOrigin::Fallback { start, len } => writeln!(
                f,
                "Not enough zero crossings, took {} samples from sample {}",
                len, start
            )?,
        }
        writeln!(
            f,
            "Loop Cycle Length: {} samples (expected {})",
            self.loop_samples, self.target_cycle_len
        )?;
        if let Some(frequency) = self.loop_frequency_hz {
            writeln!(
                f,
                "Loop Frequency: {:.2} Hz (base {} at {:.2} Hz)",
                frequency, self.note, self.base_frequency_hz
            )?;
        }
        writeln!(f, "Loop Peak: {:.3}", self.loop_peak)?;
        writeln!(f)?;

        writeln!(f, "=== Resampling to {} Hz ===", self.output_sample_rate)?;
        writeln!(
            f,
            "Attack: {} -> {} samples",
            self.attack_samples, self.attack_output_samples
        )?;
        writeln!(
            f,
            "Loop: {} -> {} samples",
            self.loop_samples, self.loop_output_samples
        )?;
        writeln!(f, "Total: {} samples", self.total_output_samples())?;
        write!(
            f,
            "Memory: ~{} bytes ({})",
            self.memory_bytes,
            storage_kib(self.total_output_samples())
        )?;

        if let Some(path) = &self.output_path {
            write!(f, "\n\nGenerated: {}", path.display())?;
        }
        Ok(())
    }
}

/// The segments cut from a source, before and after resampling.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub attack: SampleBuffer,
    pub loop_cycle: LoopCycle,
    pub attack_output: SampleBuffer,
    pub loop_output: SampleBuffer,
    pub report: ExtractionReport,
}

impl Extraction {
    /// Renders the C header for this extraction.
    pub fn render_header(&self, config: &ExtractConfig) -> String {
        HeaderDocument {
            source_name: &self.report.source_name,
            note_label: &self.report.note,
            base_frequency_hz: config.base_frequency_hz,
            attack_ms: config.attack_ms,
            attack_name: &config.attack_name,
            loop_name: &config.loop_name,
            format: &config.table,
        }
        .render(&self.attack_output, &self.loop_output)
    }
}

/// Runs the extraction on an already opened source.
///
/// Fails with `InsufficientData` when the attack would run past the end of the
/// decoded samples, or when the loop search would start at or past the end.
pub fn extract<S: SampleSource>(
    source: &mut S,
    config: &ExtractConfig,
) -> Result<Extraction, ExtractError> {
    config.validate()?;

    let decoded = source.read_mono()?;
    let buffer = &decoded.buffer;

    info!(
        source = source.name(),
        sample_rate = buffer.sample_rate(),
        samples = buffer.len(),
        duration_secs = buffer.duration().as_secs_f64(),
        peak = decoded.info.peak,
        "Decoded source"
    );

    let attack_len = buffer.ms_to_samples(config.attack_ms);
    if attack_len > buffer.len() {
        return Err(ExtractError::InsufficientData {
            what: "attack",
            requested: attack_len,
            available: buffer.len(),
        });
    }

    let loop_start = buffer.ms_to_samples(config.loop_start_ms);
    if loop_start >= buffer.len() {
        return Err(ExtractError::InsufficientData {
            what: "loop search start",
            requested: loop_start + 1,
            available: buffer.len(),
        });
    }

    let attack = extract_attack(buffer, config.attack_ms);
    info!(
        attack_ms = config.attack_ms,
        samples = attack.len(),
        peak = attack.peak(),
        "Extracted attack"
    );

    let loop_cycle = select_loop_cycle_with(
        buffer,
        config.loop_start_ms,
        config.base_frequency_hz,
        &config.cycle_search,
    )?;
    info!(
        start = loop_cycle.start(),
        samples = loop_cycle.samples.len(),
        frequency_hz = loop_cycle.frequency_hz().unwrap_or_default(),
        "Extracted loop cycle"
    );

    let attack_output = resample_with(&attack, config.sample_rate, config.resampler)?;
    let loop_output = resample_with(&loop_cycle.samples, config.sample_rate, config.resampler)?;
    info!(
        target_rate = config.sample_rate,
        resampler = %config.resampler,
        attack_samples = attack_output.len(),
        loop_samples = loop_output.len(),
        "Resampled segments"
    );

    let report = ExtractionReport {
        source_name: source.name().to_string(),
        source: decoded.info.clone(),
        source_sample_rate: buffer.sample_rate(),
        duration_secs: buffer.duration().as_secs_f64(),
        attack_ms: config.attack_ms,
        attack_samples: attack.len(),
        attack_peak: attack.peak(),
        loop_start_ms: config.loop_start_ms,
        loop_origin: loop_cycle.origin,
        loop_samples: loop_cycle.samples.len(),
        loop_peak: loop_cycle.samples.peak(),
        loop_frequency_hz: loop_cycle.frequency_hz(),
        target_cycle_len: loop_cycle.target_cycle_len,
        base_frequency_hz: config.base_frequency_hz,
        note: config.note_label(),
        output_sample_rate: config.sample_rate,
        attack_output_samples: attack_output.len(),
        loop_output_samples: loop_output.len(),
        memory_bytes: (attack_output.len() + loop_output.len()) * BYTES_PER_SAMPLE,
        output_path: None,
    };

    Ok(Extraction {
        attack,
        loop_cycle,
        attack_output,
        loop_output,
        report,
    })
}

/// Reads the configured input file, extracts, and writes the header.
///
/// Everything is computed before the output is touched, and the header is written
/// to a temporary file that replaces the destination only once complete.
pub fn run(config: &ExtractConfig) -> Result<ExtractionReport, ExtractError> {
    let input = config
        .input
        .as_deref()
        .ok_or_else(|| ExtractError::InvalidConfig("no input file given".to_string()))?;
    let output = config.output_path(input);

    // The source, and with it the input file handle, is dropped at the end of this block.
    let extraction = {
        let mut source = WavSampleSource::from_file(input)?;
        extract(&mut source, config)?
    };

    write_atomically(&output, &extraction.render_header(config))?;
    info!(path = ?output, "Wrote sample tables");

    let mut report = extraction.report;
    report.output_path = Some(output);
    Ok(report)
}

/// Writes `contents` to `path` through a temporary file in the same directory.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), ExtractError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| ExtractError::Io(e.error))?;
    Ok(())
}
