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
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::note::note_name;
use crate::resample::ResamplerKind;
use crate::segment::CycleSearch;
use crate::table::TableFormat;

pub const DEFAULT_ATTACK_MS: u32 = 45;
pub const DEFAULT_LOOP_START_MS: u32 = 200;
/// C4.
pub const DEFAULT_BASE_FREQUENCY_HZ: f64 = 261.63;
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_ATTACK_NAME: &str = "k_attack_samples";
pub const DEFAULT_LOOP_NAME: &str = "k_loop_samples";
pub const DEFAULT_OUTPUT_FILE: &str = "samples_data.h";

/// Everything an extraction run needs. Deserializable from YAML/TOML files and
/// `LOOPTABLE_*` environment variables; unset fields take their defaults.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    /// The WAV file to read.
    pub input: Option<PathBuf>,

    /// The header to write. Defaults to samples_data.h next to the input.
    pub output: Option<PathBuf>,

    /// Length of the attack segment in milliseconds.
    pub attack_ms: u32,

    /// Where the loop cycle search begins, in milliseconds.
    pub loop_start_ms: u32,

    /// Fundamental frequency of the recorded note in Hz.
    pub base_frequency_hz: f64,

    /// Note label for the header comment. Derived from the base frequency when unset.
    pub note: Option<String>,

    /// Playback sample rate of the target in Hz.
    pub sample_rate: u32,

    /// Resampler used to reach the target sample rate.
    pub resampler: ResamplerKind,

    /// C identifier of the attack table.
    pub attack_name: String,

    /// C identifier of the loop table.
    pub loop_name: String,

    /// Table layout.
    pub table: TableFormat,

    /// Crossing search tuning.
    pub cycle_search: CycleSearch,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            input: None,
            output: None,
            attack_ms: DEFAULT_ATTACK_MS,
            loop_start_ms: DEFAULT_LOOP_START_MS,
            base_frequency_hz: DEFAULT_BASE_FREQUENCY_HZ,
            note: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            resampler: ResamplerKind::default(),
            attack_name: DEFAULT_ATTACK_NAME.to_string(),
            loop_name: DEFAULT_LOOP_NAME.to_string(),
            table: TableFormat::default(),
            cycle_search: CycleSearch::default(),
        }
    }
}

impl ExtractConfig {
    /// Checks every value that would otherwise fail deep inside the pipeline.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.sample_rate == 0 {
            return Err(ExtractError::InvalidSampleRate(self.sample_rate));
        }
        if !self.base_frequency_hz.is_finite() || self.base_frequency_hz <= 0.0 {
            return Err(ExtractError::InvalidConfig(format!(
                "base_frequency_hz must be a positive number, got {}",
                self.base_frequency_hz
            )));
        }
        for name in [&self.attack_name, &self.loop_name] {
            if !is_c_identifier(name) {
                return Err(ExtractError::InvalidConfig(format!(
                    "table name {:?} is not a valid C identifier",
                    name
                )));
            }
        }
        if self.attack_name == self.loop_name {
            return Err(ExtractError::InvalidConfig(format!(
                "attack and loop tables share the name {}",
                self.attack_name
            )));
        }
        self.table.validate()?;
        self.cycle_search.validate()?;
        Ok(())
    }

    /// The label printed next to the base frequency, e.g. "C4".
    pub fn note_label(&self) -> String {
        self.note
            .clone()
            .or_else(|| note_name(self.base_frequency_hz))
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// The header path: the configured output, or samples_data.h beside the input.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => input.with_file_name(DEFAULT_OUTPUT_FILE),
        }
    }
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
