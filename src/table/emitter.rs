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
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::error::ExtractError;

const DEFAULT_VALUES_PER_ROW: usize = 8;
const DEFAULT_DECIMALS: usize = 6;

/// Upper bound on printed decimals; f32 carries no more than this.
const MAX_DECIMALS: usize = 9;

/// Layout of an emitted table. Purely cosmetic apart from the precision.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TableFormat {
    /// Values printed per line.
    pub values_per_row: usize,
    /// Digits after the decimal point.
    pub decimals: usize,
}

impl Default for TableFormat {
    fn default() -> Self {
        TableFormat {
            values_per_row: DEFAULT_VALUES_PER_ROW,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl TableFormat {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.values_per_row == 0 {
            return Err(ExtractError::InvalidConfig(
                "values_per_row must be at least 1".to_string(),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ExtractError::InvalidConfig(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }
}

/// Renders the buffer as a `const float` array named `name` followed by a
/// `const uint32_t <name>_len` holding the sample count, using the default layout.
pub fn emit(buffer: &SampleBuffer, name: &str) -> String {
    emit_with(buffer.samples(), name, &TableFormat::default())
}

/// Renders samples as a named C array with the given layout.
pub fn emit_with(samples: &[f32], name: &str, format: &TableFormat) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "const float {}[] = {{", name);
    for row in samples.chunks(format.values_per_row.max(1)) {
        let values = row
            .iter()
            .map(|value| format!("{:.*}f", format.decimals, value))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "    {},", values);
    }
    out.push_str("};\n");
    let _ = write!(out, "const uint32_t {}_len = {};", name, samples.len());

    out
}
