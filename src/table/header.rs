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
use super::emitter::{emit_with, TableFormat};
use crate::audio::SampleBuffer;

/// A generated C header holding the attack and loop tables.
pub struct HeaderDocument<'a> {
    /// Displayed source file name.
    pub source_name: &'a str,
    /// Note label of the recording, e.g. "C4".
    pub note_label: &'a str,
    pub base_frequency_hz: f64,
    pub attack_ms: u32,
    pub attack_name: &'a str,
    pub loop_name: &'a str,
    pub format: &'a TableFormat,
}

impl HeaderDocument<'_> {
    /// Renders the complete header text.
    pub fn render(&self, attack: &SampleBuffer, loop_cycle: &SampleBuffer) -> String {
        let mut out = String::new();

        out.push_str("/*\n");
        out.push_str(" * Instrument Samples - Auto-generated from WAV\n");
        out.push_str(&format!(" * Source: {}\n", self.source_name));
        out.push_str(&format!(
            " * Base Note: {} ({:.2} Hz)\n",
            self.note_label, self.base_frequency_hz
        ));
        out.push_str(&format!(" * Sample Rate: {} Hz\n", attack.sample_rate()));
        out.push_str(" */\n\n");
        out.push_str("#pragma once\n\n");
        out.push_str("#include <stdint.h>\n\n");

        out.push_str(&format!("// Attack samples (first {}ms)\n", self.attack_ms));
        out.push_str(&emit_with(attack.samples(), self.attack_name, self.format));
        out.push_str("\n\n");

        out.push_str("// Loop cycle samples (single cycle for looping)\n");
        out.push_str(&emit_with(loop_cycle.samples(), self.loop_name, self.format));
        out.push('\n');

        out
    }
}
