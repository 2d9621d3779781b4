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

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference pitch of A4 (MIDI note 69).
const A4_HZ: f64 = 440.0;
const A4_MIDI: f64 = 69.0;

/// Returns the MIDI note number nearest to `frequency_hz`, if it is in the MIDI range.
pub fn nearest_midi_note(frequency_hz: f64) -> Option<u8> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return None;
    }

    let note = (A4_MIDI + 12.0 * (frequency_hz / A4_HZ).log2()).round();
    if (0.0..=127.0).contains(&note) {
        Some(note as u8)
    } else {
        None
    }
}

/// Names a MIDI note in scientific pitch notation, e.g. 60 -> "C4".
pub fn midi_note_name(note: u8) -> String {
    let octave = i32::from(note) / 12 - 1;
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], octave)
}

/// Names the equal-tempered note nearest to `frequency_hz`.
pub fn note_name(frequency_hz: f64) -> Option<String> {
    nearest_midi_note(frequency_hz).map(midi_note_name)
}
