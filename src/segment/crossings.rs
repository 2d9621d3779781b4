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
use crate::audio::SampleBuffer;

/// Returns true when the signal rises through zero between `current` and `next`.
#[inline]
fn is_rising_crossing(current: f32, next: f32) -> bool {
    current <= 0.0 && next > 0.0
}

/// Finds up to `max_count` rising zero crossings at or after `start_index`.
///
/// A crossing at `i` means `sample[i] <= 0` and `sample[i + 1] > 0`. A crossing closer
/// than `min_distance` samples to the previously accepted one is skipped. The first
/// crossing found is always accepted. Returned indices are in ascending order.
pub fn find_crossings(
    buffer: &SampleBuffer,
    start_index: usize,
    max_count: usize,
    min_distance: usize,
) -> Vec<usize> {
    let mut crossings = Vec::new();
    if max_count == 0 {
        return crossings;
    }

    let mut last_crossing: Option<usize> = None;
    for (i, pair) in buffer.samples().windows(2).enumerate().skip(start_index) {
        if !is_rising_crossing(pair[0], pair[1]) {
            continue;
        }

        if last_crossing.is_some_and(|last| i - last < min_distance) {
            continue;
        }

        crossings.push(i);
        last_crossing = Some(i);
        if crossings.len() >= max_count {
            break;
        }
    }

    crossings
}
