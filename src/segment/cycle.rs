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

//! Loop cycle selection.
//!
//! The expected cycle length follows from the note's base frequency. The search
//! collects a handful of well-spaced rising zero crossings after the loop start and
//! keeps the adjacent pair whose distance is closest to that expected length.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::crossings::find_crossings;
use crate::audio::SampleBuffer;
use crate::error::ExtractError;

/// Default number of crossings collected per search.
pub const DEFAULT_MAX_CROSSINGS: usize = 10;

/// Default crossing spacing, as a fraction of the expected cycle length.
pub const DEFAULT_MIN_DISTANCE_FACTOR: f64 = 0.8;

/// Tuning for the crossing search.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CycleSearch {
    /// Number of crossings to collect before stopping.
    pub max_crossings: usize,

    /// Crossings closer than `expected cycle length * min_distance_factor` to the
    /// previous one are ignored.
    pub min_distance_factor: f64,
}

impl Default for CycleSearch {
    fn default() -> Self {
        CycleSearch {
            max_crossings: DEFAULT_MAX_CROSSINGS,
            min_distance_factor: DEFAULT_MIN_DISTANCE_FACTOR,
        }
    }
}

impl CycleSearch {
    /// Checks that the search can produce a pair of crossings at all.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.max_crossings < 2 {
            return Err(ExtractError::InvalidConfig(format!(
                "max_crossings must be at least 2, got {}",
                self.max_crossings
            )));
        }
        if !self.min_distance_factor.is_finite() || self.min_distance_factor < 0.0 {
            return Err(ExtractError::InvalidConfig(format!(
                "min_distance_factor must be a non-negative number, got {}",
                self.min_distance_factor
            )));
        }
        Ok(())
    }
}

/// A pair of rising zero crossings bounding one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSelection {
    pub start: usize,
    pub end: usize,
}

impl CycleSelection {
    /// Length of the cycle in samples.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// How the loop cycle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOrigin {
    /// Bounded by a pair of zero crossings.
    Crossings(CycleSelection),
    /// Not enough crossings were found, so a raw slice of the expected length was taken.
    Fallback { start: usize, len: usize },
}

/// The loop cycle and the parameters that produced it.
#[derive(Debug, Clone)]
pub struct LoopCycle {
    pub samples: SampleBuffer,
    pub origin: CycleOrigin,
    /// Expected cycle length in samples at the source rate.
    pub target_cycle_len: usize,
    /// Minimum spacing that was enforced between crossings.
    pub min_distance: usize,
    /// Every crossing the search accepted.
    pub crossings: Vec<usize>,
}

impl LoopCycle {
    /// Start of the cycle within the source buffer.
    pub fn start(&self) -> usize {
        match self.origin {
            CycleOrigin::Crossings(selection) => selection.start,
            CycleOrigin::Fallback { start, .. } => start,
        }
    }

    /// Frequency the cycle plays at when looped at its own sample rate.
    pub fn frequency_hz(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(f64::from(self.samples.sample_rate()) / self.samples.len() as f64)
    }
}

/// Expected cycle length in samples for a note at `base_frequency_hz`, truncated.
pub fn target_cycle_len(sample_rate: u32, base_frequency_hz: f64) -> Result<usize, ExtractError> {
    if !base_frequency_hz.is_finite() || base_frequency_hz <= 0.0 {
        return Err(ExtractError::InvalidConfig(format!(
            "base frequency must be a positive number, got {}",
            base_frequency_hz
        )));
    }

    let len = (f64::from(sample_rate) / base_frequency_hz) as usize;
    if len == 0 {
        return Err(ExtractError::InvalidConfig(format!(
            "base frequency {}Hz is above the sample rate {}Hz",
            base_frequency_hz, sample_rate
        )));
    }

    Ok(len)
}

/// Picks the adjacent crossing pair whose distance is closest to `target_len`.
/// The earliest pair wins ties. Returns None with fewer than two crossings.
pub fn best_pair(crossings: &[usize], target_len: usize) -> Option<CycleSelection> {
    let mut best: Option<(CycleSelection, usize)> = None;

    for pair in crossings.windows(2) {
        let selection = CycleSelection {
            start: pair[0],
            end: pair[1],
        };
        let diff = selection.len().abs_diff(target_len);

        // Strictly better only, so the first of equal pairs is kept.
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((selection, diff));
        }
    }

    best.map(|(selection, _)| selection)
}

/// Selects one loopable cycle starting the search `start_ms` into the buffer, using
/// the default search tuning.
pub fn select_loop_cycle(
    buffer: &SampleBuffer,
    start_ms: u32,
    base_frequency_hz: f64,
) -> Result<LoopCycle, ExtractError> {
    select_loop_cycle_with(buffer, start_ms, base_frequency_hz, &CycleSearch::default())
}

/// Selects one loopable cycle with explicit search tuning.
///
/// The result is always a contiguous slice of `buffer`. When fewer than two crossings
/// are found the slice starts at the search start and has the expected cycle length,
/// clamped to the end of the buffer.
pub fn select_loop_cycle_with(
    buffer: &SampleBuffer,
    start_ms: u32,
    base_frequency_hz: f64,
    search: &CycleSearch,
) -> Result<LoopCycle, ExtractError> {
    search.validate()?;

    let start_sample = buffer.ms_to_samples(start_ms);
    let target_len = target_cycle_len(buffer.sample_rate(), base_frequency_hz)?;
    let min_distance = (target_len as f64 * search.min_distance_factor) as usize;

    debug!(
        start_sample,
        target_len, min_distance, "Searching for loop cycle crossings"
    );

    let crossings = find_crossings(buffer, start_sample, search.max_crossings, min_distance);

    let (samples, origin) = match best_pair(&crossings, target_len) {
        Some(selection) => {
            debug!(
                start = selection.start,
                end = selection.end,
                len = selection.len(),
                "Found loop cycle"
            );
            (
                buffer.slice(selection.start, selection.len()),
                CycleOrigin::Crossings(selection),
            )
        }
        None => {
            warn!(
                crossings = crossings.len(),
                start_sample, target_len, "Not enough zero crossings, using expected length"
            );
            let samples = buffer.slice(start_sample, target_len);
            let len = samples.len();
            (
                samples,
                CycleOrigin::Fallback {
                    start: start_sample,
                    len,
                },
            )
        }
    };

    Ok(LoopCycle {
        samples,
        origin,
        target_cycle_len: target_len,
        min_distance,
        crossings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sine;

    #[test]
    fn test_target_cycle_len() {
        assert_eq!(target_cycle_len(44100, 261.63).unwrap(), 168);
        assert_eq!(target_cycle_len(48000, 261.63).unwrap(), 183);
        assert_eq!(target_cycle_len(48000, 1000.0).unwrap(), 48);
        assert!(target_cycle_len(48000, 0.0).is_err());
        assert!(target_cycle_len(48000, -5.0).is_err());
        assert!(target_cycle_len(48000, f64::NAN).is_err());
        assert!(target_cycle_len(48000, 96000.0).is_err());
    }

    #[test]
    fn test_best_pair_picks_closest() {
        let crossings = [0, 90, 200, 300, 420];
        // Distances: 90, 110, 100, 120.
        assert_eq!(
            best_pair(&crossings, 100),
            Some(CycleSelection {
                start: 200,
                end: 300
            })
        );
    }

    #[test]
    fn test_best_pair_first_wins_ties() {
        // Distances: 95, 105, 95, 105 against a target of 100.
        let crossings = [10, 105, 210, 305, 410];
        assert_eq!(
            best_pair(&crossings, 100),
            Some(CycleSelection { start: 10, end: 105 })
        );

        // 105 and 95 are equally far; the earlier pair stays.
        let crossings = [0, 105, 200];
        assert_eq!(
            best_pair(&crossings, 100),
            Some(CycleSelection { start: 0, end: 105 })
        );
    }

    #[test]
    fn test_best_pair_needs_two_crossings() {
        assert_eq!(best_pair(&[], 100), None);
        assert_eq!(best_pair(&[42], 100), None);
    }

    #[test]
    fn test_selection_is_optimal() {
        let samples: Vec<f32> = sine(261.63, 44100, 1.0, 0.9)
            .iter()
            .zip(sine(523.25, 44100, 1.0, 0.4).iter())
            .map(|(a, b)| a + b)
            .collect();
        let buffer = SampleBuffer::new(samples, 44100).unwrap();

        let cycle = select_loop_cycle(&buffer, 200, 261.63).unwrap();
        let selection = match cycle.origin {
            CycleOrigin::Crossings(selection) => selection,
            other => panic!("expected crossings, got {:?}", other),
        };

        let chosen = selection.len().abs_diff(cycle.target_cycle_len);
        for pair in cycle.crossings.windows(2) {
            assert!(chosen <= (pair[1] - pair[0]).abs_diff(cycle.target_cycle_len));
        }
        assert_eq!(cycle.samples.len(), selection.len());
        assert_eq!(cycle.samples.samples(), &buffer.samples()[selection.start..selection.end]);
    }

    #[test]
    fn test_fallback_on_silence() {
        let buffer = SampleBuffer::new(vec![0.0; 44100], 44100).unwrap();

        let cycle = select_loop_cycle(&buffer, 200, 261.63).unwrap();
        assert_eq!(
            cycle.origin,
            CycleOrigin::Fallback {
                start: 8820,
                len: 168
            }
        );
        assert_eq!(cycle.samples.samples(), &buffer.samples()[8820..8820 + 168]);
        assert!(cycle.crossings.is_empty());
    }

    #[test]
    fn test_fallback_with_single_crossing() {
        let mut samples = vec![0.0f32; 1000];
        samples[501] = 0.5;
        let buffer = SampleBuffer::new(samples, 1000).unwrap();

        // Start at 100ms (sample 100), target 100 samples.
        let cycle = select_loop_cycle(&buffer, 100, 10.0).unwrap();
        assert_eq!(cycle.crossings, vec![500]);
        assert_eq!(cycle.origin, CycleOrigin::Fallback { start: 100, len: 100 });
        assert_eq!(cycle.start(), 100);
    }

    #[test]
    fn test_fallback_clamped_at_end() {
        let buffer = SampleBuffer::new(vec![0.0; 150], 1000).unwrap();

        let cycle = select_loop_cycle(&buffer, 100, 10.0).unwrap();
        assert_eq!(cycle.origin, CycleOrigin::Fallback { start: 100, len: 50 });
        assert_eq!(cycle.samples.len(), 50);
    }

    #[test]
    fn test_sine_end_to_end() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 1.0, 0.8), 44100).unwrap();

        let cycle = select_loop_cycle(&buffer, 200, 261.63).unwrap();
        let len = cycle.samples.len();
        assert!((135..=203).contains(&len), "cycle length {}", len);

        let samples = cycle.samples.samples();
        assert!(samples[0] <= 0.0);
        assert!(samples[0].abs() < 0.05);
        assert!(samples[len - 1].abs() < 0.07);

        // The sample after the cycle start is the positive side of the crossing.
        let start = cycle.start();
        assert!(buffer.samples()[start + 1] > 0.0);

        let frequency = cycle.frequency_hz().unwrap();
        assert!((frequency - 261.63).abs() < 5.0, "frequency {}", frequency);
    }

    #[test]
    fn test_min_distance_from_factor() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 0.5, 0.8), 44100).unwrap();

        let cycle = select_loop_cycle(&buffer, 100, 261.63).unwrap();
        assert_eq!(cycle.min_distance, 134);

        let search = CycleSearch {
            max_crossings: 4,
            min_distance_factor: 0.5,
        };
        let cycle = select_loop_cycle_with(&buffer, 100, 261.63, &search).unwrap();
        assert_eq!(cycle.min_distance, 84);
        assert!(cycle.crossings.len() <= 4);
    }

    #[test]
    fn test_loop_cycle_records_its_search() {
        let buffer = SampleBuffer::new(sine(261.63, 44100, 0.5, 0.8), 44100).unwrap();
        let search = CycleSearch::default();

        let cycle = select_loop_cycle_with(&buffer, 150, 261.63, &search).unwrap();
        let expected = find_crossings(&buffer, 6615, search.max_crossings, cycle.min_distance);
        assert_eq!(cycle.crossings, expected);
        assert_eq!(cycle.crossings.len(), 10);
        assert_eq!(
            cycle.origin,
            CycleOrigin::Crossings(best_pair(&expected, cycle.target_cycle_len).unwrap())
        );
    }

    #[test]
    fn test_invalid_search() {
        let buffer = SampleBuffer::new(vec![0.0; 100], 1000).unwrap();
        let search = CycleSearch {
            max_crossings: 1,
            ..Default::default()
        };
        assert!(matches!(
            select_loop_cycle_with(&buffer, 0, 10.0, &search),
            Err(ExtractError::InvalidConfig(_))
        ));
        assert!(matches!(
            select_loop_cycle(&buffer, 0, 0.0),
            Err(ExtractError::InvalidConfig(_))
        ));
    }
}
