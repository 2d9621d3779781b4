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

//! Extracts an attack segment and a single loopable cycle from a recorded note,
//! resamples both to a playback rate, and renders them as C sample tables.
//!
//! The usual entry point is [`pipeline::run`], which takes an [`ExtractConfig`] and
//! writes the header. [`pipeline::extract`] runs the same steps against any
//! [`SampleSource`] without touching the filesystem.

pub mod audio;
pub mod config;
pub mod error;
pub mod note;
pub mod pipeline;
pub mod resample;
pub mod segment;
pub mod table;
pub mod util;

#[cfg(test)]
mod testutil;

pub use audio::sample_source::SampleSource;
pub use audio::SampleBuffer;
pub use config::ExtractConfig;
pub use error::ExtractError;
pub use pipeline::{extract, run, Extraction, ExtractionReport};
