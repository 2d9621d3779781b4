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

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use looptable::audio::sample_source::decode_wav_file;
use looptable::config;
use looptable::resample::ResamplerKind;
use looptable::segment::{select_loop_cycle_with, CycleOrigin};
use looptable::table::parse_tables;
use looptable::util::filename_display;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Extracts attack and loop samples from a recorded note as C tables."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extracts the attack and a loop cycle from a WAV file and writes a C header.
    Extract {
        /// The 16 bit PCM WAV file to read.
        input: PathBuf,
        /// The header to write. Defaults to samples_data.h next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// A YAML, TOML or JSON file with extraction settings.
        #[arg(short, long = "config")]
        config_file: Option<PathBuf>,
        /// Length of the attack segment in milliseconds.
        #[arg(long)]
        attack_ms: Option<u32>,
        /// Where the loop cycle search starts, in milliseconds.
        #[arg(long)]
        loop_start_ms: Option<u32>,
        /// The fundamental frequency of the recorded note in Hz.
        #[arg(long)]
        base_frequency: Option<f64>,
        /// The playback sample rate of the emitted tables.
        #[arg(long)]
        sample_rate: Option<u32>,
        /// The resampler used to convert to the playback rate.
        #[arg(long, value_enum)]
        resampler: Option<ResamplerKind>,
        /// Print the extraction report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Lists the sample tables in a generated header.
    Inspect {
        /// The header file to read.
        header: PathBuf,
        /// Print the tables as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Prints the rising zero crossings the loop search finds.
    Crossings {
        /// The 16 bit PCM WAV file to read.
        input: PathBuf,
        /// Where the search starts, in milliseconds.
        #[arg(long)]
        start_ms: Option<u32>,
        /// The fundamental frequency of the recorded note in Hz.
        #[arg(long)]
        base_frequency: Option<f64>,
        /// A YAML, TOML or JSON file with extraction settings.
        #[arg(short, long = "config")]
        config_file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CrossingsReport {
    source: String,
    sample_rate: u32,
    start_sample: usize,
    target_cycle_len: usize,
    min_distance: usize,
    crossings: Vec<usize>,
    origin: CycleOrigin,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            config_file,
            attack_ms,
            loop_start_ms,
            base_frequency,
            sample_rate,
            resampler,
            json,
        } => {
            let mut extract_config = config::load(config_file.as_deref())?;

            // Command line flags win over the file and environment.
            extract_config.input = Some(input);
            if output.is_some() {
                extract_config.output = output;
            }
            if let Some(attack_ms) = attack_ms {
                extract_config.attack_ms = attack_ms;
            }
            if let Some(loop_start_ms) = loop_start_ms {
                extract_config.loop_start_ms = loop_start_ms;
            }
            if let Some(base_frequency) = base_frequency {
                extract_config.base_frequency_hz = base_frequency;
            }
            if let Some(sample_rate) = sample_rate {
                extract_config.sample_rate = sample_rate;
            }
            if let Some(resampler) = resampler {
                extract_config.resampler = resampler;
            }

            let report = looptable::run(&extract_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Commands::Inspect { header, json } => {
            let content = std::fs::read_to_string(&header)?;
            let tables = parse_tables(&content)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
                return Ok(());
            }

            if tables.is_empty() {
                println!("No tables found in {}.", filename_display(&header));
                return Ok(());
            }

            println!("Tables (count: {}):", tables.len());
            for table in tables.iter() {
                let declared = match table.declared_len {
                    Some(len) => len.to_string(),
                    None => "none".to_string(),
                };
                println!(
                    "- {} (values: {}, declared length: {}, peak: {:.3}){}",
                    table.name,
                    table.values.len(),
                    declared,
                    table.peak(),
                    if table.is_consistent() {
                        ""
                    } else {
                        " LENGTH MISMATCH"
                    }
                );
            }
        }
        Commands::Crossings {
            input,
            start_ms,
            base_frequency,
            config_file,
        } => {
            let extract_config = config::load(config_file.as_deref())?;
            let start_ms = start_ms.unwrap_or(extract_config.loop_start_ms);
            let base_frequency = base_frequency.unwrap_or(extract_config.base_frequency_hz);

            let decoded = decode_wav_file(&input)?;
            let loop_cycle = select_loop_cycle_with(
                &decoded.buffer,
                start_ms,
                base_frequency,
                &extract_config.cycle_search,
            )?;

            let report = CrossingsReport {
                source: filename_display(&input).to_string(),
                sample_rate: decoded.buffer.sample_rate(),
                start_sample: decoded.buffer.ms_to_samples(start_ms),
                target_cycle_len: loop_cycle.target_cycle_len,
                min_distance: loop_cycle.min_distance,
                crossings: loop_cycle.crossings,
                origin: loop_cycle.origin,
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
