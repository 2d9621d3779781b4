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
use std::path::Path;

use config::{Config, Environment, File};
use tracing::debug;

use crate::error::ExtractError;

pub mod extract;

pub use extract::ExtractConfig;

/// Prefix of environment variables that override config values, e.g. LOOPTABLE_ATTACK_MS.
pub const ENV_PREFIX: &str = "LOOPTABLE";

/// Loads the extraction config. Later layers override earlier ones:
/// built-in defaults, then the optional config file (YAML, TOML or JSON by
/// extension), then `LOOPTABLE_*` environment variables. Nested values use a double
/// underscore, e.g. LOOPTABLE_TABLE__VALUES_PER_ROW.
pub fn load(file: Option<&Path>) -> Result<ExtractConfig, ExtractError> {
    build(file, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build(file: Option<&Path>, environment: Environment) -> Result<ExtractConfig, ExtractError> {
    let mut builder = Config::builder();
    if let Some(file) = file {
        debug!(path = ?file, "Loading config file");
        builder = builder.add_source(File::from(file));
    }

    let config = builder.add_source(environment).build()?;
    Ok(config.try_deserialize::<ExtractConfig>()?)
}
