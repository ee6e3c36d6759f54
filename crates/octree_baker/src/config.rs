//! Configuration parsing for octree baking.

use anyhow::{Context, Result};
use serde::Deserialize;
use sparse_octree::{BuildConfig, HeightmapConfig, NEAR_DELTA_BITS};
use std::path::{Path, PathBuf};

/// Root configuration for one bake.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Output file, relative to the config file's directory.
	pub output: PathBuf,
	/// Tree depth; the volume is a `2^depth` cube.
	pub depth: u32,
	/// Width of the direct child delta (defaults to 15).
	#[serde(default = "default_near_delta_bits")]
	pub near_delta_bits: u32,
	/// Terrain parameters.
	#[serde(default)]
	pub heightmap: HeightmapConfig,
}

fn default_near_delta_bits() -> u32 {
	NEAR_DELTA_BITS
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.output.as_os_str().is_empty() {
			anyhow::bail!("output path must not be empty");
		}
		config
			.build_config()
			.validate()
			.context("Invalid octree parameters")?;

		Ok(config)
	}

	/// Library configuration for this bake.
	pub fn build_config(&self) -> BuildConfig {
		BuildConfig {
			depth: self.depth,
			near_delta_bits: self.near_delta_bits,
			heightmap: self.heightmap,
		}
	}
}
