//! Sparse voxel octree baker.
//!
//! Builds the heightmap terrain described by a TOML config and writes the
//! compact octree as a flat file of little-endian `u32` words. The file is
//! the GPU storage buffer verbatim; the root node is word 0.
//!
//! Word layout (high to low): leaf mask 8 | valid mask 8 | delta 15 | far 1

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use config::Config;

/// Sparse voxel octree baker.
#[derive(Parser, Debug)]
#[command(name = "bake_octree")]
#[command(about = "Bakes procedural terrain into a GPU-ready sparse voxel octree")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output file (default: `output` from the config, relative to it).
	#[arg(short, long)]
	output: Option<PathBuf>,
}

fn main() -> Result<()> {
	env_logger::init();
	let args = Args::parse();

	println!("Loading config from: {}", args.config.display());
	let config = Config::load(&args.config)?;

	let output_path = args.output.unwrap_or_else(|| {
		args.config
			.parent()
			.unwrap_or(Path::new("."))
			.join(&config.output)
	});

	let build = config.build_config();
	println!(
		"Baking {}³ volume (depth {}, {}-bit deltas)",
		build.side(),
		build.depth,
		build.near_delta_bits
	);

	let output = sparse_octree::build_heightmap_octree(&build).context("Building octree")?;
	let stats = output.stats;

	if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
	}
	std::fs::write(&output_path, output.octree.to_le_bytes())
		.with_context(|| format!("Failed to write {}", output_path.display()))?;

	println!("  ✓ {}", output_path.display());
	println!(
		"    {} nodes + {} far pointers = {} bytes",
		stats.pool_nodes,
		stats.far_slots,
		stats.byte_size()
	);
	println!(
		"    build {:.2}ms, compact {:.2}ms",
		stats.build_us as f64 / 1000.0,
		stats.compact_us as f64 / 1000.0
	);
	log::debug!("{}", stats);

	Ok(())
}
