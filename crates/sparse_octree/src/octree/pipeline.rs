//! End-to-end bake: volume → intermediate pool → compact octree.
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌─────────────────┐
//! │ VolumeSource ├────►│ SparseOctreeBuilder ├────►│ OctreeCompactor │
//! └──────────────┘     └─────────────────────┘     └─────────────────┘
//!   is_solid(i)          IntermediatePool            CompactOctree
//!   (Morton order)       (pruned, pre-order)         (+ BuildStats)
//! ```

use web_time::Instant;

use crate::error::Result;
use crate::metrics::BuildStats;
use crate::noise::HeightmapVolume;
use crate::volume::VolumeSource;

use super::builder::build_pool;
use super::compact::CompactOctree;
use super::compactor::OctreeCompactor;
use super::config::BuildConfig;

/// Result of one bake.
#[derive(Clone, Debug)]
pub struct BuildOutput {
  pub octree: CompactOctree,
  pub stats: BuildStats,
}

/// Build and compact an octree over `source`.
///
/// The config is validated before the first voxel is sampled.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::build_octree"))]
pub fn build_octree<S: VolumeSource + ?Sized>(
  config: &BuildConfig,
  source: &mut S,
) -> Result<BuildOutput> {
  config.validate()?;
  let compactor = OctreeCompactor::new(config.near_delta_bits)?;

  let start = Instant::now();
  let (pool, builder_stats) = build_pool(source, config.depth)?;
  let build_us = start.elapsed().as_micros() as u64;

  let start = Instant::now();
  let octree = compactor.compact(&pool)?;
  let compact_us = start.elapsed().as_micros() as u64;

  let stats = BuildStats {
    build_us,
    compact_us,
    ..BuildStats::collect(&pool, &builder_stats, &octree)
  };
  stats.log_summary();

  Ok(BuildOutput { octree, stats })
}

/// Bake the heightmap terrain described by `config.heightmap`.
pub fn build_heightmap_octree(config: &BuildConfig) -> Result<BuildOutput> {
  let mut volume = HeightmapVolume::new(config.heightmap);
  let output = build_octree(config, &mut volume)?;
  log::debug!("heightmap columns cached: {}", volume.cached_columns());
  Ok(output)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
