//! Build statistics for one octree bake.
//!
//! # Usage
//!
//! ```ignore
//! use sparse_octree::{build_heightmap_octree, BuildConfig};
//!
//! let output = build_heightmap_octree(&BuildConfig::with_depth(8))?;
//! println!("{}", output.stats);
//! ```

use std::fmt;

use crate::octree::{BuilderStats, CompactOctree, IntermediatePool};

/// Counters and timings from [`build_octree`](crate::octree::build_octree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
  /// Tree depth; the volume is a `2^depth` cube.
  pub depth: u32,

  // Construction
  /// Predicate queries issued by the builder.
  pub voxels_sampled: u64,
  /// Nodes retained in the intermediate pool.
  pub pool_nodes: usize,
  /// Internal nodes collapsed into a solid leaf bit.
  pub pruned_solid: u64,
  /// Internal nodes dropped as empty.
  pub pruned_empty: u64,

  // Compaction
  /// Total slots in the compact array (nodes + far pointers).
  pub compact_slots: usize,
  /// Far-pointer slots among `compact_slots`.
  pub far_slots: usize,

  // Timing
  /// Builder time in microseconds.
  pub build_us: u64,
  /// Compactor time in microseconds.
  pub compact_us: u64,
}

impl BuildStats {
  /// Collect counters from the two stages. Timings are left at zero.
  pub fn collect(pool: &IntermediatePool, builder: &BuilderStats, octree: &CompactOctree) -> Self {
    Self {
      depth: pool.depth(),
      voxels_sampled: builder.voxels_sampled,
      pool_nodes: pool.len(),
      pruned_solid: builder.pruned_solid,
      pruned_empty: builder.pruned_empty,
      compact_slots: octree.len(),
      far_slots: octree.far_slot_count(),
      build_us: 0,
      compact_us: 0,
    }
  }

  /// Size of the GPU buffer in bytes (4 per slot).
  #[inline]
  pub fn byte_size(&self) -> usize {
    self.compact_slots * std::mem::size_of::<u32>()
  }

  #[inline]
  pub fn total_us(&self) -> u64 {
    self.build_us + self.compact_us
  }

  /// Share of slots spent on far pointers.
  pub fn far_ratio(&self) -> f64 {
    if self.compact_slots == 0 {
      0.0
    } else {
      self.far_slots as f64 / self.compact_slots as f64
    }
  }

  /// Emit the summary at info level.
  pub fn log_summary(&self) {
    log::info!("{}", self);
  }
}

impl fmt::Display for BuildStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "depth {} ({}³): sampled {} voxels, kept {} nodes (pruned {} solid, {} empty), \
       {} slots ({} far, {} bytes), build {:.2}ms, compact {:.2}ms",
      self.depth,
      1u64 << self.depth,
      self.voxels_sampled,
      self.pool_nodes,
      self.pruned_solid,
      self.pruned_empty,
      self.compact_slots,
      self.far_slots,
      self.byte_size(),
      self.build_us as f64 / 1000.0,
      self.compact_us as f64 / 1000.0,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_byte_size_and_ratio() {
    let stats = BuildStats {
      compact_slots: 200,
      far_slots: 50,
      build_us: 1500,
      compact_us: 500,
      ..Default::default()
    };
    assert_eq!(stats.byte_size(), 800);
    assert_eq!(stats.total_us(), 2000);
    assert!((stats.far_ratio() - 0.25).abs() < f64::EPSILON);
    assert_eq!(BuildStats::default().far_ratio(), 0.0);
  }

  #[test]
  fn test_display_mentions_counts() {
    let stats = BuildStats {
      depth: 3,
      voxels_sampled: 512,
      pool_nodes: 9,
      compact_slots: 9,
      ..Default::default()
    };
    let text = stats.to_string();
    assert!(text.contains("depth 3 (8³)"), "{}", text);
    assert!(text.contains("sampled 512 voxels"), "{}", text);
    assert!(text.contains("36 bytes"), "{}", text);
  }
}
