use glam::UVec3;

use super::*;
use crate::error::OctreeError;
use crate::noise::HeightmapConfig;
use crate::octree::compactor::compact_pool;
use crate::volume::VolumeFn;

fn small_config(depth: u32) -> BuildConfig {
  BuildConfig {
    depth,
    near_delta_bits: 15,
    heightmap: HeightmapConfig {
      height_scale_log2: depth - 1,
      octaves: 5,
    },
  }
}

// =========================================================================
// Stats
// =========================================================================

#[test]
fn test_stats_describe_output() {
  let output = build_heightmap_octree(&small_config(5)).unwrap();
  let stats = output.stats;

  assert_eq!(stats.depth, 5);
  assert_eq!(stats.voxels_sampled, 1 << 15);
  assert_eq!(stats.compact_slots, output.octree.len());
  assert_eq!(stats.far_slots, output.octree.far_slot_count());
  assert_eq!(stats.pool_nodes + stats.far_slots, stats.compact_slots);
  assert_eq!(stats.byte_size(), output.octree.as_bytes().len());
}

#[test]
fn test_floor_stats() {
  let config = BuildConfig::with_depth(2);
  let output = build_octree(&config, &mut VolumeFn::new(|p: UVec3| p.z == 0)).unwrap();

  assert_eq!(output.stats.pool_nodes, 5);
  assert_eq!(output.stats.compact_slots, 5);
  assert_eq!(output.stats.far_slots, 0);
  // Four upper octants of the root are dropped as empty.
  assert_eq!(output.stats.pruned_empty, 4);
  assert_eq!(output.stats.pruned_solid, 0);
}

// =========================================================================
// Equivalence with the individual stages
// =========================================================================

#[test]
fn test_matches_manual_stages() {
  let config = small_config(6);
  let output = build_heightmap_octree(&config).unwrap();

  let mut volume = HeightmapVolume::new(config.heightmap);
  let (pool, _) = build_pool(&mut volume, config.depth).unwrap();
  let manual = compact_pool(&pool).unwrap();

  assert_eq!(output.octree, manual);
}

#[test]
fn test_narrow_delta_width_is_forwarded() {
  let mut config = small_config(5);
  config.near_delta_bits = 4;
  let narrow = build_heightmap_octree(&config).unwrap();
  let wide = build_heightmap_octree(&small_config(5)).unwrap();

  assert!(narrow.stats.far_slots > 0);
  assert_eq!(wide.stats.far_slots, 0);
  assert_eq!(narrow.stats.pool_nodes, wide.stats.pool_nodes);
}

// =========================================================================
// Validation
// =========================================================================

/// Invalid configs fail before the volume is touched.
#[test]
fn test_invalid_config_samples_nothing() {
  let mut sampled = 0u32;
  let mut source = VolumeFn::new(|_: UVec3| {
    sampled += 1;
    true
  });

  let mut config = BuildConfig::with_depth(3);
  config.near_delta_bits = 2;
  assert!(matches!(
    build_octree(&config, &mut source),
    Err(OctreeError::InvalidDeltaBits { bits: 2, .. })
  ));

  let config = BuildConfig::with_depth(12);
  assert!(matches!(
    build_octree(&config, &mut source),
    Err(OctreeError::InvalidDepth { depth: 12, .. })
  ));

  drop(source);
  assert_eq!(sampled, 0);
}

#[test]
fn test_invalid_heightmap_rejected() {
  let mut config = small_config(3);
  config.heightmap.octaves = 0;
  assert!(matches!(
    build_heightmap_octree(&config),
    Err(OctreeError::InvalidOctaves { octaves: 0, .. })
  ));
}
