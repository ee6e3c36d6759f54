use glam::UVec3;

use super::*;
use crate::noise::{HeightmapConfig, HeightmapVolume};
use crate::volume::VolumeFn;

fn build_fn(depth: u32, predicate: impl FnMut(UVec3) -> bool) -> (IntermediatePool, BuilderStats) {
  let mut source = VolumeFn::new(predicate);
  build_pool(&mut source, depth).expect("valid depth")
}

// =========================================================================
// Depth-1 scenarios
// =========================================================================

/// Solid floor in a 2×2×2 volume: the four z == 0 octants become leaves.
#[test]
fn test_depth_1_floor_only() {
  let (pool, _) = build_fn(1, |p| p.z == 0);

  assert_eq!(pool.len(), 1);
  let root = pool.root();
  assert_eq!(root.valid_mask, 0b0000_1111);
  assert_eq!(root.leaf_mask, 0b0000_1111);
  assert_eq!(root.internal_mask(), 0);
  assert_eq!(root.subtree_size, 0);
}

/// A fully solid root is kept (root exception) with every leaf bit set.
#[test]
fn test_depth_1_all_solid_keeps_root() {
  let (pool, stats) = build_fn(1, |_| true);

  assert_eq!(pool.len(), 1);
  assert_eq!(pool.root().valid_mask, 0xFF);
  assert_eq!(pool.root().leaf_mask, 0xFF);
  assert_eq!(pool.root().subtree_size, 0);
  assert_eq!(stats.pruned_solid, 0, "Root must not count as pruned");
}

/// A fully empty root is kept with clear masks.
#[test]
fn test_depth_1_all_empty_keeps_root() {
  let (pool, stats) = build_fn(1, |_| false);

  assert_eq!(pool.len(), 1);
  assert_eq!(pool.root().valid_mask, 0x00);
  assert_eq!(pool.root().leaf_mask, 0x00);
  assert_eq!(stats.pruned_empty, 0);
}

// =========================================================================
// Pruning soundness
// =========================================================================

/// A solid 2×2×2 block collapses into one leaf bit of the parent.
#[test]
fn test_solid_subtree_collapses_to_leaf_bit() {
  let (pool, stats) = build_fn(2, |p| p.x < 2 && p.y < 2 && p.z < 2);

  assert_eq!(pool.len(), 1, "Only the root should be retained");
  assert_eq!(pool.root().valid_mask, 0b0000_0001);
  assert_eq!(pool.root().leaf_mask, 0b0000_0001);
  assert_eq!(stats.pruned_solid, 1);
  assert_eq!(stats.pruned_empty, 7);
}

/// Solid propagates through several levels without retaining any node.
#[test]
fn test_all_solid_deep_tree_prunes_every_level() {
  let (pool, stats) = build_fn(3, |_| true);

  assert_eq!(pool.len(), 1);
  assert!(pool.root().is_full());
  assert_eq!(stats.pruned_solid, 64 + 8);
  assert_eq!(stats.voxels_sampled, 512);
}

/// Empty propagates the same way.
#[test]
fn test_all_empty_deep_tree_prunes_every_level() {
  let (pool, stats) = build_fn(3, |_| false);

  assert_eq!(pool.len(), 1);
  assert!(pool.root().is_empty());
  assert_eq!(stats.pruned_empty, 64 + 8);
}

/// A floor in a 4³ volume keeps one mixed node per lower octant.
#[test]
fn test_floor_keeps_mixed_children() {
  let (pool, _) = build_fn(2, |p| p.z == 0);

  assert_eq!(pool.len(), 5);
  let root = pool.root();
  assert_eq!(root.valid_mask, 0b0000_1111);
  assert_eq!(root.leaf_mask, 0);
  assert_eq!(root.subtree_size, 4);

  for (rank, (octant, handle)) in root.internal_children().enumerate() {
    assert_eq!(octant as usize, rank);
    assert_eq!(handle as usize, rank + 1);
    let child = pool.node(handle);
    assert_eq!(child.valid_mask, 0b0000_1111);
    assert_eq!(child.leaf_mask, 0b0000_1111);
    assert_eq!(child.subtree_size, 0);
  }
}

// =========================================================================
// Traversal and structure
// =========================================================================

/// Every voxel is queried exactly once, in Morton order.
#[test]
fn test_visits_voxels_in_morton_order() {
  let mut order = Vec::new();
  let mut source = VolumeFn::new(|p: UVec3| {
    order.push(crate::morton::encode(p));
    p.z < 3
  });
  let (_, stats) = build_pool(&mut source, 3).unwrap();
  drop(source);

  assert_eq!(stats.voxels_sampled, 512);
  assert_eq!(order, (0..512).collect::<Vec<_>>());
}

/// Pool is pre-order with consistent subtree sizes.
#[test]
fn test_pool_is_preorder_with_subtree_sizes() {
  let mut volume = HeightmapVolume::new(HeightmapConfig {
    height_scale_log2: 3,
    octaves: 5,
  });
  let (pool, _) = build_pool(&mut volume, 5).unwrap();

  assert!(pool.len() > 1, "Terrain should produce mixed nodes");
  for (index, node) in pool.nodes().iter().enumerate() {
    assert!(node.is_well_formed(), "Node {} malformed", index);
    assert_ne!(node.leaf_mask, 0xFF, "Non-root full node {} retained", index);

    let mut expected_size = 0;
    let mut next = index + 1;
    for (_, handle) in node.internal_children() {
      assert_eq!(handle as usize, next, "Children must follow pre-order");
      let child = pool.node(handle);
      assert!(!child.is_empty(), "Empty node {} retained", handle);
      expected_size += 1 + child.subtree_size;
      next = handle as usize + 1 + child.subtree_size as usize;
    }
    assert_eq!(node.subtree_size, expected_size, "Subtree size of node {}", index);
  }
  assert_eq!(pool.root().subtree_size as usize, pool.len() - 1);
}

/// Same source and depth give identical pools.
#[test]
fn test_build_is_deterministic() {
  let config = HeightmapConfig {
    height_scale_log2: 3,
    octaves: 4,
  };
  let (a, stats_a) = build_pool(&mut HeightmapVolume::new(config), 5).unwrap();
  let (b, stats_b) = build_pool(&mut HeightmapVolume::new(config), 5).unwrap();
  assert_eq!(a, b);
  assert_eq!(stats_a, stats_b);
}

#[test]
fn test_rejects_out_of_range_depth() {
  let mut source = VolumeFn::new(|_: UVec3| true);
  assert_eq!(
    build_pool(&mut source, 0).unwrap_err(),
    OctreeError::InvalidDepth { depth: 0, max: 10 }
  );
  assert_eq!(
    build_pool(&mut source, 11).unwrap_err(),
    OctreeError::InvalidDepth { depth: 11, max: 10 }
  );
}
