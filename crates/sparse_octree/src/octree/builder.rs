//! Recursive sparse octree construction with subtree pruning.
//!
//! The builder walks the volume depth-first in Morton order. Only unit voxels
//! query the [`VolumeSource`]; every internal level pushes a node into an
//! append-only pool and decides, after visiting its 8 octants, whether the
//! node is worth keeping:
//!
//! ```text
//!   leaf mask == 0xFF  → all solid → pop node, report Solid
//!   valid mask == 0x00 → all empty → pop node, report Empty
//!   otherwise          → keep node, report Mixed
//! ```
//!
//! A pruned node is always the pool tail (its children produced no nodes),
//! so pruning never leaves holes. The root is never popped.

use crate::constants::{CHILD_COUNT, MAX_DEPTH};
use crate::error::{OctreeError, Result};
use crate::morton::MortonIndex;
use crate::volume::VolumeSource;

use super::node::{IntermediateNode, NodeHandle};

/// What a finished subtree reports to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubtreeKind {
  /// Nothing solid; no node retained.
  Empty,
  /// Entirely solid; no node retained.
  Solid,
  /// Mixed content; a node was retained in the pool.
  Mixed,
}

/// Counters collected while building.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderStats {
  /// Predicate queries issued (one per unit voxel).
  pub voxels_sampled: u64,
  /// Internal nodes collapsed into a solid leaf bit.
  pub pruned_solid: u64,
  /// Internal nodes dropped as empty.
  pub pruned_empty: u64,
}

/// Pre-order arena of retained intermediate nodes. Handle 0 is the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntermediatePool {
  nodes: Vec<IntermediateNode>,
  depth: u32,
}

impl IntermediatePool {
  /// Root handle.
  pub const ROOT: NodeHandle = 0;

  pub fn depth(&self) -> u32 {
    self.depth
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Always false for a built pool; the root is kept.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn root(&self) -> &IntermediateNode {
    &self.nodes[Self::ROOT as usize]
  }

  #[inline]
  pub fn node(&self, handle: NodeHandle) -> &IntermediateNode {
    &self.nodes[handle as usize]
  }

  pub fn nodes(&self) -> &[IntermediateNode] {
    &self.nodes
  }
}

/// Depth-first builder over a traversal-ordered predicate stream.
pub struct SparseOctreeBuilder<'s, S: VolumeSource + ?Sized> {
  source: &'s mut S,
  cursor: MortonIndex,
  nodes: Vec<IntermediateNode>,
  stats: BuilderStats,
}

impl<'s, S: VolumeSource + ?Sized> SparseOctreeBuilder<'s, S> {
  pub fn new(source: &'s mut S) -> Self {
    Self {
      source,
      cursor: 0,
      nodes: Vec::new(),
      stats: BuilderStats::default(),
    }
  }

  /// Build a tree of `depth` levels (a `2^depth` cube).
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::build_pool"))]
  pub fn build(mut self, depth: u32) -> Result<(IntermediatePool, BuilderStats)> {
    if depth == 0 || depth > MAX_DEPTH {
      return Err(OctreeError::InvalidDepth {
        depth,
        max: MAX_DEPTH,
      });
    }

    let root_kind = self.add_subtree(depth);
    debug_assert!(!self.nodes.is_empty(), "root must be retained");

    log::debug!(
      "built intermediate pool: depth={} nodes={} root={:?} sampled={} pruned_solid={} pruned_empty={}",
      depth,
      self.nodes.len(),
      root_kind,
      self.stats.voxels_sampled,
      self.stats.pruned_solid,
      self.stats.pruned_empty,
    );

    Ok((
      IntermediatePool {
        nodes: self.nodes,
        depth,
      },
      self.stats,
    ))
  }

  fn sample(&mut self) -> SubtreeKind {
    let solid = self.source.is_solid(self.cursor);
    self.cursor += 1;
    self.stats.voxels_sampled += 1;
    if solid {
      SubtreeKind::Solid
    } else {
      SubtreeKind::Empty
    }
  }

  fn add_subtree(&mut self, depth: u32) -> SubtreeKind {
    if depth == 0 {
      return self.sample();
    }

    let index = self.nodes.len();
    self.nodes.push(IntermediateNode::default());

    for octant in 0..CHILD_COUNT as u8 {
      let child_index = self.nodes.len();
      let kind = self.add_subtree(depth - 1);
      let grew = self.nodes.len() != child_index;
      debug_assert_eq!(grew, kind == SubtreeKind::Mixed);

      let node = &mut self.nodes[index];
      if grew {
        node.set_internal(octant, child_index as NodeHandle);
      } else if kind == SubtreeKind::Solid {
        node.set_solid(octant);
      }
    }

    let subtree_size = (self.nodes.len() - index - 1) as u32;
    let node = &mut self.nodes[index];
    node.subtree_size = subtree_size;
    debug_assert!(node.is_well_formed());

    if node.is_full() {
      if index != 0 {
        self.pop_tail(index);
        self.stats.pruned_solid += 1;
      }
      return SubtreeKind::Solid;
    }
    if node.is_empty() {
      if index != 0 {
        self.pop_tail(index);
        self.stats.pruned_empty += 1;
      }
      return SubtreeKind::Empty;
    }
    SubtreeKind::Mixed
  }

  fn pop_tail(&mut self, index: usize) {
    debug_assert_eq!(self.nodes.len(), index + 1, "only the pool tail can be pruned");
    self.nodes.pop();
  }
}

/// Build the intermediate pool for `source` at `depth`.
pub fn build_pool<S: VolumeSource + ?Sized>(
  source: &mut S,
  depth: u32,
) -> Result<(IntermediatePool, BuilderStats)> {
  SparseOctreeBuilder::new(source).build(depth)
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
