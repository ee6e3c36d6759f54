//! IntermediateNode - pre-compaction octree node stored in the builder pool.

use crate::constants::{CHILD_COUNT, FULL_MASK};

/// Index of a node inside the intermediate pool.
pub type NodeHandle = u32;

/// Octree node before compaction.
///
/// Bit `i` of each mask describes octant `i`:
/// - valid set, leaf set: solid octant, not subdivided
/// - valid set, leaf clear: internal child at `children[i]`
/// - valid clear: empty octant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntermediateNode {
  /// Pool handles of internal children.
  pub children: [Option<NodeHandle>; CHILD_COUNT],
  pub valid_mask: u8,
  pub leaf_mask: u8,
  /// Number of retained descendants (not counting this node).
  pub subtree_size: u32,
}

impl IntermediateNode {
  /// Record an internal child at `octant`.
  #[inline]
  pub fn set_internal(&mut self, octant: u8, handle: NodeHandle) {
    self.children[octant as usize] = Some(handle);
    self.valid_mask |= 1 << octant;
  }

  /// Record a fully solid octant.
  #[inline]
  pub fn set_solid(&mut self, octant: u8) {
    self.valid_mask |= 1 << octant;
    self.leaf_mask |= 1 << octant;
  }

  /// Octants holding subdivided children.
  #[inline]
  pub fn internal_mask(&self) -> u8 {
    self.valid_mask ^ self.leaf_mask
  }

  /// Every octant solid.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.leaf_mask == FULL_MASK
  }

  /// Every octant empty.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.valid_mask == 0
  }

  /// Whether the masks are consistent (leaf ⊆ valid, handles ⇔ internal bits).
  pub fn is_well_formed(&self) -> bool {
    let handles_match = (0..CHILD_COUNT as u8).all(|octant| {
      self.children[octant as usize].is_some() == (self.internal_mask() & (1 << octant) != 0)
    });
    self.leaf_mask & !self.valid_mask == 0 && handles_match
  }

  /// Internal children as `(octant, handle)` in ascending octant order.
  pub fn internal_children(&self) -> impl Iterator<Item = (u8, NodeHandle)> + '_ {
    self
      .children
      .iter()
      .enumerate()
      .filter_map(|(octant, child)| child.map(|handle| (octant as u8, handle)))
  }
}

/// Position of `octant` among the internal children in `internal_mask`.
#[inline(always)]
pub const fn child_rank(internal_mask: u8, octant: u8) -> u32 {
  let below = ((1u16 << octant) - 1) as u8;
  (internal_mask & below).count_ones()
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
