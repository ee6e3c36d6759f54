//! CompactOctree - the flat, GPU-ready node array.
//!
//! # Layout
//!
//! ```text
//! slot:   0      1    2    3     4     5    6 ...
//!       [root] [ c0 | c1 | c2 ] [far] [c0's group ...] [c1's group ...] ...
//!                └── sibling ──┘  │
//!                    group        └ far slot for a child whose direct
//!                                   delta would not fit 15 bits
//! ```
//!
//! Each node word stores masks plus a forward delta to the first slot of its
//! own sibling group. Internal child `i` of node `n` lives at
//! `group(n) + rank(i)`. Far slots are raw `u32` deltas and are told apart
//! from nodes only by their position, recorded in a sorted side list.

use bytemuck::{Pod, Zeroable};
use glam::UVec3;

use crate::constants::{DELTA_SHIFT, FAR_FLAG, LEAF_SHIFT, MAX_NEAR_DELTA, VALID_SHIFT};
use crate::morton::{self, octant_at};

use super::node::child_rank;

/// Packed node word: `leaf:8 | valid:8 | delta:15 | far:1` (high to low).
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct CompactNode(pub u32);

impl CompactNode {
  /// Node with masks and no child pointer.
  #[inline]
  pub const fn new(valid_mask: u8, leaf_mask: u8) -> Self {
    Self(((valid_mask as u32) << VALID_SHIFT) | ((leaf_mask as u32) << LEAF_SHIFT))
  }

  /// Replace the child pointer. `delta` must fit 15 bits.
  #[inline]
  pub fn with_pointer(self, delta: u32, far: bool) -> Self {
    debug_assert!(delta <= MAX_NEAR_DELTA);
    let masks = self.0 & !((MAX_NEAR_DELTA << DELTA_SHIFT) | FAR_FLAG);
    let far_bit = if far { FAR_FLAG } else { 0 };
    Self(masks | ((delta & MAX_NEAR_DELTA) << DELTA_SHIFT) | far_bit)
  }

  #[inline]
  pub fn valid_mask(self) -> u8 {
    (self.0 >> VALID_SHIFT) as u8
  }

  #[inline]
  pub fn leaf_mask(self) -> u8 {
    (self.0 >> LEAF_SHIFT) as u8
  }

  /// Octants holding subdivided children.
  #[inline]
  pub fn internal_mask(self) -> u8 {
    self.valid_mask() ^ self.leaf_mask()
  }

  #[inline]
  pub fn delta(self) -> u32 {
    (self.0 >> DELTA_SHIFT) & MAX_NEAR_DELTA
  }

  #[inline]
  pub fn is_far(self) -> bool {
    self.0 & FAR_FLAG != 0
  }

  #[inline]
  pub fn bits(self) -> u32 {
    self.0
  }
}

impl std::fmt::Debug for CompactNode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompactNode")
      .field("valid", &format_args!("{:08b}", self.valid_mask()))
      .field("leaf", &format_args!("{:08b}", self.leaf_mask()))
      .field("delta", &self.delta())
      .field("far", &self.is_far())
      .finish()
  }
}

/// Far-pointer slot: forward delta from this slot to a child group.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct FarPointer(pub u32);

impl FarPointer {
  #[inline]
  pub fn delta(self) -> u32 {
    self.0
  }
}

/// Typed view of one array slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
  Node(CompactNode),
  Far(FarPointer),
}

/// Compacted octree: node words plus the positions of far slots.
///
/// Root is always slot 0. Immutable once built; hand [`words`](Self::words)
/// or [`as_bytes`](Self::as_bytes) to the GPU upload as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactOctree {
  words: Vec<u32>,
  far_slots: Vec<usize>,
  depth: u32,
}

impl CompactOctree {
  /// Root slot index.
  pub const ROOT: usize = 0;

  /// `far_slots` must be sorted ascending.
  pub(crate) fn from_parts(words: Vec<u32>, far_slots: Vec<usize>, depth: u32) -> Self {
    debug_assert!(far_slots.windows(2).all(|w| w[0] < w[1]));
    Self {
      words,
      far_slots,
      depth,
    }
  }

  pub fn root(&self) -> usize {
    Self::ROOT
  }

  /// Tree depth; the volume is a `2^depth` cube.
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Total slots (nodes + far pointers).
  pub fn len(&self) -> usize {
    self.words.len()
  }

  /// Always false for a built tree.
  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn words(&self) -> &[u32] {
    &self.words
  }

  /// Raw bytes in native endianness, ready for a storage buffer upload.
  pub fn as_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.words)
  }

  /// Little-endian byte stream, independent of the host.
  pub fn to_le_bytes(&self) -> Vec<u8> {
    self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
  }

  /// Sorted positions of far-pointer slots.
  pub fn far_slots(&self) -> &[usize] {
    &self.far_slots
  }

  pub fn far_slot_count(&self) -> usize {
    self.far_slots.len()
  }

  /// Node slots, excluding far pointers.
  pub fn node_count(&self) -> usize {
    self.words.len() - self.far_slots.len()
  }

  #[inline]
  pub fn is_far_slot(&self, index: usize) -> bool {
    self.far_slots.binary_search(&index).is_ok()
  }

  /// Typed view of slot `index`.
  pub fn slot(&self, index: usize) -> Option<Slot> {
    let word = *self.words.get(index)?;
    Some(if self.is_far_slot(index) {
      Slot::Far(FarPointer(word))
    } else {
      Slot::Node(CompactNode(word))
    })
  }

  /// Node at `index`, or `None` for far slots and out-of-range indices.
  pub fn node(&self, index: usize) -> Option<CompactNode> {
    match self.slot(index)? {
      Slot::Node(node) => Some(node),
      Slot::Far(_) => None,
    }
  }

  /// First slot of the sibling group of node `index`.
  ///
  /// Follows at most one far pointer. `None` when the node has no internal
  /// children or the pointer does not land where it should.
  pub fn child_group(&self, index: usize) -> Option<usize> {
    let node = self.node(index)?;
    if node.internal_mask() == 0 {
      return None;
    }
    let target = index + node.delta() as usize;
    if !node.is_far() {
      return Some(target);
    }
    match self.slot(target)? {
      Slot::Far(far) => Some(target + far.delta() as usize),
      Slot::Node(_) => None,
    }
  }

  /// Slot of internal child `octant` of node `index`.
  pub fn child_index(&self, index: usize, octant: u8) -> Option<usize> {
    let node = self.node(index)?;
    let internal = node.internal_mask();
    if internal & (1 << octant) == 0 {
      return None;
    }
    Some(self.child_group(index)? + child_rank(internal, octant) as usize)
  }

  /// Whether the voxel at `coord` is solid, walking the tree the way the
  /// GPU traversal does. Coordinates outside the volume are empty.
  pub fn is_solid(&self, coord: UVec3) -> bool {
    let side = 1u32 << self.depth;
    if coord.cmpge(UVec3::splat(side)).any() {
      return false;
    }

    let index = morton::encode(coord);
    let mut current = Self::ROOT;
    for level in 0..self.depth {
      let Some(node) = self.node(current) else {
        return false;
      };
      let octant = octant_at(index, level, self.depth);
      let bit = 1 << octant;
      if node.valid_mask() & bit == 0 {
        return false;
      }
      if node.leaf_mask() & bit != 0 {
        return true;
      }
      let Some(next) = self.child_index(current, octant) else {
        return false;
      };
      current = next;
    }
    false
  }
}

#[cfg(test)]
#[path = "compact_test.rs"]
mod compact_test;
