//! Two-pass linearization of the intermediate pool into a [`CompactOctree`].
//!
//! # Emission order
//!
//! For a node with internal children `c0..cn` the compactor appends:
//!
//! ```text
//! [c0 .. cn]  [far slots]  [subtree(c0)] [subtree(c1)] ... [subtree(cn)]
//!  sibling     one per       each subtree = that child's own group,
//!  group       far child     far slots and grandchildren, recursively
//! ```
//!
//! The direct delta from `ck` (slot `start + k`) to its own group is
//!
//! ```text
//! delta(k) = (n - k) + far_count + Σ_{j<k} slots(cj)
//! ```
//!
//! # Passes
//!
//! 1. **Measure**: walk the pool backwards (children before parents) and
//!    compute each node's [`ChildPlan`], which fixes the exact slot count of
//!    its compacted subtree. Subtree slot counts are position independent,
//!    so they can be known before anything is emitted.
//! 2. **Emit**: pre-order recursion that appends slots and writes every
//!    child pointer as its subtree begins.
//!
//! A child whose delta exceeds the field gets a far slot right after the
//! sibling group. Adding far slots pushes every delta up, so the decision is
//! repeated until no new far slot is needed.

use smallvec::SmallVec;

use crate::constants::{max_near_delta, CHILD_COUNT, MIN_NEAR_DELTA_BITS, NEAR_DELTA_BITS};
use crate::error::{OctreeError, Result};

use super::builder::IntermediatePool;
use super::compact::{CompactNode, CompactOctree};
use super::node::{IntermediateNode, NodeHandle};

/// Compaction decision for one node's internal children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildPlan {
  /// Pool handles of internal children, ascending octant order.
  pub children: SmallVec<[NodeHandle; CHILD_COUNT]>,
  /// Bit `k` set: child of rank `k` is reached through a far slot.
  pub far_mask: u8,
  /// Slots occupied by this node's compacted subtree (excluding the node).
  pub slots: u64,
}

impl ChildPlan {
  /// Length of the sibling group.
  #[inline]
  pub fn group_len(&self) -> usize {
    self.children.len()
  }

  #[inline]
  pub fn far_count(&self) -> usize {
    self.far_mask.count_ones() as usize
  }

  #[inline]
  pub fn uses_far(&self, rank: usize) -> bool {
    self.far_mask & (1 << rank) != 0
  }
}

/// Plan the children of `node` given the measured slot counts of every
/// deeper node.
///
/// Children without internal children of their own carry no pointer and
/// never need a far slot.
pub fn plan_children(
  node: &IntermediateNode,
  pool: &IntermediatePool,
  slots: &[u64],
  max_delta: u32,
) -> ChildPlan {
  let children: SmallVec<[NodeHandle; CHILD_COUNT]> =
    node.internal_children().map(|(_, handle)| handle).collect();
  let n = children.len() as u64;

  let mut far_mask = 0u8;
  loop {
    let far_count = far_mask.count_ones() as u64;
    let mut prefix = 0u64;
    let mut added = false;
    for (rank, &child) in children.iter().enumerate() {
      let needs_pointer = pool.node(child).internal_mask() != 0;
      if needs_pointer && far_mask & (1 << rank) == 0 {
        let delta = (n - rank as u64) + far_count + prefix;
        if delta > max_delta as u64 {
          far_mask |= 1 << rank;
          added = true;
        }
      }
      prefix += slots[child as usize];
    }
    if !added {
      break;
    }
  }

  let subtree_slots: u64 = children.iter().map(|&c| slots[c as usize]).sum();
  let slots = n + far_mask.count_ones() as u64 + subtree_slots;
  ChildPlan {
    children,
    far_mask,
    slots,
  }
}

/// Converts an [`IntermediatePool`] into a [`CompactOctree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeCompactor {
  near_delta_bits: u32,
}

impl OctreeCompactor {
  /// Compactor with a `near_delta_bits` wide delta field (4..=15).
  ///
  /// Widths below 15 keep the word layout and only lower the far-pointer
  /// threshold.
  pub fn new(near_delta_bits: u32) -> Result<Self> {
    if !(MIN_NEAR_DELTA_BITS..=NEAR_DELTA_BITS).contains(&near_delta_bits) {
      return Err(OctreeError::InvalidDeltaBits {
        bits: near_delta_bits,
        min: MIN_NEAR_DELTA_BITS,
        max: NEAR_DELTA_BITS,
      });
    }
    Ok(Self { near_delta_bits })
  }

  pub fn near_delta_bits(&self) -> u32 {
    self.near_delta_bits
  }

  /// Largest delta stored directly.
  pub fn max_near_delta(&self) -> u32 {
    max_near_delta(self.near_delta_bits)
  }

  /// Slot count of every node's compacted subtree, indexed by handle.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::measure"))]
  pub fn measure(&self, pool: &IntermediatePool) -> Vec<u64> {
    let max_delta = self.max_near_delta();
    let mut slots = vec![0u64; pool.len()];
    // Pre-order pool: every child has a larger handle than its parent.
    for handle in (0..pool.len()).rev() {
      slots[handle] = plan_children(pool.node(handle as NodeHandle), pool, &slots, max_delta).slots;
    }
    slots
  }

  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::compact"))]
  pub fn compact(&self, pool: &IntermediatePool) -> Result<CompactOctree> {
    let slots = self.measure(pool);
    let total = 1 + slots[IntermediatePool::ROOT as usize];

    let mut emitter = Emitter {
      pool,
      slots: &slots,
      max_delta: self.max_near_delta(),
      words: Vec::with_capacity(total as usize),
      far_slots: Vec::new(),
    };

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("emit").entered();

      let root = pool.root();
      let root_delta = if root.internal_mask() != 0 { 1 } else { 0 };
      emitter
        .words
        .push(CompactNode::new(root.valid_mask, root.leaf_mask).with_pointer(root_delta, false).bits());
      emitter.emit_children(IntermediatePool::ROOT)?;
    }

    debug_assert_eq!(emitter.words.len() as u64, total);
    log::debug!(
      "compacted octree: nodes={} far_slots={} slots={}",
      pool.len(),
      emitter.far_slots.len(),
      emitter.words.len(),
    );

    Ok(CompactOctree::from_parts(
      emitter.words,
      emitter.far_slots,
      pool.depth(),
    ))
  }
}

impl Default for OctreeCompactor {
  fn default() -> Self {
    Self {
      near_delta_bits: NEAR_DELTA_BITS,
    }
  }
}

/// Emission state for one compaction.
struct Emitter<'a> {
  pool: &'a IntermediatePool,
  slots: &'a [u64],
  max_delta: u32,
  words: Vec<u32>,
  far_slots: Vec<usize>,
}

impl Emitter<'_> {
  /// Append the sibling group, far slots and child subtrees of `handle`.
  fn emit_children(&mut self, handle: NodeHandle) -> Result<()> {
    let plan = plan_children(self.pool.node(handle), self.pool, self.slots, self.max_delta);
    if plan.children.is_empty() {
      return Ok(());
    }

    let group_start = self.words.len();
    for &child in &plan.children {
      let node = self.pool.node(child);
      self
        .words
        .push(CompactNode::new(node.valid_mask, node.leaf_mask).bits());
    }

    let mut far_positions = [0usize; CHILD_COUNT];
    for rank in 0..plan.group_len() {
      if plan.uses_far(rank) {
        far_positions[rank] = self.words.len();
        self.far_slots.push(self.words.len());
        self.words.push(0);
      }
    }

    for (rank, &child) in plan.children.iter().enumerate() {
      let child_slot = group_start + rank;
      let subtree_start = self.words.len();

      if self.pool.node(child).internal_mask() != 0 {
        if plan.uses_far(rank) {
          let far_slot = far_positions[rank];
          self.set_pointer(child_slot, far_slot - child_slot, true)?;
          self.set_far(far_slot, subtree_start - far_slot)?;
        } else {
          self.set_pointer(child_slot, subtree_start - child_slot, false)?;
        }
      }

      self.emit_children(child)?;
      debug_assert_eq!(
        (self.words.len() - subtree_start) as u64,
        self.slots[child as usize],
        "measured and emitted subtree sizes differ"
      );
    }
    Ok(())
  }

  fn set_pointer(&mut self, slot: usize, delta: usize, far: bool) -> Result<()> {
    if delta as u64 > self.max_delta as u64 {
      return Err(OctreeError::NearDeltaOverflow {
        slot,
        delta: delta as u64,
        limit: self.max_delta,
      });
    }
    let node = CompactNode(self.words[slot]).with_pointer(delta as u32, far);
    self.words[slot] = node.bits();
    Ok(())
  }

  fn set_far(&mut self, slot: usize, delta: usize) -> Result<()> {
    let value = u32::try_from(delta).map_err(|_| OctreeError::FarDeltaOverflow {
      slot,
      delta: delta as u64,
    })?;
    self.words[slot] = value;
    Ok(())
  }
}

/// Compact `pool` with the reference 15-bit delta field.
pub fn compact_pool(pool: &IntermediatePool) -> Result<CompactOctree> {
  OctreeCompactor::default().compact(pool)
}

#[cfg(test)]
#[path = "compactor_test.rs"]
mod compactor_test;
