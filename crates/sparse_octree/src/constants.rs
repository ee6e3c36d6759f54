//! Tree size limits and the packed node word layout.
//!
//! # Compact Node Word
//!
//! ```text
//!  31            24 23            16 15                          1   0
//! ┌────────────────┬────────────────┬──────────────────────────────┬───┐
//! │   leaf mask    │   valid mask   │      child delta (15 bit)    │ F │
//! └────────────────┴────────────────┴──────────────────────────────┴───┘
//!
//! F = far flag. When set, `self + delta` is a far-pointer slot whose whole
//! word is the forward delta from that slot to the child group.
//! ```
//!
//! # Octant Numbering
//!
//! ```text
//! Octant bits (binary: ZYX), identical to one 3-bit Morton group:
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

/// Deepest supported tree (10 bits per axis, 1024³ voxels).
///
/// A 3D Morton index of 10-bit coordinates needs 30 bits, so every linear
/// index fits a `u32`.
pub const MAX_DEPTH: u32 = 10;

/// Bits per axis covered by the Morton helpers.
pub const MORTON_AXIS_BITS: u32 = MAX_DEPTH;

/// Width of the child delta field in the reference layout.
pub const NEAR_DELTA_BITS: u32 = 15;

/// Narrowest delta field the compactor accepts.
///
/// A pointer from a child to its far slot spans at most the sibling group
/// (8 slots), which needs 4 bits.
pub const MIN_NEAR_DELTA_BITS: u32 = 4;

/// Largest delta that fits the reference field (0x7fff).
pub const MAX_NEAR_DELTA: u32 = (1 << NEAR_DELTA_BITS) - 1;

/// Number of children per node.
pub const CHILD_COUNT: usize = 8;

/// Child mask with every octant set.
pub const FULL_MASK: u8 = 0xFF;

/// Bit holding the far flag.
pub const FAR_FLAG: u32 = 1;

/// Shift of the child delta field.
pub const DELTA_SHIFT: u32 = 1;

/// Shift of the valid mask byte.
pub const VALID_SHIFT: u32 = 16;

/// Shift of the leaf mask byte.
pub const LEAF_SHIFT: u32 = 24;

/// Largest near delta for a given field width.
#[inline(always)]
pub const fn max_near_delta(bits: u32) -> u32 {
  (1 << bits) - 1
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
