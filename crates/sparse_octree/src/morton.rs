//! Morton (Z-order) encoding between voxel coordinates and linear indices.
//!
//! The octree builder walks the volume in Morton order, so the index of a
//! voxel doubles as its position in the predicate stream. Within every 3-bit
//! group x is bit 0, y is bit 1 and z is bit 2, which makes a group equal to
//! the child octant number at that tree level.
//!
//! ```text
//! index = ... z1 y1 x1 z0 y0 x0
//!             └─level─┘└─level─┘
//! ```

use glam::UVec3;

/// Linear position in Morton traversal order.
pub type MortonIndex = u32;

/// Spread the low 10 bits of `v` so two zero bits follow each bit.
#[inline(always)]
const fn part_1_by_2(v: u32) -> u32 {
  let mut x = v & 0x0000_03ff;
  x = (x ^ (x << 16)) & 0xff00_00ff;
  x = (x ^ (x << 8)) & 0x0300_f00f;
  x = (x ^ (x << 4)) & 0x030c_30c3;
  x = (x ^ (x << 2)) & 0x0924_9249;
  x
}

/// Inverse of [`part_1_by_2`].
#[inline(always)]
const fn compact_1_by_2(v: u32) -> u32 {
  let mut x = v & 0x0924_9249;
  x = (x ^ (x >> 2)) & 0x030c_30c3;
  x = (x ^ (x >> 4)) & 0x0300_f00f;
  x = (x ^ (x >> 8)) & 0xff00_00ff;
  x = (x ^ (x >> 16)) & 0x0000_03ff;
  x
}

/// Spread the low 16 bits of `v` so one zero bit follows each bit.
#[inline(always)]
const fn part_1_by_1(v: u32) -> u32 {
  let mut x = v & 0x0000_ffff;
  x = (x ^ (x << 8)) & 0x00ff_00ff;
  x = (x ^ (x << 4)) & 0x0f0f_0f0f;
  x = (x ^ (x << 2)) & 0x3333_3333;
  x = (x ^ (x << 1)) & 0x5555_5555;
  x
}

/// Inverse of [`part_1_by_1`].
#[inline(always)]
const fn compact_1_by_1(v: u32) -> u32 {
  let mut x = v & 0x5555_5555;
  x = (x ^ (x >> 1)) & 0x3333_3333;
  x = (x ^ (x >> 2)) & 0x0f0f_0f0f;
  x = (x ^ (x >> 4)) & 0x00ff_00ff;
  x = (x ^ (x >> 8)) & 0x0000_ffff;
  x
}

/// Interleave a 2D column coordinate (heightmap cache key).
#[inline(always)]
pub const fn encode2(x: u32, y: u32) -> u32 {
  part_1_by_1(x) | (part_1_by_1(y) << 1)
}

/// Split a 2D Morton key back into (x, y).
#[inline(always)]
pub const fn decode2(key: u32) -> (u32, u32) {
  (compact_1_by_1(key), compact_1_by_1(key >> 1))
}

/// Interleave a 3D coordinate. Each axis must fit 10 bits.
#[inline(always)]
pub const fn encode3(x: u32, y: u32, z: u32) -> MortonIndex {
  part_1_by_2(x) | (part_1_by_2(y) << 1) | (part_1_by_2(z) << 2)
}

/// Exact inverse of [`encode3`].
#[inline(always)]
pub const fn decode3(index: MortonIndex) -> (u32, u32, u32) {
  (
    compact_1_by_2(index),
    compact_1_by_2(index >> 1),
    compact_1_by_2(index >> 2),
  )
}

/// [`encode3`] for a vector coordinate.
#[inline]
pub fn encode(coord: UVec3) -> MortonIndex {
  encode3(coord.x, coord.y, coord.z)
}

/// [`decode3`] returning a vector coordinate.
#[inline]
pub fn decode(index: MortonIndex) -> UVec3 {
  let (x, y, z) = decode3(index);
  UVec3::new(x, y, z)
}

/// Child octant selected by `index` when descending from `level` in a tree of
/// `depth` levels (level 0 picks among the root's children).
#[inline(always)]
pub const fn octant_at(index: MortonIndex, level: u32, depth: u32) -> u8 {
  ((index >> (3 * (depth - 1 - level))) & 0b111) as u8
}

#[cfg(test)]
#[path = "morton_test.rs"]
mod morton_test;
