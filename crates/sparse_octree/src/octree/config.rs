//! BuildConfig - parameters of one octree bake.

use crate::constants::{MAX_DEPTH, MIN_NEAR_DELTA_BITS, NEAR_DELTA_BITS};
use crate::error::{OctreeError, Result};
use crate::noise::HeightmapConfig;

/// Configuration for building and compacting an octree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildConfig {
  /// Tree depth; the volume is a `2^depth` cube. `1..=MAX_DEPTH`.
  pub depth: u32,

  /// Width of the direct child delta. 15 matches the packed word; narrower
  /// widths push more children through far slots.
  pub near_delta_bits: u32,

  /// Terrain parameters for [`HeightmapVolume`](crate::noise::HeightmapVolume).
  pub heightmap: HeightmapConfig,
}

impl BuildConfig {
  /// Config for a `2^depth` cube with everything else at defaults.
  pub fn with_depth(depth: u32) -> Self {
    Self {
      depth,
      ..Self::default()
    }
  }

  /// Side length of the volume in voxels.
  #[inline]
  pub fn side(&self) -> u32 {
    1 << self.depth
  }

  /// Check every field against its accepted range.
  pub fn validate(&self) -> Result<()> {
    if self.depth == 0 || self.depth > MAX_DEPTH {
      return Err(OctreeError::InvalidDepth {
        depth: self.depth,
        max: MAX_DEPTH,
      });
    }
    if !(MIN_NEAR_DELTA_BITS..=NEAR_DELTA_BITS).contains(&self.near_delta_bits) {
      return Err(OctreeError::InvalidDeltaBits {
        bits: self.near_delta_bits,
        min: MIN_NEAR_DELTA_BITS,
        max: NEAR_DELTA_BITS,
      });
    }
    self.heightmap.validate()
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      depth: MAX_DEPTH,
      near_delta_bits: NEAR_DELTA_BITS,
      heightmap: HeightmapConfig::default(),
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
