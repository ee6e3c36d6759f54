//! Heightfield volume with a per-column height cache.

use super::value::fbm2;
use crate::error::{OctreeError, Result};
use crate::morton::{self, MortonIndex};
use crate::volume::VolumeSource;

/// Heightfield noise parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeightmapConfig {
  /// Log2 of the horizontal feature size, also the vertical scale.
  /// Heights land in roughly `[0.03, 1.97] * 2^s`.
  pub height_scale_log2: u32,
  /// Number of noise octaves.
  pub octaves: u32,
}

impl HeightmapConfig {
  /// Largest accepted `height_scale_log2`.
  pub const MAX_SCALE_LOG2: u32 = 16;
  /// Largest accepted octave count.
  pub const MAX_OCTAVES: u32 = 16;

  pub fn validate(&self) -> Result<()> {
    if self.height_scale_log2 > Self::MAX_SCALE_LOG2 {
      return Err(OctreeError::InvalidHeightScale {
        scale: self.height_scale_log2,
        max: Self::MAX_SCALE_LOG2,
      });
    }
    if self.octaves == 0 || self.octaves > Self::MAX_OCTAVES {
      return Err(OctreeError::InvalidOctaves {
        octaves: self.octaves,
        max: Self::MAX_OCTAVES,
      });
    }
    Ok(())
  }
}

impl Default for HeightmapConfig {
  fn default() -> Self {
    Self {
      height_scale_log2: 8,
      octaves: 5,
    }
  }
}

/// Volume where `(x, y, z)` is solid iff `z == 0` or `z < height(x, y)`.
///
/// The column height is computed on the `z == 0` query and cached under the
/// 2D Morton key of `(x, y)`. Morton traversal always reaches a column's
/// floor voxel first, so later queries in the column are a cache read. The
/// cache lives as long as the volume (one build).
#[derive(Clone, Debug)]
pub struct HeightmapVolume {
  config: HeightmapConfig,
  scale: f32,
  heights: Vec<Option<u32>>,
}

impl HeightmapVolume {
  pub fn new(config: HeightmapConfig) -> Self {
    Self {
      config,
      scale: (config.height_scale_log2 as f32).exp2(),
      heights: Vec::new(),
    }
  }

  pub fn config(&self) -> &HeightmapConfig {
    &self.config
  }

  /// Uncached height of column `(x, y)`.
  pub fn compute_height(&self, x: u32, y: u32) -> u32 {
    let noise = fbm2(x as f32 / self.scale, y as f32 / self.scale, self.config.octaves);
    ((noise + 2.0) * self.scale * 0.5) as u32
  }

  /// Cached height of column `(x, y)`, if that column was visited.
  pub fn column_height(&self, x: u32, y: u32) -> Option<u32> {
    self
      .heights
      .get(morton::encode2(x, y) as usize)
      .copied()
      .flatten()
  }

  /// Number of columns with a cached height.
  pub fn cached_columns(&self) -> usize {
    self.heights.iter().filter(|h| h.is_some()).count()
  }

  fn store_height(&mut self, key: usize, height: u32) {
    if self.heights.len() <= key {
      self.heights.resize(key + 1, None);
    }
    self.heights[key] = Some(height);
  }

  fn cached_or_compute(&mut self, x: u32, y: u32, key: usize) -> u32 {
    if let Some(height) = self.heights.get(key).copied().flatten() {
      return height;
    }
    // Column entered above its floor; only happens outside Morton order.
    let height = self.compute_height(x, y);
    self.store_height(key, height);
    height
  }
}

impl Default for HeightmapVolume {
  fn default() -> Self {
    Self::new(HeightmapConfig::default())
  }
}

impl VolumeSource for HeightmapVolume {
  fn is_solid(&mut self, index: MortonIndex) -> bool {
    let (x, y, z) = morton::decode3(index);
    let key = morton::encode2(x, y) as usize;

    if z == 0 {
      let height = self.compute_height(x, y);
      self.store_height(key, height);
      return true;
    }

    z < self.cached_or_compute(x, y, key)
  }
}
