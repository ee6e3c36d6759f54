//! Errors reported by octree construction.

use thiserror::Error;

/// Failure to build or compact an octree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OctreeError {
  #[error("tree depth must be in 1..={max}, got {depth}")]
  InvalidDepth { depth: u32, max: u32 },

  #[error("near delta width must be in {min}..={max} bits, got {bits}")]
  InvalidDeltaBits { bits: u32, min: u32, max: u32 },

  #[error("height scale log2 must be at most {max}, got {scale}")]
  InvalidHeightScale { scale: u32, max: u32 },

  #[error("octave count must be in 1..={max}, got {octaves}")]
  InvalidOctaves { octaves: u32, max: u32 },

  /// A far slot cannot hold the distance to its child group.
  #[error("far pointer at slot {slot} needs delta {delta}, which exceeds u32")]
  FarDeltaOverflow { slot: usize, delta: u64 },

  /// A direct child delta exceeded the field despite planning.
  #[error("child pointer at slot {slot} needs delta {delta}, above the limit {limit}")]
  NearDeltaOverflow { slot: usize, delta: u64, limit: u32 },
}

pub type Result<T> = std::result::Result<T, OctreeError>;
