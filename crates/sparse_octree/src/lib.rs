//! sparse_octree - Sparse voxel octree construction and GPU-ready compaction
//!
//! This crate builds a sparse voxel octree from a solid/empty predicate and
//! packs it into a flat array of 32-bit words that a GPU ray marcher can
//! traverse directly. Uniform subtrees are pruned while building; child
//! pointers are relative deltas with a far-pointer escape when a delta does
//! not fit its field.
//!
//! # Features
//!
//! - **Morton traversal**: the volume is queried once per voxel in Z-order
//! - **Heightmap terrain**: multi-octave value noise with a per-column cache
//! - **Subtree pruning**: all-solid and all-empty nodes collapse into mask bits
//! - **Exact compaction**: two passes, so every offset is known before it is
//!   written and far pointers are only used where needed
//!
//! # Example
//!
//! ```ignore
//! use sparse_octree::{build_heightmap_octree, BuildConfig};
//!
//! let output = build_heightmap_octree(&BuildConfig::with_depth(8))?;
//! let buffer: &[u8] = output.octree.as_bytes(); // upload as-is, root = 0
//!
//! println!("{} slots, {} far", output.stats.compact_slots, output.stats.far_slots);
//! ```

pub mod constants;
pub mod error;
pub mod morton;
pub mod volume;

// Re-export commonly used items
pub use constants::{MAX_DEPTH, MAX_NEAR_DELTA, NEAR_DELTA_BITS};
pub use error::{OctreeError, Result};
pub use morton::MortonIndex;
pub use volume::{VolumeFn, VolumeSource};

// Heightmap terrain
pub mod noise;
pub use noise::{HeightmapConfig, HeightmapVolume};

// Octree construction and compaction
pub mod octree;
pub use octree::{
  build_heightmap_octree, build_octree, BuildConfig, BuildOutput, CompactNode, CompactOctree,
  OctreeCompactor, SparseOctreeBuilder,
};

// Build statistics
pub mod metrics;
pub use metrics::BuildStats;
