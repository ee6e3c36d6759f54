//! Sparse voxel octree construction and compaction.
//!
//! ```text
//!   IntermediatePool (pre-order arena)         CompactOctree (flat u32 array)
//!   ┌──────┬──────┬──────┬─────┐               ┌──────┬────┬────┬─────┬─────┐
//!   │ root │ c0   │ c0.0 │ ... │  ── compact ─►│ root │ c0 │ c1 │ far │ ... │
//!   └──────┴──────┴──────┴─────┘               └──────┴────┴────┴─────┴─────┘
//!   handles, masks, subtree sizes              masks + relative child delta
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `IntermediateNode` - mutable per-node record used while
//!   building
//! - [`builder`]: `SparseOctreeBuilder` - Morton-order recursion with pruning
//! - [`compactor`]: `OctreeCompactor` - two-pass linearization with far
//!   pointers
//! - [`compact`]: `CompactOctree` - the packed result and its queries
//! - [`config`]: `BuildConfig` - depth, delta width, terrain parameters
//! - [`pipeline`]: `build_octree` - validate, build, compact, report

pub mod builder;
pub mod compact;
pub mod compactor;
pub mod config;
pub mod node;
pub mod pipeline;

// Re-exports
pub use builder::{build_pool, BuilderStats, IntermediatePool, SparseOctreeBuilder, SubtreeKind};
pub use compact::{CompactNode, CompactOctree, FarPointer, Slot};
pub use compactor::{compact_pool, plan_children, ChildPlan, OctreeCompactor};
pub use config::BuildConfig;
pub use node::{child_rank, IntermediateNode, NodeHandle};
pub use pipeline::{build_heightmap_octree, build_octree, BuildOutput};
