//! Procedural terrain for octree construction.
//!
//! The shipped volume is a heightfield: multi-octave value noise (lattice hash
//! + cosine interpolation, not gradient noise) mapped to an integer column
//! height, with every voxel below the column height solid.

mod heightmap;
mod value;


pub use heightmap::{HeightmapConfig, HeightmapVolume};
pub use value::{cosine_interp, fbm2, hash1, hash2, interp2};
