//! Solid/empty predicates consumed by the octree builder.

use glam::UVec3;

use crate::morton::{self, MortonIndex};

/// Occupancy predicate over Morton traversal positions.
///
/// The builder queries every voxel exactly once, in ascending index order.
/// Implementations may rely on that order (see
/// [`HeightmapVolume`](crate::noise::HeightmapVolume)), which is why the
/// receiver is `&mut self`.
pub trait VolumeSource {
  /// Whether the voxel at `index` is solid.
  fn is_solid(&mut self, index: MortonIndex) -> bool;
}

/// Blanket impl for boxed trait objects.
impl VolumeSource for Box<dyn VolumeSource> {
  fn is_solid(&mut self, index: MortonIndex) -> bool {
    (**self).is_solid(index)
  }
}

impl<S: VolumeSource + ?Sized> VolumeSource for &mut S {
  fn is_solid(&mut self, index: MortonIndex) -> bool {
    (**self).is_solid(index)
  }
}

/// Volume described by a closure over voxel coordinates.
///
/// ```ignore
/// // Solid floor only
/// let floor = VolumeFn::new(|p: UVec3| p.z == 0);
/// ```
pub struct VolumeFn<F> {
  predicate: F,
}

impl<F: FnMut(UVec3) -> bool> VolumeFn<F> {
  pub fn new(predicate: F) -> Self {
    Self { predicate }
  }
}

impl<F: FnMut(UVec3) -> bool> VolumeSource for VolumeFn<F> {
  #[inline]
  fn is_solid(&mut self, index: MortonIndex) -> bool {
    (self.predicate)(morton::decode(index))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_volume_fn_decodes_index() {
    let mut seen = Vec::new();
    let mut volume = VolumeFn::new(|p: UVec3| {
      seen.push(p);
      p.x == 1
    });

    assert!(!volume.is_solid(0));
    assert!(volume.is_solid(morton::encode3(1, 2, 3)));
    drop(volume);

    assert_eq!(seen, vec![UVec3::ZERO, UVec3::new(1, 2, 3)]);
  }

  #[test]
  fn test_boxed_source_forwards() {
    let mut boxed: Box<dyn VolumeSource> = Box::new(VolumeFn::new(|p: UVec3| p.z < 2));
    assert!(boxed.is_solid(morton::encode3(0, 0, 1)));
    assert!(!boxed.is_solid(morton::encode3(0, 0, 2)));
  }
}
