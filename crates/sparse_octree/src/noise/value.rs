//! Lattice value noise with cosine interpolation.

use std::f32::consts::PI;

/// Deterministic integer hash mapped to roughly (-1, 1].
#[inline]
pub fn hash1(x: u32) -> f32 {
  let n = (x << 13) ^ x;
  let m = n
    .wrapping_mul(n.wrapping_mul(15731).wrapping_add(789_221).wrapping_add(1_376_312_589))
    & 0x7fff_ffff;
  1.0 - m as f32 / 1_073_741_824.0
}

/// Hash of a 2D lattice point.
#[inline]
pub fn hash2(x: u32, y: u32) -> f32 {
  hash1(x.wrapping_add(y.wrapping_mul(71)))
}

/// Cosine-eased blend of `a` and `b` at `t` in [0, 1].
#[inline]
pub fn cosine_interp(a: f32, b: f32, t: f32) -> f32 {
  let f = (1.0 - (t * PI).cos()) * 0.5;
  (b - a) * f + a
}

/// Noise at a non-negative position, blended from the 4 surrounding lattice
/// samples.
pub fn interp2(x: f32, y: f32) -> f32 {
  let fx = x.floor();
  let fy = y.floor();
  let tx = x - fx;
  let ty = y - fy;
  let ix = fx as u32;
  let iy = fy as u32;

  let v00 = hash2(ix, iy);
  let v10 = hash2(ix.wrapping_add(1), iy);
  let v01 = hash2(ix, iy.wrapping_add(1));
  let v11 = hash2(ix.wrapping_add(1), iy.wrapping_add(1));

  let u0 = cosine_interp(v00, v10, tx);
  let u1 = cosine_interp(v01, v11, tx);
  cosine_interp(u0, u1, ty)
}

/// Fractal sum of `octaves` layers; octave i runs at frequency 2^i with
/// amplitude 2^-i.
pub fn fbm2(x: f32, y: f32, octaves: u32) -> f32 {
  (0..octaves)
    .map(|i| {
      let frequency = (i as f32).exp2();
      interp2(x * frequency, y * frequency) / frequency
    })
    .sum()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hash_is_deterministic_and_bounded() {
    for x in 0..4096 {
      let v = hash1(x);
      assert_eq!(v, hash1(x));
      assert!(v > -1.0 - f32::EPSILON && v <= 1.0, "hash1({}) = {}", x, v);
    }
  }

  #[test]
  fn test_cosine_interp_endpoints() {
    assert_eq!(cosine_interp(2.0, 6.0, 0.0), 2.0);
    assert!((cosine_interp(2.0, 6.0, 1.0) - 6.0).abs() < 1e-5);
    assert!((cosine_interp(2.0, 6.0, 0.5) - 4.0).abs() < 1e-5);
  }

  #[test]
  fn test_interp2_hits_lattice_values() {
    assert_eq!(interp2(3.0, 5.0), hash2(3, 5));
    assert_eq!(interp2(0.0, 0.0), hash2(0, 0));
  }

  #[test]
  fn test_fbm2_stays_within_amplitude_sum() {
    // Amplitudes 1 + 1/2 + 1/4 + 1/8 + 1/16
    let bound = 1.9375 + 1e-4;
    for i in 0..64 {
      let x = i as f32 * 0.37;
      let y = i as f32 * 0.11;
      let v = fbm2(x, y, 5);
      assert!(v.abs() <= bound, "fbm2({}, {}) = {}", x, y, v);
    }
  }

  #[test]
  fn test_single_octave_matches_interp() {
    assert_eq!(fbm2(1.25, 7.5, 1), interp2(1.25, 7.5));
  }
}
