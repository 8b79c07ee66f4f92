#![no_std]

extern crate alloc;

pub use nalgebra;

use nalgebra::{Matrix4, Vector3, Vector4};

mod config;
mod pose;
mod sample;
mod shading;

pub use config::*;
pub use pose::*;
pub use sample::*;
pub use shading::*;

pub type Float = f32;

/// A homogeneous 3D vector `(x, y, z, w)`.
///
/// Points have `w = 1` and directions have `w = 0`. Colours keep `w` as a
/// reserved slot, and the receiver orientation stores its uniform scale there.
pub type HVector = Vector4<Float>;

/// The up-direction hint used when none is given: `(0, 1, 0, 0)`.
#[inline]
pub fn default_up() -> HVector {
    HVector::y()
}

/// Applies the homogeneous divide, returning `v.xyz / v.w`.
///
/// The result has non-finite components if `v.w == 0`.
#[inline]
pub fn dehomogenize(v: &HVector) -> Vector3<Float> {
    v.xyz() / v.w
}

#[inline]
pub(crate) fn extend(v: &Vector3<Float>, w: Float) -> HVector {
    HVector::new(v.x, v.y, v.z, w)
}
