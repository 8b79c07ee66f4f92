use super::*;

use nalgebra::UnitQuaternion;

/// A rigid transform placing a light, mirror or receiver in the scene.
///
/// Stored column-major: column 0 is the right axis, column 1 the up axis,
/// column 2 the forward axis and column 3 the translation. The bottom row
/// is always `(0, 0, 0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    matrix: Matrix4<Float>,
}

impl Default for Pose {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    #[inline]
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<Float> {
        &self.matrix
    }

    /// The matrix entries in column-major order, ready for upload as a `mat4` uniform.
    #[inline]
    pub fn as_slice(&self) -> &[Float] {
        self.matrix.as_slice()
    }

    #[inline]
    pub fn right(&self) -> Vector3<Float> {
        self.axis(0)
    }

    #[inline]
    pub fn up(&self) -> Vector3<Float> {
        self.axis(1)
    }

    #[inline]
    pub fn forward(&self) -> Vector3<Float> {
        self.axis(2)
    }

    #[inline]
    pub fn translation(&self) -> Vector3<Float> {
        self.axis(3)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    #[inline]
    fn axis(&self, column: usize) -> Vector3<Float> {
        let m = &self.matrix;
        Vector3::new(m[(0, column)], m[(1, column)], m[(2, column)])
    }
}

/// Derives the pose of an object sitting at `position` and looking at `target`.
///
/// The forward axis points from `position` to `target` (both are dehomogenized
/// first, so their `w` may differ), the right axis is `up × forward` and the
/// true up axis is `forward × right`. Each axis is normalized by its own length
/// once the whole basis has been built.
///
/// Degenerate inputs never fail: if `target` coincides with `position`, if `up`
/// is parallel to the viewing direction, or if a `w` of zero or an overflow
/// makes an axis non-finite, the identity pose is returned instead.
///
/// The thresholds apply to the unnormalized axes, so a `target` closer than
/// about `3e-4` to `position` also collapses to the identity.
#[must_use]
pub fn derive_pose(position: &HVector, target: &HVector, up: &HVector) -> Pose {
    let z = dehomogenize(target) - dehomogenize(position);
    let x = up.xyz().cross(&z);
    let y = z.cross(&x);

    let (Some(z), Some(x), Some(y)) = (unit(&z), unit(&x), unit(&y)) else {
        return Pose::identity();
    };

    Pose {
        matrix: Matrix4::from_columns(&[
            extend(&x, 0.0),
            extend(&y, 0.0),
            extend(&z, 0.0),
            extend(&dehomogenize(position), 1.0),
        ]),
    }
}

/// `v` over its length, unless that length is below `EPSILON` or not finite.
#[inline]
fn unit(v: &Vector3<Float>) -> Option<Vector3<Float>> {
    let l = v.norm();
    (l.is_finite() && l >= Float::EPSILON).then(|| v / l)
}

/// Model and view matrices of the receiver surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReceiverFrame {
    /// `translate(position) * rotate(orientation.xyz) * scale(orientation.w)`
    pub pose: Matrix4<Float>,
    /// The view from the receiver: `rotate(orientation.xyz)ᵀ * translate(-position)`
    pub view: Matrix4<Float>,
}

impl ReceiverFrame {
    /// `orientation.xyz` holds Euler angles in radians, applied about X, then Y,
    /// then Z. `orientation.w` is a uniform scale factor, which only affects the pose.
    #[must_use]
    pub fn new(position: &HVector, orientation: &HVector) -> Self {
        let rotation =
            UnitQuaternion::from_euler_angles(orientation.x, orientation.y, orientation.z)
                .to_homogeneous();

        let translation = dehomogenize(position);

        Self {
            pose: Matrix4::new_translation(&translation)
                * rotation
                * Matrix4::new_scaling(orientation.w),
            view: rotation.transpose() * Matrix4::new_translation(&-translation),
        }
    }
}

impl Default for ReceiverFrame {
    fn default() -> Self {
        Self {
            pose: Matrix4::identity(),
            view: Matrix4::identity(),
        }
    }
}
