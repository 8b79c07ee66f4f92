use super::*;

use alloc::vec::Vec;
use core::ops::Deref;

/// Upper bound on the number of mirror sample points.
pub const MAX_SAMPLES: usize = 1000;

/// A point strictly inside the unit disk, used to integrate over the mirror surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    u: Float,
    v: Float,
}

impl SamplePoint {
    /// Returns `None` unless `u² + v² < 1`.
    #[inline]
    pub fn try_new(u: Float, v: Float) -> Option<Self> {
        (u * u + v * v < 1.0).then_some(Self { u, v })
    }

    #[inline]
    pub const fn u(&self) -> Float {
        self.u
    }

    #[inline]
    pub const fn v(&self) -> Float {
        self.v
    }

    /// `(u, v, 0, 1)`, the layout the receiver shader reads.
    #[inline]
    pub const fn to_homogeneous(&self) -> [Float; 4] {
        [self.u, self.v, 0.0, 1.0]
    }
}

/// An ordered, fixed-length sequence of disk samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
}

impl SampleSet {
    #[inline]
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// The samples in their uniform buffer layout, one `vec4` each.
    pub fn to_homogeneous(&self) -> Vec<[Float; 4]> {
        self.points.iter().map(SamplePoint::to_homogeneous).collect()
    }
}

impl Deref for SampleSet {
    type Target = [SamplePoint];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl FromIterator<SamplePoint> for SampleSet {
    fn from_iter<I: IntoIterator<Item = SamplePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_on_the_circle_are_rejected() {
        assert!(SamplePoint::try_new(1.0, 0.0).is_none());
        assert!(SamplePoint::try_new(0.0, -1.0).is_none());
        assert!(SamplePoint::try_new(0.8, 0.8).is_none());
        assert!(SamplePoint::try_new(-0.6, 0.79).is_some());
    }

    #[test]
    fn homogeneous_layout() {
        let set: SampleSet = [(0.5, -0.25), (0.0, 0.0)]
            .into_iter()
            .filter_map(|(u, v)| SamplePoint::try_new(u, v))
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.to_homogeneous(),
            [[0.5, -0.25, 0.0, 1.0], [0.0, 0.0, 0.0, 1.0]]
        );
    }
}
