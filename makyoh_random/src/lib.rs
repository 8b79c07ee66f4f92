use makyoh::*;

use core::iter;
pub use rand;
pub use rand_chacha;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The seed the mirror samples are generated with.
pub const DEFAULT_SEED: u64 = 11;

/// The generator behind every sample set. Its output is portable, so a given
/// `(count, seed)` yields the same samples on every platform.
pub type SampleRng = ChaCha8Rng;

pub trait Random: Sized {
    /// Generate a random value using the provided `rng`
    ///
    /// This method must not fail. If generation is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for SamplePoint {
    /// Rejection-samples the square `[-1, 1)²` until a point lands strictly inside the unit disk.
    ///
    /// `u` is drawn before `v` on every trial.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        loop {
            let u = signed_unit(rng);
            let v = signed_unit(rng);

            if let Some(p) = Self::try_new(u, v) {
                break p;
            }
        }
    }
}

/// A uniform float in `[-1, 1)`.
///
/// Keeps the top 24 bits of one `u32` draw, `t = bits * 2^-24` in `[0, 1)`, and
/// returns `2t - 1`. Every step is exact in `f32`.
#[inline]
pub fn signed_unit(rng: &mut (impl rand::Rng + ?Sized)) -> Float {
    const SCALE: Float = 1.0 / (1u32 << 24) as Float;

    let t = (rng.next_u32() >> 8) as Float * SCALE;
    2.0 * t - 1.0
}

/// Generates `count` points uniformly distributed inside the unit disk.
///
/// A fresh generator is seeded from `seed` on every call, so the output only
/// depends on `(count, seed)`. Points come out in acceptance order.
///
/// # Panics
///
/// if `count` isn't in `1..=MAX_SAMPLES`. Counts must be clamped where they
/// enter the program, see [`clamp_sample_count`].
#[must_use]
pub fn generate_disk_samples(count: usize, seed: u64) -> SampleSet {
    assert!(
        (1..=MAX_SAMPLES).contains(&count),
        "sample count must be in 1..={MAX_SAMPLES}, got {count}"
    );

    let mut rng = SampleRng::seed_from_u64(seed);

    iter::repeat_with(|| SamplePoint::random(&mut rng))
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_count_inside_the_disk() {
        for count in [1, 2, 17, 100, 999, MAX_SAMPLES] {
            let samples = generate_disk_samples(count, DEFAULT_SEED);

            assert_eq!(samples.len(), count);
            assert!(samples.iter().all(|p| p.u() * p.u() + p.v() * p.v() < 1.0));
            assert!(samples
                .iter()
                .all(|p| (-1.0..1.0).contains(&p.u()) && (-1.0..1.0).contains(&p.v())));
        }
    }

    #[test]
    fn same_inputs_same_samples() {
        let a = generate_disk_samples(MAX_SAMPLES, DEFAULT_SEED);
        let b = generate_disk_samples(MAX_SAMPLES, DEFAULT_SEED);

        assert_eq!(a, b);
    }

    #[test]
    fn shorter_sets_are_prefixes() {
        let all = generate_disk_samples(MAX_SAMPLES, DEFAULT_SEED);
        let some = generate_disk_samples(100, DEFAULT_SEED);

        assert_eq!(some.points(), &all[..100]);
    }

    #[test]
    fn seeds_change_the_samples() {
        let a = generate_disk_samples(50, DEFAULT_SEED);
        let b = generate_disk_samples(50, DEFAULT_SEED + 1);

        assert_ne!(a, b);
    }

    #[test]
    fn default_samples_are_pinned() {
        let samples = generate_disk_samples(MAX_SAMPLES, DEFAULT_SEED);

        let head = [
            (0xbeb5a8bc, 0xbe92c6f4),
            (0x3d54a9e0, 0xbe565728),
            (0x3f485bca, 0x3ddaf330),
            (0x3ca07100, 0xbf14b3a8),
            (0x3f103c36, 0xbf108964),
            (0x3d7c2e40, 0x3f7650e6),
        ];

        for (p, &(u, v)) in samples.iter().zip(&head) {
            assert_eq!((p.u(), p.v()), (f32::from_bits(u), f32::from_bits(v)));
        }

        let checksum = samples.iter().flat_map(|p| [p.u(), p.v()]).fold(0u64, |h, c| {
            h.wrapping_mul(31).wrapping_add(c.to_bits() as u64)
        });

        assert_eq!(checksum, 0xa4ca_e6b3_43c7_f416);
    }

    #[test]
    fn signed_unit_bounds() {
        struct Fixed(u32);

        impl rand::RngCore for Fixed {
            fn next_u32(&mut self) -> u32 {
                self.0
            }

            fn next_u64(&mut self) -> u64 {
                self.0 as u64
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0)
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }

        assert_eq!(signed_unit(&mut Fixed(0)), -1.0);
        assert_eq!(signed_unit(&mut Fixed(0x8000_0000)), 0.0);
        assert!(signed_unit(&mut Fixed(u32::MAX)) < 1.0);
    }

    #[test]
    fn samples_cover_the_disk() {
        let samples = generate_disk_samples(MAX_SAMPLES, DEFAULT_SEED);

        let quadrants = samples.iter().fold([0usize; 4], |mut acc, p| {
            acc[(p.u() >= 0.0) as usize | ((p.v() >= 0.0) as usize) << 1] += 1;
            acc
        });

        // 250 expected per quadrant
        assert!(quadrants.iter().all(|&n| (150..350).contains(&n)), "{quadrants:?}");
    }

    #[test]
    #[should_panic]
    fn zero_samples_is_a_bug() {
        let _ = generate_disk_samples(0, DEFAULT_SEED);
    }

    #[test]
    #[should_panic]
    fn too_many_samples_is_a_bug() {
        let _ = generate_disk_samples(MAX_SAMPLES + 1, DEFAULT_SEED);
    }
}
