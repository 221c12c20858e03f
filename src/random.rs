//! Bounded random helpers shared by the growth and ornament code.

use rand::Rng;
use std::f32::consts::PI;

/// Uniform draw over `[min, max]`.
pub fn uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniform magnitude in `[min, max]`, negated half the time.
pub fn signed_uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    let value = uniform(rng, min, max);
    if rng.gen_bool(0.5) {
        value
    } else {
        -value
    }
}

/// Random angle between `min_deg` and `max_deg` degrees, converted to
/// radians. With `signed`, the angle swings to either side.
pub fn angle_radians<R: Rng>(rng: &mut R, min_deg: f32, max_deg: f32, signed: bool) -> f32 {
    let degrees = if signed {
        signed_uniform(rng, min_deg, max_deg)
    } else {
        uniform(rng, min_deg, max_deg)
    };
    degrees * PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::{angle_radians, signed_uniform, uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = uniform(&mut rng, -130.0, -120.0);
            assert!((-130.0..=-120.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn uniform_degenerate_range_returns_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(uniform(&mut rng, 5.0, 2.0), 5.0);
    }

    #[test]
    fn signed_uniform_lands_in_either_band() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut positives = 0u32;
        let mut negatives = 0u32;
        for _ in 0..10_000 {
            let v = signed_uniform(&mut rng, 2.0, 5.0);
            let magnitude = v.abs();
            assert!((2.0..=5.0).contains(&magnitude), "out of band: {}", v);
            if v >= 0.0 {
                positives += 1;
            } else {
                negatives += 1;
            }
        }
        // both signs should show up often with a fair coin
        assert!(positives > 3_000);
        assert!(negatives > 3_000);
    }

    #[test]
    fn angle_converts_degrees_to_radians() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let a = angle_radians(&mut rng, 10.0, 27.0, true);
            let deg = a.abs() * 180.0 / std::f32::consts::PI;
            assert!((10.0 - 1e-3..=27.0 + 1e-3).contains(&deg), "bad angle: {}", a);
        }
        let unsigned = angle_radians(&mut rng, 10.0, 27.0, false);
        assert!(unsigned > 0.0);
    }
}
