//! Deterministic value noise and the layered height field
//!
//! `NoiseField::height` is the only source of elevation in the world. Chunk
//! meshes, the classifier and every entity's terrain-follow go through it, so
//! rendering and physics can never disagree about the ground.

use crate::settings::NoiseSettings;

/// Integer lattice hash normalized to [0, 1]
#[inline]
fn lattice_hash(a: i32, b: i32) -> f32 {
    let mut h = a
        .wrapping_mul(374_761_393)
        .wrapping_add(b.wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    (h & 0x7fff_ffff) as f32 / 0x7fff_ffff as f32
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Single-octave value noise in [0, 1]
///
/// Bilinear blend of the four surrounding lattice hashes with smoothstep
/// weights. Pure function of (x, z).
pub fn sample(x: f32, z: f32) -> f32 {
    let x0 = x.floor();
    let z0 = z.floor();
    let xi = x0 as i32;
    let zi = z0 as i32;

    let u = smoothstep(x - x0);
    let v = smoothstep(z - z0);

    let a = lattice_hash(xi, zi);
    let b = lattice_hash(xi.wrapping_add(1), zi);
    let c = lattice_hash(xi, zi.wrapping_add(1));
    let d = lattice_hash(xi.wrapping_add(1), zi.wrapping_add(1));

    a * (1.0 - u) * (1.0 - v) + b * u * (1.0 - v) + c * (1.0 - u) * v + d * u * v
}

/// Multi-octave height field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseField {
    scale: f32,
    amplitudes: [f32; 3],
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(&NoiseSettings::default())
    }
}

impl NoiseField {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            scale: settings.scale,
            amplitudes: settings.amplitudes,
        }
    }

    /// Terrain elevation at a world position
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let mut height = 0.0;
        let mut frequency = self.scale;
        for amplitude in self.amplitudes {
            height += sample(x * frequency, z * frequency) * amplitude;
            frequency *= 2.0;
        }
        height
    }

    /// Upper bound of `height` (sum of octave amplitudes)
    pub fn max_height(&self) -> f32 {
        self.amplitudes.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lattice_points_are_hashes() {
        // On integer coordinates the blend collapses to the corner hash
        assert_eq!(sample(3.0, -7.0), lattice_hash(3, -7));
        assert_eq!(sample(0.0, 0.0), lattice_hash(0, 0));
    }

    #[test]
    fn test_height_is_continuous_across_cells() {
        let field = NoiseField::default();
        let step = 0.05;
        let mut prev = field.height(-200.0, 13.0);
        let mut x = -200.0 + step;
        while x < 200.0 {
            let h = field.height(x, 13.0);
            // Smoothstep slope is at most 1.5 per lattice unit per octave
            assert!((h - prev).abs() < 0.1, "jump at x={x}: {prev} -> {h}");
            prev = h;
            x += step;
        }
    }

    proptest! {
        #[test]
        fn prop_sample_in_unit_range(x in -1.0e4f32..1.0e4, z in -1.0e4f32..1.0e4) {
            let s = sample(x, z);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_height_deterministic_and_bounded(x in -5000.0f32..5000.0, z in -5000.0f32..5000.0) {
            let field = NoiseField::default();
            let h = field.height(x, z);
            prop_assert_eq!(h.to_bits(), field.height(x, z).to_bits());
            prop_assert!(h >= 0.0 && h <= field.max_height() + 1e-4);
        }
    }
}
