//! # Perlin Noise
//!
//! Classic gradient noise over a seeded permutation table.
//!
//! The tables are built once from the seed and never change afterwards.
//! Every table index draws a 1D, 2D and 3D gradient in lockstep, so the
//! random sequence (and the field it produces) is fixed for a given seed.
//! Only the 2D gradients are sampled, so only they are kept.

use crate::utils::{dot2, lerp, normalize, s_curve};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Entries in the base permutation table.
const B: usize = 0x100;
/// Mask wrapping a lattice coordinate into the table.
const BM: i64 = 0xff;
/// Offset added to coordinates so small negatives stay positive before truncation.
const N: f64 = 4096.0;
/// Base table plus a duplicate with a two entry overlap.
const TABLE_LEN: usize = B + B + 2;

/// Deterministic multi-octave Perlin noise generator.
#[derive(Debug, Clone)]
pub struct Perlin {
    alpha: f64,
    beta: f64,
    octaves: u32,
    perm: Vec<usize>,
    g2: Vec<[f64; 2]>,
}

impl Perlin {
    /// Builds the permutation and gradient tables for `seed`.
    ///
    /// `alpha` divides each successive octave's weight and `beta` multiplies
    /// its frequency; both are typically 2.
    pub fn new(alpha: f64, beta: f64, octaves: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut perm = vec![0usize; TABLE_LEN];
        let mut g2 = vec![[0.0; 2]; TABLE_LEN];

        for i in 0..B {
            perm[i] = i;
            // 1D gradient.
            random_component(&mut rng);

            g2[i] = [random_component(&mut rng), random_component(&mut rng)];
            normalize(&mut g2[i]);

            // 3D gradient.
            for _ in 0..3 {
                random_component(&mut rng);
            }
        }

        for i in (1..B).rev() {
            let j = rng.gen_range(0..=i);
            perm.swap(i, j);
        }

        for i in 0..B + 2 {
            perm[B + i] = perm[i];
            g2[B + i] = g2[i];
        }

        Self {
            alpha,
            beta,
            octaves,
            perm,
            g2,
        }
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Single-octave noise at `(x, y)`, roughly within [-1, 1].
    ///
    /// Integer lattice points always sample to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::Perlin;
    ///
    /// let perlin = Perlin::new(2.0, 2.0, 3, 42);
    /// assert_eq!(perlin.sample(3.0, 7.0), 0.0);
    /// assert!(perlin.sample(3.4, 7.7).abs() <= 1.0);
    /// ```
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (bx0, bx1, rx0, rx1) = lattice(x);
        let (by0, by1, ry0, ry1) = lattice(y);

        let i = self.perm[bx0];
        let j = self.perm[bx1];

        let b00 = self.perm[i + by0];
        let b10 = self.perm[j + by0];
        let b01 = self.perm[i + by1];
        let b11 = self.perm[j + by1];

        let sx = s_curve(rx0);
        let sy = s_curve(ry0);

        let u = dot2(rx0, ry0, self.g2[b00]);
        let v = dot2(rx1, ry0, self.g2[b10]);
        let a = lerp(sx, u, v);

        let u = dot2(rx0, ry1, self.g2[b01]);
        let v = dot2(rx1, ry1, self.g2[b11]);
        let b = lerp(sx, u, v);

        lerp(sy, a, b)
    }

    /// Sum of all octaves at `(x, y)`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let mut divisor = 1.0;
        let mut point = (x, y);
        let mut sum = 0.0;

        for _ in 0..self.octaves {
            sum += self.sample(point.0, point.1) / divisor;
            divisor *= self.alpha;
            point.0 *= self.beta;
            point.1 *= self.beta;
        }
        sum
    }
}

/// Uniform draw from [-1, 1) in steps of 1/256.
fn random_component(rng: &mut StdRng) -> f64 {
    (rng.gen_range(0..2 * B) as f64 - B as f64) / B as f64
}

/// Splits a coordinate into its two wrapped lattice indices and the
/// offsets from each.
fn lattice(coord: f64) -> (usize, usize, f64, f64) {
    let t = coord + N;
    let whole = t as i64;
    let b0 = whole & BM;
    let b1 = (b0 + 1) & BM;
    let r0 = t - whole as f64;
    (b0 as usize, b1 as usize, r0, r0 - 1.0)
}
