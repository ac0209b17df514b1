//! Gradient (Perlin) noise for procedural textures.

use crate::sampling::random_unit_vector;
use lumen_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default octave count for `turb`.
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Lattice of random unit gradients addressed through three permutation tables.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build a noise field. The field is fixed once built; `rng` only seeds it.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smooth noise in roughly [-1, 1]. Zero on every integer lattice point.
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[wrap(i + di as i32)]
                        ^ self.perm_y[wrap(j + dj as i32)]
                        ^ self.perm_z[wrap(k + dk as i32)];
                    *cell = self.gradients[index];
                }
            }
        }

        trilinear_interp(&c, u, v, w)
    }

    /// Turbulence: absolute sum of `depth` octaves, each at double the
    /// frequency and half the weight of the previous.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(n: i32) -> usize {
    (n & (POINT_COUNT as i32 - 1)) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Hermite-smoothed trilinear blend of the eight corner gradients.
fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noise_field() -> Perlin {
        let mut rng = StdRng::seed_from_u64(42);
        Perlin::new(&mut rng)
    }

    #[test]
    fn test_noise_zero_on_lattice() {
        let perlin = noise_field();

        assert_eq!(perlin.noise(Vec3::new(1.0, 2.0, 3.0)), 0.0);
        assert_eq!(perlin.noise(Vec3::new(-4.0, 0.0, 17.0)), 0.0);
    }

    #[test]
    fn test_noise_bounded_and_continuous() {
        let perlin = noise_field();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..2000 {
            let p = crate::sampling::random_vec3(&mut rng, -50.0, 50.0);
            let n = perlin.noise(p);
            assert!(n.is_finite());
            assert!(n.abs() <= 1.5, "noise out of range: {n}");

            let nearby = perlin.noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_turb_is_non_negative() {
        let perlin = noise_field();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let p = crate::sampling::random_vec3(&mut rng, -10.0, 10.0);
            assert!(perlin.turb(p, DEFAULT_TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(perlin.turb(Vec3::new(0.3, 0.2, 0.1), 0), 0.0);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = noise_field();
        let b = noise_field();
        let p = Vec3::new(0.37, 1.91, -2.4);

        assert_eq!(a.noise(p), b.noise(p));
    }
}
