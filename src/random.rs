//! Random sampling for generators.
//!
//! Each emitter owns one [`ParticleRng`]. Seed it explicitly with
//! [`ParticleRng::from_seed`] for reproducible runs; the default seeds
//! from the OS.

use glam::{Vec3, Vec4};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Small, fast PRNG with helpers for the shapes generators sample from.
#[derive(Debug, Clone)]
pub struct ParticleRng {
    rng: SmallRng,
}

impl ParticleRng {
    /// Deterministic generator for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 between `a` and `b`.
    ///
    /// Interpolates instead of using `gen_range`, so `a == b` returns `a`
    /// exactly and a reversed range still samples between the two ends.
    #[inline]
    pub fn range(&mut self, a: f32, b: f32) -> f32 {
        a + (b - a) * self.random()
    }

    /// Component-wise [`ParticleRng::range`].
    #[inline]
    pub fn vec4(&mut self, a: Vec4, b: Vec4) -> Vec4 {
        Vec4::new(
            self.range(a.x, b.x),
            self.range(a.y, b.y),
            self.range(a.z, b.z),
            self.range(a.w, b.w),
        )
    }

    // ========== Shape helpers ==========

    /// Point on an axis-aligned ellipse in the XY plane.
    pub fn on_ellipse(&mut self, rad_x: f32, rad_y: f32) -> Vec3 {
        let ang = self.range(0.0, TAU);
        Vec3::new(rad_x * ang.sin(), rad_y * ang.cos(), 0.0)
    }

    /// Point inside a ball, using raw spherical coordinates.
    ///
    /// The radius is sampled uniformly, so density grows toward the center.
    pub fn in_sphere(&mut self, radius: f32) -> Vec3 {
        let phi = self.range(0.0, TAU);
        let theta = self.range(0.0, PI);
        let r = self.range(0.0, radius);
        Vec3::new(
            r * theta.sin() * phi.cos(),
            r * theta.sin() * phi.sin(),
            r * theta.cos(),
        )
    }

    /// Direction scaled by `speed`, from two independent angles.
    pub fn sphere_direction(&mut self, speed: f32) -> Vec3 {
        let phi = self.range(-PI, PI);
        let theta = self.range(-PI, PI);
        let r = speed * phi.sin();
        Vec3::new(speed * phi.cos(), r * theta.cos(), r * theta.sin())
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
