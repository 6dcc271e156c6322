//! Particle emitters.
//!
//! An emitter turns an emission rate into freshly spawned particles each
//! step. It owns an ordered list of [`Generator`]s that initialize the new
//! slots and its own [`ParticleRng`].
//!
//! # Spawn count
//!
//! Each step spawns `floor(dt * emit_rate)` particles, capped so the store
//! never overflows:
//!
//! ```text
//! start = alive_count
//! end   = min(start + floor(dt * rate), capacity)
//! ```
//!
//! Fractional particles are dropped by default, so at 60 Hz a rate below
//! 60 particles/second spawns nothing. Enable
//! [`ParticleEmitter::with_accumulation`] to carry the remainder over.
//!
//! # Example
//!
//! ```ignore
//! let emitter = ParticleEmitter::new(1000.0)
//!     .with_generator(SpherePosGen::new(Vec4::ZERO, 0.1)?)
//!     .with_generator(BasicTimeGen::new(1.0, 2.0)?);
//! ```

use crate::data::ParticleData;
use crate::generators::Generator;
use crate::random::ParticleRng;
use tracing::warn;

/// Handle to a generator inside an emitter, returned by
/// [`ParticleEmitter::add_generator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorId(pub(crate) usize);

/// Spawns particles at a fixed rate and initializes them with generators.
#[derive(Clone, Debug)]
pub struct ParticleEmitter {
    generators: Vec<Generator>,
    emit_rate: f32,
    rng: ParticleRng,
    accumulate: bool,
    accumulator: f32,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ParticleEmitter {
    /// Emitter spawning `emit_rate` particles per second.
    ///
    /// Negative or non-finite rates are clamped to zero.
    pub fn new(emit_rate: f32) -> Self {
        Self {
            generators: Vec::new(),
            emit_rate: sanitize_rate(emit_rate),
            rng: ParticleRng::default(),
            accumulate: false,
            accumulator: 0.0,
        }
    }

    /// Append a generator. Generators run in the order they are added.
    pub fn with_generator(mut self, generator: impl Into<Generator>) -> Self {
        self.generators.push(generator.into());
        self
    }

    /// Seed the emitter's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ParticleRng::from_seed(seed);
        self
    }

    /// Carry fractional spawn counts over to the next step.
    pub fn with_accumulation(mut self, enabled: bool) -> Self {
        self.accumulate = enabled;
        self.accumulator = 0.0;
        self
    }

    /// Append a generator and return a handle for later tweaking.
    pub fn add_generator(&mut self, generator: impl Into<Generator>) -> GeneratorId {
        self.generators.push(generator.into());
        GeneratorId(self.generators.len() - 1)
    }

    /// Mutable access to a generator by handle.
    pub fn generator_mut(&mut self, id: GeneratorId) -> Option<&mut Generator> {
        self.generators.get_mut(id.0)
    }

    /// Generators in run order.
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Particles per second.
    pub fn emit_rate(&self) -> f32 {
        self.emit_rate
    }

    /// Change the emission rate. Negative or non-finite rates become zero.
    pub fn set_emit_rate(&mut self, rate: f32) {
        self.emit_rate = sanitize_rate(rate);
    }

    /// Drop any carried-over fractional particle.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Spawn this step's particles into `data`.
    ///
    /// All generators fill `[start, end)` first; only then are the slots
    /// woken, in ascending order. Returns the number of particles spawned.
    pub fn emit(&mut self, dt: f32, data: &mut ParticleData) -> usize {
        let wanted = self.spawn_count(dt);
        let start = data.alive_count();
        let end = start.saturating_add(wanted).min(data.capacity());
        if end == start {
            return 0;
        }

        for generator in &self.generators {
            generator.generate(dt, data, start..end, &mut self.rng);
        }
        for id in start..end {
            data.wake(id);
        }
        end - start
    }

    fn spawn_count(&mut self, dt: f32) -> usize {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let exact = dt * self.emit_rate;
        if !self.accumulate {
            return exact as usize;
        }
        let total = exact + self.accumulator;
        let whole = total.floor();
        self.accumulator = total - whole;
        whole as usize
    }
}

fn sanitize_rate(rate: f32) -> f32 {
    if rate.is_finite() && rate >= 0.0 {
        rate
    } else {
        warn!(rate, "Invalid emit rate, clamping to 0");
        0.0
    }
}
