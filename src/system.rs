//! The particle system: one store, its emitters and its updaters.
//!
//! Each call to [`ParticleSystem::update`] runs a fixed protocol:
//!
//! 1. every emitter spawns, in registration order
//! 2. acceleration is zeroed for all slots
//! 3. every updater runs, in registration order
//! 4. the smoothed alive ratio is refreshed
//!
//! # Example
//!
//! ```ignore
//! let mut system = ParticleSystem::new(10_000)?
//!     .with_emitter(
//!         ParticleEmitter::new(2_500.0)
//!             .with_generator(BoxPosGen::new(Vec4::ZERO, Vec4::splat(0.1)))
//!             .with_generator(BasicTimeGen::new(1.0, 2.0)?),
//!     )
//!     .with_updater(BasicTimeUpdater)
//!     .with_updater(EulerUpdater::new(Vec4::new(0.0, -9.8, 0.0, 0.0)));
//!
//! system.update(1.0 / 60.0);
//! let view = system.render_view();
//! ```

use crate::data::ParticleData;
use crate::emitter::{GeneratorId, ParticleEmitter};
use crate::error::SystemError;
use crate::generators::Generator;
use crate::updaters::Updater;
use crate::view::RenderView;
use tracing::debug;

/// Handle to an emitter, returned by [`ParticleSystem::add_emitter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmitterId(usize);

/// Handle to an updater, returned by [`ParticleSystem::add_updater`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UpdaterId(usize);

/// Owns a particle store and drives it with emitters and updaters.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: ParticleData,
    emitters: Vec<ParticleEmitter>,
    updaters: Vec<Updater>,
    alive_to_all_ratio: f32,
}

impl ParticleSystem {
    /// System with room for `capacity` particles.
    pub fn new(capacity: usize) -> Result<Self, SystemError> {
        let particles = ParticleData::new(capacity)?;
        debug!(
            capacity,
            memory_mb = particles.memory_usage() / (1024 * 1024),
            "Particle system allocated"
        );
        Ok(Self {
            particles,
            emitters: Vec::new(),
            updaters: Vec::new(),
            alive_to_all_ratio: 0.0,
        })
    }

    /// Register an emitter, builder style.
    pub fn with_emitter(mut self, emitter: ParticleEmitter) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Register an updater, builder style.
    pub fn with_updater(mut self, updater: impl Into<Updater>) -> Self {
        self.updaters.push(updater.into());
        self
    }

    /// Register an emitter and return its handle.
    pub fn add_emitter(&mut self, emitter: ParticleEmitter) -> EmitterId {
        self.emitters.push(emitter);
        EmitterId(self.emitters.len() - 1)
    }

    /// Register an updater and return its handle.
    pub fn add_updater(&mut self, updater: impl Into<Updater>) -> UpdaterId {
        self.updaters.push(updater.into());
        UpdaterId(self.updaters.len() - 1)
    }

    /// Mutable access to an emitter.
    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(id.0)
    }

    /// Mutable access to one generator of one emitter.
    pub fn generator_mut(&mut self, emitter: EmitterId, generator: GeneratorId) -> Option<&mut Generator> {
        self.emitter_mut(emitter)?.generator_mut(generator)
    }

    /// Mutable access to an updater.
    pub fn updater_mut(&mut self, id: UpdaterId) -> Option<&mut Updater> {
        self.updaters.get_mut(id.0)
    }

    /// Emitters in run order.
    pub fn emitters(&self) -> &[ParticleEmitter] {
        &self.emitters
    }

    /// Updaters in run order.
    pub fn updaters(&self) -> &[Updater] {
        &self.updaters
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Does not allocate. Negative `dt` spawns nothing.
    pub fn update(&mut self, dt: f64) {
        let dt = dt as f32;

        for emitter in &mut self.emitters {
            emitter.emit(dt, &mut self.particles);
        }

        self.particles.clear_accelerations();

        for updater in &self.updaters {
            updater.update(dt, &mut self.particles);
        }

        let ratio = self.particles.alive_count() as f32 / self.particles.capacity() as f32;
        self.alive_to_all_ratio = 0.5 * self.alive_to_all_ratio + 0.5 * ratio;
    }

    /// Kill every particle.
    pub fn reset(&mut self) {
        self.particles.clear();
        for emitter in &mut self.emitters {
            emitter.reset();
        }
    }

    /// Capacity of the store.
    pub fn num_all_particles(&self) -> usize {
        self.particles.capacity()
    }

    /// Live particle count.
    pub fn num_alive_particles(&self) -> usize {
        self.particles.alive_count()
    }

    /// Exponentially smoothed `alive / capacity`.
    pub fn alive_to_all_ratio(&self) -> f32 {
        self.alive_to_all_ratio
    }

    /// Bytes held by the particle store.
    pub fn memory_usage(&self) -> usize {
        self.particles.memory_usage()
    }

    /// The particle store.
    pub fn data(&self) -> &ParticleData {
        &self.particles
    }

    /// The particle store, mutably.
    pub fn data_mut(&mut self) -> &mut ParticleData {
        &mut self.particles
    }

    /// Read-only positions and colors of the live particles.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView::new(&self.particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::BasicTimeGen;
    use crate::updaters::{BasicTimeUpdater, EulerUpdater};
    use glam::Vec4;

    #[test]
    fn test_new_rejects_zero() {
        assert!(ParticleSystem::new(0).is_err());
    }

    #[test]
    fn test_update_emits_and_ratio_smooths() {
        let mut system = ParticleSystem::new(100)
            .unwrap()
            .with_emitter(ParticleEmitter::new(1000.0).with_seed(1));
        system.update(0.01);
        assert_eq!(system.num_alive_particles(), 10);
        assert!((system.alive_to_all_ratio() - 0.05).abs() < 1e-6);
        system.update(0.01);
        assert_eq!(system.num_alive_particles(), 20);
        assert!((system.alive_to_all_ratio() - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_acceleration_cleared_each_step() {
        let mut system = ParticleSystem::new(4)
            .unwrap()
            .with_updater(EulerUpdater::new(Vec4::new(0.0, -1.0, 0.0, 0.0)));
        system.data_mut().wake(0);
        system.data_mut().accelerations_mut()[3] = Vec4::ONE;
        system.update(1.0);
        system.update(1.0);
        assert_eq!(system.data().accelerations()[0], Vec4::new(0.0, -1.0, 0.0, 0.0));
        assert_eq!(system.data().accelerations()[3], Vec4::ZERO);
    }

    #[test]
    fn test_reset_kills_all() {
        let mut system = ParticleSystem::new(50)
            .unwrap()
            .with_emitter(
                ParticleEmitter::new(100.0).with_generator(BasicTimeGen::new(5.0, 5.0).unwrap()),
            )
            .with_updater(BasicTimeUpdater);
        system.update(0.1);
        assert_eq!(system.num_alive_particles(), 10);
        system.reset();
        assert_eq!(system.num_alive_particles(), 0);
        assert_eq!(system.num_all_particles(), 50);
    }

    #[test]
    fn test_handles() {
        let mut system = ParticleSystem::new(8).unwrap();
        let e = system.add_emitter(ParticleEmitter::new(1.0));
        let u = system.add_updater(EulerUpdater::default());
        system.emitter_mut(e).unwrap().set_emit_rate(5.0);
        system
            .updater_mut(u)
            .and_then(|u| u.as_euler_mut())
            .unwrap()
            .global_acceleration = Vec4::Y;
        assert_eq!(system.emitters()[0].emit_rate(), 5.0);
        assert_eq!(
            system.updaters()[0],
            Updater::Euler(EulerUpdater { global_acceleration: Vec4::Y })
        );
    }
}
