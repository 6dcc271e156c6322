use super::{ordered, particle_count, Effect};
use crate::emitter::{GeneratorId, ParticleEmitter};
use crate::error::SystemError;
use crate::generators::{BasicColorGen, BasicTimeGen, BasicVelGen, SpherePosGen};
use crate::system::{EmitterId, ParticleSystem, UpdaterId};
use crate::updaters::{BasicTimeUpdater, EulerUpdater, Updater};
use glam::Vec4;
use tracing::debug;

/// Fire: particles spawn inside a drifting sphere and rise.
pub struct BurningEffect {
    system: ParticleSystem,
    emitter: EmitterId,
    pos_gen: GeneratorId,
    col_gen: GeneratorId,
    euler: UpdaterId,
    time: f64,
}

impl BurningEffect {
    /// Assemble the fire with `num_particles` capacity (`0` for default).
    pub fn new(num_particles: usize) -> Result<Self, SystemError> {
        let count = particle_count(num_particles);
        let mut system = ParticleSystem::new(count)?;

        let (min_end, max_end) = ordered(Vec4::new(1.0, 0.49, 0.0, 0.0), Vec4::new(1.0, 0.26, 0.0, 0.0));

        let mut emitter = ParticleEmitter::new(count as f32 * 0.45);
        let pos_gen = emitter.add_generator(SpherePosGen::new(Vec4::ZERO, 0.1)?);
        let col_gen = emitter.add_generator(BasicColorGen::new(
            Vec4::new(0.0, 0.69, 1.0, 1.0),
            Vec4::new(0.74, 0.93, 1.0, 1.0),
            min_end,
            max_end,
        )?);
        emitter.add_generator(BasicVelGen::new(Vec4::new(-0.05, -0.05, -0.05, 0.0), Vec4::new(0.05, 0.05, 0.05, 0.0))?);
        emitter.add_generator(BasicTimeGen::new(1.0, 5.5)?);
        let emitter = system.add_emitter(emitter);

        system.add_updater(BasicTimeUpdater);
        system.add_updater(Updater::BasicColor);
        let euler = system.add_updater(EulerUpdater::new(Vec4::new(0.0, 5.0, 0.0, 0.0)));

        debug!(
            effect = "burning",
            particles = count,
            memory_mb = system.memory_usage() / (1024 * 1024),
            "Effect assembled"
        );

        Ok(Self {
            system,
            emitter,
            pos_gen,
            col_gen,
            euler,
            time: 0.0,
        })
    }
}

impl Effect for BurningEffect {
    fn name(&self) -> &'static str {
        "burning"
    }

    fn description(&self) -> &'static str {
        "Burning effect where particles spawn from a sphere and rise up."
    }

    fn update(&mut self, dt: f64) {
        self.time += dt;
        let t = self.time as f32;

        if let Some(gen) = self
            .system
            .generator_mut(self.emitter, self.pos_gen)
            .and_then(|g| g.as_sphere_pos_mut())
        {
            gen.center.x = 0.2 * (t * 1.1).sin();
            gen.center.z = 0.2 * (t * 1.74).cos();
            gen.radius = 0.1 + 0.01 * t.sin();
        }
    }

    fn system(&self) -> &ParticleSystem {
        &self.system
    }

    fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    fn reset(&mut self) {
        self.system.reset();
        self.time = 0.0;
        debug!(effect = "burning", "Effect reset");
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(self.description());
        ui.separator();

        if let Some(euler) = self.system.updater_mut(self.euler).and_then(Updater::as_euler_mut) {
            ui.add(egui::Slider::new(&mut euler.global_acceleration.y, 0.0..=20.0).text("rise speed"));
        }

        ui.separator();
        if let Some(col) = self
            .system
            .generator_mut(self.emitter, self.col_gen)
            .and_then(|g| g.as_basic_color_mut())
        {
            crate::ui::color_ranges(ui, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_rises() {
        let mut effect = BurningEffect::new(2000).unwrap();
        let dt = 1.0 / 60.0;
        for _ in 0..120 {
            effect.update(dt);
            effect.cpu_update(dt);
        }
        let view = effect.system().render_view();
        assert!(view.alive_count() > 0);
        let mean_y: f32 = view.positions().iter().map(|p| p.y).sum::<f32>() / view.alive_count() as f32;
        assert!(mean_y > 0.0);
    }

    #[test]
    fn test_reset_restarts_clock() {
        let mut effect = BurningEffect::new(100).unwrap();
        effect.update(1.0);
        effect.cpu_update(0.5);
        effect.reset();
        assert_eq!(effect.num_alive_particles(), 0);
        assert_eq!(effect.time, 0.0);
    }
}
