use super::{ordered, particle_count, Effect};
use crate::emitter::{GeneratorId, ParticleEmitter};
use crate::error::SystemError;
use crate::generators::{BasicColorGen, BasicTimeGen, BasicVelGen, BoxPosGen};
use crate::system::{EmitterId, ParticleSystem, UpdaterId};
use crate::updaters::{BasicTimeUpdater, EulerUpdater, FloorUpdater, Updater};
use glam::Vec4;
use tracing::debug;

/// Particles shot upward from a circling nozzle, pulled down by gravity and
/// bouncing off the floor.
pub struct FountainEffect {
    system: ParticleSystem,
    emitter: EmitterId,
    pos_gen: GeneratorId,
    col_gen: GeneratorId,
    euler: UpdaterId,
    floor: UpdaterId,
    time: f64,
}

impl FountainEffect {
    /// Assemble the fountain with `num_particles` capacity (`0` for default).
    pub fn new(num_particles: usize) -> Result<Self, SystemError> {
        let count = particle_count(num_particles);
        let mut system = ParticleSystem::new(count)?;

        let (min_end, max_end) = ordered(
            Vec4::new(0.590, 0.316, 0.013, 0.0),
            Vec4::new(0.350, 0.0, 0.0, 0.0),
        );

        let mut emitter = ParticleEmitter::new(count as f32 * 0.25);
        let pos_gen = emitter.add_generator(BoxPosGen::new(Vec4::ZERO, Vec4::ZERO));
        let col_gen = emitter.add_generator(BasicColorGen::new(
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.013, 0.036, 0.153, 1.0),
            min_end,
            max_end,
        )?);
        emitter.add_generator(BasicVelGen::new(
            Vec4::new(-0.05, 0.22, -0.05, 0.0),
            Vec4::new(0.05, 0.25, 0.05, 0.0),
        )?);
        emitter.add_generator(BasicTimeGen::new(3.0, 4.0)?);
        let emitter = system.add_emitter(emitter);

        system.add_updater(BasicTimeUpdater);
        system.add_updater(Updater::BasicColor);
        let euler = system.add_updater(EulerUpdater::new(Vec4::new(0.0, -12.0, 0.0, 0.0)));
        let floor = system.add_updater(FloorUpdater::default());

        debug!(
            effect = "fountain",
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
            floor,
            time: 0.0,
        })
    }
}

impl Effect for FountainEffect {
    fn name(&self) -> &'static str {
        "fountain"
    }

    fn description(&self) -> &'static str {
        "Fountain effect where the particles are affected by gravity, collide and bounce off the floor plane."
    }

    fn update(&mut self, dt: f64) {
        self.time += dt;
        let t = self.time as f32;

        if let Some(gen) = self
            .system
            .generator_mut(self.emitter, self.pos_gen)
            .and_then(|g| g.as_box_pos_mut())
        {
            gen.pos.x = 0.1 * (t * 2.5).sin();
            gen.pos.z = 0.1 * (t * 2.5).cos();
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
        debug!(effect = "fountain", "Effect reset");
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(self.description());
        ui.separator();

        if let Some(euler) = self.system.updater_mut(self.euler).and_then(Updater::as_euler_mut) {
            ui.add(egui::Slider::new(&mut euler.global_acceleration.y, -20.0..=0.0).text("gravity"));
        }
        if let Some(floor) = self.system.updater_mut(self.floor).and_then(Updater::as_floor_mut) {
            ui.add(egui::Slider::new(&mut floor.bounce_factor, 0.0..=1.0).text("bounce"));
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
    fn test_fountain_nozzle_circles() {
        let mut effect = FountainEffect::new(1000).unwrap();
        effect.update(0.5);
        let gen = effect
            .system
            .generator_mut(effect.emitter, effect.pos_gen)
            .and_then(|g| g.as_box_pos_mut())
            .unwrap();
        assert!((gen.pos.x - 0.1 * 1.25f32.sin()).abs() < 1e-6);
        assert!((gen.pos.z - 0.1 * 1.25f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_fountain_bounces_above_floor() {
        let mut effect = FountainEffect::new(2000).unwrap();
        for _ in 0..120 {
            effect.update(1.0 / 60.0);
            effect.cpu_update(1.0 / 60.0);
        }
        assert!(effect.num_alive_particles() > 0);
        let view = effect.system().render_view();
        // One step of penetration at most.
        assert!(view.positions().iter().all(|p| p.y > -0.1));
    }
}
