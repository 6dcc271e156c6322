use super::{particle_count, Effect};
use crate::emitter::{GeneratorId, ParticleEmitter};
use crate::error::SystemError;
use crate::generators::{BasicColorGen, BasicTimeGen, BoxPosGen, SphereVelGen};
use crate::system::{EmitterId, ParticleSystem, UpdaterId};
use crate::updaters::{
    Attractor, AttractorUpdater, BasicTimeUpdater, EulerUpdater, RangeColorUpdater, Updater,
};
use glam::{Vec3, Vec4};
use tracing::debug;

const EMITTERS: usize = 3;

/// Per-emitter orbit: `(x amplitude, x freq, y freq, z freq)`.
const ORBITS: [(f32, f32, f32, f32); EMITTERS] = [
    (0.15, 2.5, 2.5, 2.5),
    (-0.15, 2.0, 2.0, 1.5),
    (-0.15, 1.5, 2.5, 1.75),
];

/// Three orbiting emitters feeding four attractor points.
pub struct AttractorEffect {
    system: ParticleSystem,
    emitters: [(EmitterId, GeneratorId, GeneratorId); EMITTERS],
    attractors: UpdaterId,
    z_scale: f32,
    time: f64,
}

impl AttractorEffect {
    /// Assemble the effect with `num_particles` capacity (`0` for default).
    pub fn new(num_particles: usize) -> Result<Self, SystemError> {
        let count = particle_count(num_particles);
        let mut system = ParticleSystem::new(count)?;

        let colors = BasicColorGen::new(
            Vec4::new(0.99, 0.99, 0.99, 1.0),
            Vec4::new(0.99, 0.99, 1.0, 1.0),
            Vec4::new(0.99, 0.99, 0.99, 0.0),
            Vec4::new(0.99, 0.99, 1.0, 0.25),
        )?;
        let velocity = SphereVelGen::new(0.1, 0.1)?;
        let lifetime = BasicTimeGen::new(1.6, 4.0)?;

        let mut ids = Vec::with_capacity(EMITTERS);
        for z in [-0.25, 0.25, 0.25] {
            let mut emitter = ParticleEmitter::new(count as f32 * 0.1);
            let pos = emitter.add_generator(BoxPosGen::new(
                Vec4::new(0.0, 0.0, z, 0.0),
                Vec4::ZERO,
            ));
            let col = emitter.add_generator(colors.clone());
            emitter.add_generator(velocity.clone());
            emitter.add_generator(lifetime.clone());
            ids.push((system.add_emitter(emitter), pos, col));
        }
        let emitters = [ids[0], ids[1], ids[2]];

        system.add_updater(BasicTimeUpdater);
        system.add_updater(Updater::VelColor(RangeColorUpdater::new(
            Vec4::new(-0.5, -0.5, -0.5, 0.0),
            Vec4::new(2.0, 2.0, 2.0, 2.0),
        )?));

        let attractors = AttractorUpdater::new()
            .with_attractor(Attractor::new(Vec3::new(0.0, 0.0, 0.75), 1.0))?
            .with_attractor(Attractor::new(Vec3::new(0.0, 0.0, -0.75), 1.0))?
            .with_attractor(Attractor::new(Vec3::new(0.0, 0.75, 0.0), 1.0))?
            .with_attractor(Attractor::new(Vec3::new(0.0, -0.75, 0.0), 1.0))?;
        let attractors = system.add_updater(attractors);
        system.add_updater(EulerUpdater::new(Vec4::ZERO));

        debug!(
            effect = "attractors",
            particles = count,
            memory_mb = system.memory_usage() / (1024 * 1024),
            "Effect assembled"
        );

        Ok(Self {
            system,
            emitters,
            attractors,
            z_scale: 1.0,
            time: 0.0,
        })
    }

    /// Depth of the emitter orbits, `0..=1`.
    pub fn z_scale(&self) -> f32 {
        self.z_scale
    }

    /// Set the depth of the emitter orbits.
    pub fn set_z_scale(&mut self, z_scale: f32) {
        self.z_scale = z_scale.clamp(0.0, 1.0);
    }

    /// The attractor updater, for live strength changes.
    pub fn attractors_mut(&mut self) -> Option<&mut AttractorUpdater> {
        self.system
            .updater_mut(self.attractors)
            .and_then(Updater::as_attractor_mut)
    }
}

impl Effect for AttractorEffect {
    fn name(&self) -> &'static str {
        "attractors"
    }

    fn description(&self) -> &'static str {
        "Effect with four attractor points at different positions which exert a force on the particles."
    }

    fn update(&mut self, dt: f64) {
        self.time += dt;
        let t = self.time as f32;

        for (&(emitter, pos, _), &(amp_x, fx, fy, fz)) in self.emitters.iter().zip(&ORBITS) {
            if let Some(gen) = self
                .system
                .generator_mut(emitter, pos)
                .and_then(|g| g.as_box_pos_mut())
            {
                gen.pos.x = amp_x * (t * fx).sin();
                gen.pos.y = 0.15 * (t * fy).cos();
                gen.pos.z = self.z_scale * 0.25 * (t * fz).cos();
            }
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
        debug!(effect = "attractors", "Effect reset");
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(self.description());
        ui.separator();

        ui.add(egui::Slider::new(&mut self.z_scale, 0.0..=1.0).text("z scale"));

        ui.separator();
        let (emitter, _, col_gen) = self.emitters[0];
        let mut edited = None;
        if let Some(col) = self
            .system
            .generator_mut(emitter, col_gen)
            .and_then(|g| g.as_basic_color_mut())
        {
            if crate::ui::color_ranges(ui, col) {
                edited = Some(col.clone());
            }
        }
        // The emitters share one palette.
        if let Some(col) = edited {
            for &(emitter, _, col_gen) in &self.emitters[1..] {
                if let Some(other) = self
                    .system
                    .generator_mut(emitter, col_gen)
                    .and_then(|g| g.as_basic_color_mut())
                {
                    *other = col.clone();
                }
            }
        }

        ui.separator();
        if let Some(attractors) = self.attractors_mut() {
            for i in 0..attractors.len() {
                if let Some(a) = attractors.get_mut(i) {
                    ui.add(egui::Slider::new(&mut a.strength, -1.0..=1.0).text(attractor_label(i)));
                }
            }
        }
    }
}

/// Slider label for attractor `index`, counted from one.
#[cfg(any(feature = "egui", test))]
fn attractor_label(index: usize) -> String {
    format!("attractor {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attractor_labels_count_from_one() {
        assert_eq!(attractor_label(0), "attractor 1");
        assert_eq!(attractor_label(3), "attractor 4");
    }

    #[test]
    fn test_three_emitters_four_attractors() {
        let mut effect = AttractorEffect::new(1000).unwrap();
        assert_eq!(effect.system().emitters().len(), 3);
        assert_eq!(effect.attractors_mut().unwrap().len(), 4);
        assert_eq!(effect.system().emitters()[0].emit_rate(), 100.0);
    }

    #[test]
    fn test_z_scale_flattens_orbits() {
        let mut effect = AttractorEffect::new(1000).unwrap();
        effect.set_z_scale(0.0);
        effect.update(0.3);
        let emitters = effect.emitters;
        for (emitter, pos, _) in emitters {
            let gen = effect
                .system
                .generator_mut(emitter, pos)
                .and_then(|g| g.as_box_pos_mut())
                .unwrap();
            assert_eq!(gen.pos.z, 0.0);
        }
    }

    #[test]
    fn test_runs_and_stays_finite() {
        let mut effect = AttractorEffect::new(3000).unwrap();
        for _ in 0..60 {
            effect.update(1.0 / 60.0);
            effect.cpu_update(1.0 / 60.0);
        }
        assert!(effect.num_alive_particles() > 0);
        let view = effect.system().render_view();
        assert!(view.positions().iter().all(|p| p.is_finite()));
        assert!(view.colors().iter().all(|c| c.is_finite()));
    }
}
