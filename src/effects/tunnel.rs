use super::{particle_count, Effect};
use crate::emitter::{GeneratorId, ParticleEmitter};
use crate::error::SystemError;
use crate::generators::{BasicColorGen, BasicTimeGen, BasicVelGen, RoundPosGen};
use crate::system::{EmitterId, ParticleSystem};
use crate::updaters::{BasicTimeUpdater, EulerUpdater, Updater};
use glam::Vec4;
use tracing::debug;

/// Particles streaming along +Z out of a wobbling elliptical ring.
pub struct TunnelEffect {
    system: ParticleSystem,
    emitter: EmitterId,
    pos_gen: GeneratorId,
    col_gen: GeneratorId,
    time: f64,
}

impl TunnelEffect {
    /// Assemble the tunnel with `num_particles` capacity (`0` for default).
    pub fn new(num_particles: usize) -> Result<Self, SystemError> {
        let count = particle_count(num_particles);
        let mut system = ParticleSystem::new(count)?;

        let mut emitter = ParticleEmitter::new(count as f32 * 0.45);
        let pos_gen = emitter.add_generator(RoundPosGen::new(Vec4::ZERO, 0.15, 0.15)?);
        let col_gen = emitter.add_generator(BasicColorGen::new(
            Vec4::new(0.7, 0.0, 0.7, 1.0),
            Vec4::new(1.0, 1.0, 1.0, 1.0),
            Vec4::new(0.5, 0.0, 0.6, 0.0),
            Vec4::new(0.7, 0.5, 1.0, 0.0),
        )?);
        emitter.add_generator(BasicVelGen::new(
            Vec4::new(0.0, 0.0, 0.15, 0.0),
            Vec4::new(0.0, 0.0, 0.45, 0.0),
        )?);
        emitter.add_generator(BasicTimeGen::new(1.0, 3.5)?);
        let emitter = system.add_emitter(emitter);

        system.add_updater(BasicTimeUpdater);
        system.add_updater(Updater::BasicColor);
        system.add_updater(EulerUpdater::new(Vec4::ZERO));

        debug!(
            effect = "tunnel",
            particles = count,
            memory_mb = system.memory_usage() / (1024 * 1024),
            "Effect assembled"
        );

        Ok(Self {
            system,
            emitter,
            pos_gen,
            col_gen,
            time: 0.0,
        })
    }
}

impl Effect for TunnelEffect {
    fn name(&self) -> &'static str {
        "tunnel"
    }

    fn description(&self) -> &'static str {
        "Tunnel effect where particles stream out of a ring that wobbles and breathes."
    }

    fn update(&mut self, dt: f64) {
        self.time += dt;
        let t = self.time as f32;

        if let Some(gen) = self
            .system
            .generator_mut(self.emitter, self.pos_gen)
            .and_then(|g| g.as_round_pos_mut())
        {
            gen.center.x = 0.1 * (t * 2.5).sin();
            gen.center.y = 0.1 * (t * 2.5).cos();
            gen.rad_x = 0.15 + 0.05 * t.sin();
            gen.rad_y = 0.15 + 0.05 * t.sin() * (t * 0.5).cos();
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
        debug!(effect = "tunnel", "Effect reset");
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(self.description());
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
    fn test_tunnel_flows_forward() {
        let mut effect = TunnelEffect::new(1000).unwrap();
        for _ in 0..30 {
            effect.update(1.0 / 60.0);
            effect.cpu_update(1.0 / 60.0);
        }
        let view = effect.system().render_view();
        assert!(view.alive_count() > 0);
        assert!(view.positions().iter().all(|p| p.z >= 0.0));
    }

    #[test]
    fn test_ring_breathes() {
        let mut effect = TunnelEffect::new(100).unwrap();
        effect.update(std::f64::consts::FRAC_PI_2);
        let gen = effect
            .system
            .generator_mut(effect.emitter, effect.pos_gen)
            .and_then(|g| g.as_round_pos_mut())
            .unwrap();
        assert!((gen.rad_x - 0.2).abs() < 1e-5);
    }
}
