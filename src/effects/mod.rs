//! Ready-made effects.
//!
//! An effect assembles a [`ParticleSystem`] from generators and updaters
//! and animates a few of their parameters over time. Pick one by name with
//! [`EffectKind`] and [`create_effect`]:
//!
//! ```ignore
//! let kind: EffectKind = "fountain".parse()?;
//! let mut effect = create_effect(kind, 0)?; // 0 = default particle count
//!
//! loop {
//!     effect.update(dt);     // animate emitters
//!     effect.cpu_update(dt); // step the simulation
//!     upload(effect.system().render_view());
//! }
//! ```
//!
//! | Effect | Description |
//! |--------|-------------|
//! | `fountain` | Gravity and a bouncing floor |
//! | `attractors` | Three emitters orbiting four attractor points |
//! | `tunnel` | Particles streaming out of a wobbling ring |
//! | `burning` | Fire rising from a sphere |

mod attractor;
mod burning;
mod fountain;
mod tunnel;

pub use attractor::AttractorEffect;
pub use burning::BurningEffect;
pub use fountain::FountainEffect;
pub use tunnel::TunnelEffect;

use crate::error::{ConfigError, SystemError};
use crate::system::ParticleSystem;
use glam::Vec4;
use std::fmt;
use std::str::FromStr;

/// Particle count used when an effect is created with `0` particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 500_000;

/// Resolve the `0 = default` convention.
pub(crate) fn particle_count(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_PARTICLE_COUNT
    } else {
        requested
    }
}

/// Order two color bounds component-wise.
pub(crate) fn ordered(a: Vec4, b: Vec4) -> (Vec4, Vec4) {
    (a.min(b), a.max(b))
}

/// A named, animated particle system.
pub trait Effect {
    /// Short identifier, e.g. `"fountain"`.
    fn name(&self) -> &'static str;

    /// One-sentence description.
    fn description(&self) -> &'static str;

    /// Advance the effect clock by `dt` and animate emitter parameters.
    ///
    /// Does not step the simulation; see [`Effect::cpu_update`].
    fn update(&mut self, dt: f64);

    /// The underlying system.
    fn system(&self) -> &ParticleSystem;

    /// The underlying system, mutably.
    fn system_mut(&mut self) -> &mut ParticleSystem;

    /// Step the simulation by `dt`.
    fn cpu_update(&mut self, dt: f64) {
        self.system_mut().update(dt);
    }

    /// Kill every particle.
    fn reset(&mut self) {
        self.system_mut().reset();
    }

    /// Capacity of the system.
    fn num_all_particles(&self) -> usize {
        self.system().num_all_particles()
    }

    /// Live particles.
    fn num_alive_particles(&self) -> usize {
        self.system().num_alive_particles()
    }

    /// Smoothed alive fraction.
    fn alive_to_all_ratio(&self) -> f32 {
        self.system().alive_to_all_ratio()
    }

    /// Draw the effect's settings.
    #[cfg(feature = "egui")]
    fn ui(&mut self, ui: &mut egui::Ui);
}

/// The built-in effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EffectKind {
    /// [`FountainEffect`].
    Fountain,
    /// [`AttractorEffect`].
    Attractors,
    /// [`TunnelEffect`].
    Tunnel,
    /// [`BurningEffect`].
    Burning,
}

impl EffectKind {
    /// Every built-in effect.
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Fountain,
        EffectKind::Attractors,
        EffectKind::Tunnel,
        EffectKind::Burning,
    ];

    /// Name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Fountain => "fountain",
            EffectKind::Attractors => "attractors",
            EffectKind::Tunnel => "tunnel",
            EffectKind::Burning => "burning",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownEffect(s.to_string()))
    }
}

/// Build an effect with `num_particles` capacity (`0` for the default).
pub fn create_effect(kind: EffectKind, num_particles: usize) -> Result<Box<dyn Effect>, SystemError> {
    let effect: Box<dyn Effect> = match kind {
        EffectKind::Fountain => Box::new(FountainEffect::new(num_particles)?),
        EffectKind::Attractors => Box::new(AttractorEffect::new(num_particles)?),
        EffectKind::Tunnel => Box::new(TunnelEffect::new(num_particles)?),
        EffectKind::Burning => Box::new(BurningEffect::new(num_particles)?),
    };
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("fountain".parse::<EffectKind>().unwrap(), EffectKind::Fountain);
        assert_eq!(" Tunnel ".parse::<EffectKind>().unwrap(), EffectKind::Tunnel);
        assert!(matches!(
            "smoke".parse::<EffectKind>(),
            Err(ConfigError::UnknownEffect(name)) if name == "smoke"
        ));
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.to_string().parse::<EffectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_default_count() {
        assert_eq!(particle_count(0), DEFAULT_PARTICLE_COUNT);
        assert_eq!(particle_count(42), 42);
    }

    #[test]
    fn test_ordered_bounds() {
        let (lo, hi) = ordered(Vec4::new(0.59, 0.0, 1.0, 0.0), Vec4::new(0.35, 0.3, 1.0, 0.0));
        assert_eq!(lo, Vec4::new(0.35, 0.0, 1.0, 0.0));
        assert_eq!(hi, Vec4::new(0.59, 0.3, 1.0, 0.0));
    }
}
