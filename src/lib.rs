//! # particle-fx - Struct-of-Arrays Particle Engine
//!
//! CPU particle simulation with composable generators and updaters.
//!
//! Every particle attribute lives in its own contiguous array and live
//! particles are packed into a prefix of the store, so each step streams
//! through exactly the data it touches. The resulting positions and colors
//! are ready to upload to a GPU vertex buffer as-is.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_fx::prelude::*;
//!
//! fn main() -> Result<(), SystemError> {
//!     let mut system = ParticleSystem::new(10_000)?
//!         .with_emitter(
//!             ParticleEmitter::new(2_500.0)
//!                 .with_generator(BoxPosGen::new(Vec4::ZERO, Vec4::new(0.1, 0.0, 0.1, 0.0)))
//!                 .with_generator(BasicVelGen::new(
//!                     Vec4::new(-0.05, 0.2, -0.05, 0.0),
//!                     Vec4::new(0.05, 0.25, 0.05, 0.0),
//!                 )?)
//!                 .with_generator(BasicTimeGen::new(3.0, 4.0)?),
//!         )
//!         .with_updater(BasicTimeUpdater)
//!         .with_updater(EulerUpdater::new(Vec4::new(0.0, -9.8, 0.0, 0.0)))
//!         .with_updater(FloorUpdater::default());
//!
//!     for _ in 0..600 {
//!         system.update(1.0 / 60.0);
//!     }
//!     println!("{} particles alive", system.num_alive_particles());
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particle Store
//!
//! [`ParticleData`] holds a fixed number of slots. Live particles occupy
//! `[0, alive_count)`; killing swaps the last live row into the hole.
//!
//! ### Generators
//!
//! A [`Generator`] initializes freshly spawned particles: position, color,
//! velocity and lifetime, each from a configured random range.
//!
//! ### Updaters
//!
//! An [`Updater`] runs over the live particles every step. They execute in
//! registration order, so forces go before the integrator:
//!
//! ```ignore
//! .with_updater(BasicTimeUpdater)           // Age and kill
//! .with_updater(Updater::BasicColor)        // Fade colors
//! .with_updater(attractors)                 // Accumulate forces
//! .with_updater(EulerUpdater::new(gravity)) // Integrate
//! .with_updater(FloorUpdater::default())    // Collide
//! ```
//!
//! ### Effects
//!
//! [`effects`] bundles ready-made systems (fountain, attractors, tunnel,
//! fire) with animated emitters:
//!
//! ```ignore
//! let mut effect = create_effect("burning".parse()?, 100_000)?;
//! effect.update(dt);
//! effect.cpu_update(dt);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Adds |
//! |---------|------|
//! | `egui` | `Effect::ui` and the [`ui`](crate::ui) widgets |
//! | `serde` | `Serialize`/`Deserialize` on generators, updaters and [`EffectKind`] |

pub mod data;
pub mod effects;
mod emitter;
pub mod error;
pub mod generators;
mod random;
mod system;
pub mod time;
pub mod updaters;
mod view;

#[cfg(feature = "egui")]
pub mod ui;

pub use bytemuck;
pub use data::ParticleData;
pub use effects::{create_effect, Effect, EffectKind, DEFAULT_PARTICLE_COUNT};
pub use emitter::{GeneratorId, ParticleEmitter};
pub use error::{AllocError, ConfigError, SystemError};
pub use generators::{
    BasicColorGen, BasicTimeGen, BasicVelGen, BoxPosGen, Generator, RoundPosGen, SpherePosGen,
    SphereVelGen, VelFromPosGen,
};
pub use glam::{Vec3, Vec4};
pub use random::ParticleRng;
pub use system::{EmitterId, ParticleSystem, UpdaterId};
pub use updaters::{
    Attractor, AttractorUpdater, BasicTimeUpdater, EulerUpdater, FloorUpdater, RangeColorUpdater,
    Updater,
};
pub use view::{ParticleVertex, RenderView};

/// Common imports.
pub mod prelude {
    pub use crate::data::ParticleData;
    pub use crate::effects::{create_effect, Effect, EffectKind};
    pub use crate::emitter::{GeneratorId, ParticleEmitter};
    pub use crate::error::{ConfigError, SystemError};
    pub use crate::generators::{
        BasicColorGen, BasicTimeGen, BasicVelGen, BoxPosGen, Generator, RoundPosGen, SpherePosGen,
        SphereVelGen, VelFromPosGen,
    };
    pub use crate::system::{EmitterId, ParticleSystem, UpdaterId};
    pub use crate::updaters::{
        Attractor, AttractorUpdater, BasicTimeUpdater, EulerUpdater, FloorUpdater,
        RangeColorUpdater, Updater,
    };
    pub use crate::view::{ParticleVertex, RenderView};
    pub use crate::{Vec3, Vec4};

    #[cfg(feature = "egui")]
    pub use egui;
}
