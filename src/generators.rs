//! Particle generators.
//!
//! A generator fills freshly spawned slots `[start, end)` with attribute
//! values drawn from its configured ranges. Each generator writes only the
//! arrays it owns, so the order generators run in never changes the result
//! for a fixed seed.
//!
//! # Generator Types
//!
//! | Type | Writes | Description |
//! |------|--------|-------------|
//! | [`Generator::BoxPos`] | position | Uniform in an axis-aligned box |
//! | [`Generator::RoundPos`] | position | On an ellipse in the XY plane |
//! | [`Generator::SpherePos`] | position | Inside a sphere |
//! | [`Generator::BasicColor`] | start/end color | Uniform per RGBA channel |
//! | [`Generator::BasicVel`] | velocity | Uniform per component |
//! | [`Generator::SphereVel`] | velocity | Random direction, speed range |
//! | [`Generator::VelFromPos`] | velocity | Scaled offset from a point |
//! | [`Generator::BasicTime`] | time | Lifetime range |
//!
//! # Example
//!
//! ```ignore
//! let emitter = ParticleEmitter::new(250.0)
//!     .with_generator(BoxPosGen::new(Vec4::ZERO, Vec4::new(0.1, 0.0, 0.1, 0.0)))
//!     .with_generator(BasicTimeGen::new(3.0, 4.0)?);
//! ```

use crate::data::ParticleData;
use crate::error::{check_range, check_range4, ConfigError};
use crate::random::ParticleRng;
use glam::Vec4;
use std::ops::Range;

/// Shortest lifetime a particle can be given, in seconds.
///
/// Keeps the stored inverse lifetime finite when a range reaches zero.
pub const MIN_LIFETIME: f32 = 1.0e-4;

/// Spawn positions uniformly inside `pos +- max_start_pos_offset`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxPosGen {
    /// Box center.
    pub pos: Vec4,
    /// Half extents of the box.
    pub max_start_pos_offset: Vec4,
}

impl BoxPosGen {
    /// Box around `pos`; negative offsets are treated as their magnitude.
    pub fn new(pos: Vec4, max_start_pos_offset: Vec4) -> Self {
        Self {
            pos,
            max_start_pos_offset: max_start_pos_offset.abs(),
        }
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        let off = self.max_start_pos_offset.truncate();
        let center = self.pos.truncate();
        let min = (center - off).extend(1.0);
        let max = (center + off).extend(1.0);

        for p in &mut data.pos[range] {
            *p = rng.vec4(min, max);
        }
    }
}

/// Spawn positions on an ellipse in the XY plane around `center`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundPosGen {
    /// Ellipse center.
    pub center: Vec4,
    /// Radius along X.
    pub rad_x: f32,
    /// Radius along Y.
    pub rad_y: f32,
}

impl RoundPosGen {
    /// Ellipse with the given radii. Radii must be finite and non-negative.
    pub fn new(center: Vec4, rad_x: f32, rad_y: f32) -> Result<Self, ConfigError> {
        check_range("ellipse radius", 0.0, rad_x)?;
        check_range("ellipse radius", 0.0, rad_y)?;
        Ok(Self { center, rad_x, rad_y })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        let center = self.center.truncate();
        for p in &mut data.pos[range] {
            *p = (center + rng.on_ellipse(self.rad_x, self.rad_y)).extend(1.0);
        }
    }
}

/// Spawn positions inside a sphere.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpherePosGen {
    /// Sphere center.
    pub center: Vec4,
    /// Sphere radius.
    pub radius: f32,
}

impl SpherePosGen {
    /// Sphere of `radius` around `center`. The radius must be finite and
    /// non-negative.
    pub fn new(center: Vec4, radius: f32) -> Result<Self, ConfigError> {
        check_range("sphere radius", 0.0, radius)?;
        Ok(Self { center, radius })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        let center = self.center.truncate();
        for p in &mut data.pos[range] {
            *p = (center + rng.in_sphere(self.radius)).extend(1.0);
        }
    }
}

/// Random start and end colors, each channel uniform in its range.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicColorGen {
    /// Lower bound of the birth color.
    pub min_start_col: Vec4,
    /// Upper bound of the birth color.
    pub max_start_col: Vec4,
    /// Lower bound of the death color.
    pub min_end_col: Vec4,
    /// Upper bound of the death color.
    pub max_end_col: Vec4,
}

impl BasicColorGen {
    /// Validated color ranges; every min channel must be `<=` its max.
    pub fn new(
        min_start_col: Vec4,
        max_start_col: Vec4,
        min_end_col: Vec4,
        max_end_col: Vec4,
    ) -> Result<Self, ConfigError> {
        check_range4("start color", min_start_col, max_start_col)?;
        check_range4("end color", min_end_col, max_end_col)?;
        Ok(Self {
            min_start_col,
            max_start_col,
            min_end_col,
            max_end_col,
        })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        let starts = &mut data.start_col[range.clone()];
        let ends = &mut data.end_col[range];
        for (start, end) in starts.iter_mut().zip(ends.iter_mut()) {
            *start = rng.vec4(self.min_start_col, self.max_start_col);
            *end = rng.vec4(self.min_end_col, self.max_end_col);
        }
    }
}

/// Velocity uniform per component.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicVelGen {
    /// Lower velocity bound.
    pub min_start_vel: Vec4,
    /// Upper velocity bound.
    pub max_start_vel: Vec4,
}

impl BasicVelGen {
    /// Validated velocity range.
    pub fn new(min_start_vel: Vec4, max_start_vel: Vec4) -> Result<Self, ConfigError> {
        check_range4("start velocity", min_start_vel, max_start_vel)?;
        Ok(Self {
            min_start_vel,
            max_start_vel,
        })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        for v in &mut data.vel[range] {
            *v = rng.vec4(self.min_start_vel, self.max_start_vel);
        }
    }
}

/// Velocity in a random direction with a speed in `[min_vel, max_vel]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereVelGen {
    /// Minimum speed.
    pub min_vel: f32,
    /// Maximum speed.
    pub max_vel: f32,
}

impl SphereVelGen {
    /// Validated speed range.
    pub fn new(min_vel: f32, max_vel: f32) -> Result<Self, ConfigError> {
        check_range("sphere speed", min_vel, max_vel)?;
        Ok(Self { min_vel, max_vel })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        for v in &mut data.vel[range] {
            let speed = rng.range(self.min_vel, self.max_vel);
            *v = rng.sphere_direction(speed).extend(0.0);
        }
    }
}

/// Velocity pointing away from `offset`, scaled by a random factor.
///
/// Reads positions, so register it after a position generator.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelFromPosGen {
    /// Point velocities radiate from.
    pub offset: Vec4,
    /// Minimum scale factor.
    pub min_scale: f32,
    /// Maximum scale factor.
    pub max_scale: f32,
}

impl VelFromPosGen {
    /// Validated scale range.
    pub fn new(offset: Vec4, min_scale: f32, max_scale: f32) -> Result<Self, ConfigError> {
        check_range("velocity scale", min_scale, max_scale)?;
        Ok(Self {
            offset,
            min_scale,
            max_scale,
        })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        let origin = self.offset.truncate();
        let positions = &data.pos[range.clone()];
        for (v, p) in data.vel[range].iter_mut().zip(positions) {
            let scale = rng.range(self.min_scale, self.max_scale);
            *v = ((p.truncate() - origin) * scale).extend(0.0);
        }
    }
}

/// Lifetime uniform in `[min_time, max_time]` seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicTimeGen {
    /// Shortest lifetime.
    pub min_time: f32,
    /// Longest lifetime.
    pub max_time: f32,
}

impl Default for BasicTimeGen {
    fn default() -> Self {
        Self {
            min_time: 1.0,
            max_time: 1.0,
        }
    }
}

impl BasicTimeGen {
    /// Validated lifetime range.
    pub fn new(min_time: f32, max_time: f32) -> Result<Self, ConfigError> {
        check_range("lifetime", min_time, max_time)?;
        Ok(Self { min_time, max_time })
    }

    fn generate(&self, data: &mut ParticleData, range: Range<usize>, rng: &mut ParticleRng) {
        for t in &mut data.time[range] {
            let life = rng.range(self.min_time, self.max_time).max(MIN_LIFETIME);
            *t = Vec4::new(life, life, 0.0, 1.0 / life);
        }
    }
}

/// All generator kinds.
///
/// Generators run in registration order inside an emitter. They are pure
/// fills: none of them reads or changes `alive_count`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generator {
    /// Position in a box.
    BoxPos(BoxPosGen),
    /// Position on an ellipse.
    RoundPos(RoundPosGen),
    /// Position in a sphere.
    SpherePos(SpherePosGen),
    /// Start and end colors.
    BasicColor(BasicColorGen),
    /// Velocity from a box range.
    BasicVel(BasicVelGen),
    /// Velocity from a direction and speed range.
    SphereVel(SphereVelGen),
    /// Velocity derived from position.
    VelFromPos(VelFromPosGen),
    /// Lifetime.
    BasicTime(BasicTimeGen),
}

impl Generator {
    /// Fill slots `range` of `data`.
    ///
    /// `dt` is the step being emitted for; the built-in generators ignore it.
    pub fn generate(
        &self,
        _dt: f32,
        data: &mut ParticleData,
        range: Range<usize>,
        rng: &mut ParticleRng,
    ) {
        if range.is_empty() {
            return;
        }
        match self {
            Generator::BoxPos(g) => g.generate(data, range, rng),
            Generator::RoundPos(g) => g.generate(data, range, rng),
            Generator::SpherePos(g) => g.generate(data, range, rng),
            Generator::BasicColor(g) => g.generate(data, range, rng),
            Generator::BasicVel(g) => g.generate(data, range, rng),
            Generator::SphereVel(g) => g.generate(data, range, rng),
            Generator::VelFromPos(g) => g.generate(data, range, rng),
            Generator::BasicTime(g) => g.generate(data, range, rng),
        }
    }

    /// Display name of the generator kind.
    pub fn name(&self) -> &'static str {
        match self {
            Generator::BoxPos(_) => "Box Position",
            Generator::RoundPos(_) => "Round Position",
            Generator::SpherePos(_) => "Sphere Position",
            Generator::BasicColor(_) => "Color",
            Generator::BasicVel(_) => "Velocity",
            Generator::SphereVel(_) => "Sphere Velocity",
            Generator::VelFromPos(_) => "Velocity From Position",
            Generator::BasicTime(_) => "Lifetime",
        }
    }

    /// The box position parameters, if this is [`Generator::BoxPos`].
    pub fn as_box_pos_mut(&mut self) -> Option<&mut BoxPosGen> {
        match self {
            Generator::BoxPos(g) => Some(g),
            _ => None,
        }
    }

    /// The ellipse parameters, if this is [`Generator::RoundPos`].
    pub fn as_round_pos_mut(&mut self) -> Option<&mut RoundPosGen> {
        match self {
            Generator::RoundPos(g) => Some(g),
            _ => None,
        }
    }

    /// The sphere parameters, if this is [`Generator::SpherePos`].
    pub fn as_sphere_pos_mut(&mut self) -> Option<&mut SpherePosGen> {
        match self {
            Generator::SpherePos(g) => Some(g),
            _ => None,
        }
    }

    /// The color ranges, if this is [`Generator::BasicColor`].
    pub fn as_basic_color_mut(&mut self) -> Option<&mut BasicColorGen> {
        match self {
            Generator::BasicColor(g) => Some(g),
            _ => None,
        }
    }
}

macro_rules! impl_from_gen {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Generator {
                fn from(g: $ty) -> Self {
                    Generator::$variant(g)
                }
            }
        )*
    };
}

impl_from_gen! {
    BoxPosGen => BoxPos,
    RoundPosGen => RoundPos,
    SpherePosGen => SpherePos,
    BasicColorGen => BasicColor,
    BasicVelGen => BasicVel,
    SphereVelGen => SphereVel,
    VelFromPosGen => VelFromPos,
    BasicTimeGen => BasicTime,
}
