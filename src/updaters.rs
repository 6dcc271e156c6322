//! Particle updaters.
//!
//! Updaters transform the live prefix `[0, alive_count)` once per step, in
//! the order they were registered on the system. Order matters: force
//! updaters ([`Updater::Attractor`]) add to `acceleration`, and
//! [`Updater::Euler`] folds that acceleration into velocity and position.
//! Register force updaters before the integrator.
//!
//! # Updater Types
//!
//! | Type | Reads | Writes |
//! |------|-------|--------|
//! | [`Updater::Euler`] | acc, vel | acc, vel, pos |
//! | [`Updater::Floor`] | pos, acc, vel | acc, vel |
//! | [`Updater::Attractor`] | pos | acc |
//! | [`Updater::BasicColor`] | start/end color, time | color |
//! | [`Updater::PosColor`] | pos, start/end color, time | color |
//! | [`Updater::VelColor`] | vel, start/end color, time | color |
//! | [`Updater::BasicTime`] | time | time, kills |
//!
//! # Clamps
//!
//! Numeric edge cases are clamped in place, never reported:
//!
//! - attractor distance² is raised to [`MIN_ATTRACTOR_DIST_SQ`]
//! - color normalization ranges are raised to [`MIN_COLOR_RANGE`]

use crate::data::ParticleData;
use crate::error::{check_range4, ConfigError};
use glam::{Vec3, Vec4};

/// Smallest squared distance an attractor divides by.
pub const MIN_ATTRACTOR_DIST_SQ: f32 = 1.0e-4;

/// Smallest per-channel span used when normalizing position or velocity
/// into a color.
pub const MIN_COLOR_RANGE: f32 = 1.0e-6;

/// Maximum number of points an [`AttractorUpdater`] holds.
pub const MAX_ATTRACTORS: usize = 8;

// ========== Physics ==========

/// Semi-implicit Euler integration with a global acceleration.
///
/// ```text
/// acc += global_acceleration * dt
/// vel += acc * dt
/// pos += vel * dt
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerUpdater {
    /// Acceleration applied to every particle, e.g. gravity.
    pub global_acceleration: Vec4,
}

impl EulerUpdater {
    /// Integrator with the given global acceleration (`w` is ignored).
    pub fn new(global_acceleration: Vec4) -> Self {
        Self {
            global_acceleration: global_acceleration.truncate().extend(0.0),
        }
    }

    fn update(&self, dt: f32, data: &mut ParticleData) {
        let n = data.alive_count();
        let global = self.global_acceleration.truncate().extend(0.0) * dt;

        for a in &mut data.acc[..n] {
            *a += global;
        }
        for (v, a) in data.vel[..n].iter_mut().zip(&data.acc[..n]) {
            *v += *a * dt;
        }
        for (p, v) in data.pos[..n].iter_mut().zip(&data.vel[..n]) {
            *p += *v * dt;
        }
    }
}

/// One-sided bounce off the plane `y = floor_y`.
///
/// Below the floor, downward acceleration is removed and the vertical
/// velocity is reflected with `bounce_factor`. Penetration is not resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorUpdater {
    /// Height of the floor plane.
    pub floor_y: f32,
    /// Fraction of vertical speed kept after a bounce.
    pub bounce_factor: f32,
}

impl Default for FloorUpdater {
    fn default() -> Self {
        Self {
            floor_y: 0.0,
            bounce_factor: 0.5,
        }
    }
}

impl FloorUpdater {
    /// Floor at `floor_y` with the given bounce factor.
    pub fn new(floor_y: f32, bounce_factor: f32) -> Self {
        Self {
            floor_y,
            bounce_factor,
        }
    }

    fn update(&self, data: &mut ParticleData) {
        let n = data.alive_count();
        let positions = &data.pos[..n];
        let accels = &mut data.acc[..n];
        let vels = &mut data.vel[..n];

        for ((p, a), v) in positions.iter().zip(accels.iter_mut()).zip(vels.iter_mut()) {
            if p.y < self.floor_y {
                if a.y < 0.0 {
                    a.y = 0.0;
                }
                v.y -= (1.0 + self.bounce_factor) * v.y;
            }
        }
    }
}

/// A point that pulls (or, with negative strength, pushes) particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attractor {
    /// Attractor position.
    pub position: Vec3,
    /// Force scale; negative values repel.
    pub strength: f32,
}

impl Attractor {
    /// Attractor at `position` with `strength`.
    pub fn new(position: Vec3, strength: f32) -> Self {
        Self { position, strength }
    }
}

/// Inverse-square attraction toward up to [`MAX_ATTRACTORS`] points.
///
/// For every live particle and attractor:
///
/// ```text
/// offset = attractor - position
/// acc   += offset * strength / max(|offset|², MIN_ATTRACTOR_DIST_SQ)
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Attractor>", into = "Vec<Attractor>")
)]
pub struct AttractorUpdater {
    attractors: Vec<Attractor>,
}

impl TryFrom<Vec<Attractor>> for AttractorUpdater {
    type Error = ConfigError;

    fn try_from(attractors: Vec<Attractor>) -> Result<Self, Self::Error> {
        let mut updater = AttractorUpdater::new();
        for attractor in attractors {
            updater.add(attractor)?;
        }
        Ok(updater)
    }
}

impl From<AttractorUpdater> for Vec<Attractor> {
    fn from(updater: AttractorUpdater) -> Self {
        updater.attractors
    }
}

impl AttractorUpdater {
    /// Empty attractor set.
    pub fn new() -> Self {
        Self {
            attractors: Vec::with_capacity(MAX_ATTRACTORS),
        }
    }

    /// Add an attractor, builder style.
    pub fn with_attractor(mut self, attractor: Attractor) -> Result<Self, ConfigError> {
        self.add(attractor)?;
        Ok(self)
    }

    /// Add an attractor. Fails once [`MAX_ATTRACTORS`] are held.
    pub fn add(&mut self, attractor: Attractor) -> Result<usize, ConfigError> {
        if self.attractors.len() >= MAX_ATTRACTORS {
            return Err(ConfigError::TooManyAttractors {
                limit: MAX_ATTRACTORS,
            });
        }
        if !attractor.position.is_finite() || !attractor.strength.is_finite() {
            return Err(ConfigError::NonFiniteValue { what: "attractor" });
        }
        self.attractors.push(attractor);
        Ok(self.attractors.len() - 1)
    }

    /// Number of attractors.
    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    /// Whether no attractors are configured.
    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }

    /// Attractor by index.
    pub fn get(&self, id: usize) -> Option<&Attractor> {
        self.attractors.get(id)
    }

    /// Mutable attractor by index, for live tweaking.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Attractor> {
        self.attractors.get_mut(id)
    }

    /// All attractors.
    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    fn update(&self, data: &mut ParticleData) {
        let n = data.alive_count();
        for (p, a) in data.pos[..n].iter().zip(data.acc[..n].iter_mut()) {
            let pos = p.truncate();
            let mut sum = Vec3::ZERO;
            for attractor in &self.attractors {
                let offset = attractor.position - pos;
                let dist_sq = offset.length_squared().max(MIN_ATTRACTOR_DIST_SQ);
                sum += offset * (attractor.strength / dist_sq);
            }
            *a += sum.extend(0.0);
        }
    }
}

// ========== Color ==========

fn lerp_alpha(start: Vec4, end: Vec4, t: f32) -> f32 {
    start.w + (end.w - start.w) * t
}

/// Color from a normalized value box, with alpha from the start/end lerp.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeColorUpdater {
    /// Value mapped to RGB 0.
    pub min: Vec4,
    /// Value mapped to RGB 1.
    pub max: Vec4,
}

impl Default for RangeColorUpdater {
    fn default() -> Self {
        Self {
            min: Vec4::ZERO,
            max: Vec4::ONE,
        }
    }
}

impl RangeColorUpdater {
    /// Validated normalization box.
    pub fn new(min: Vec4, max: Vec4) -> Result<Self, ConfigError> {
        check_range4("color normalization", min, max)?;
        Ok(Self { min, max })
    }

    fn update(&self, source: Source, data: &mut ParticleData) {
        let n = data.alive_count();
        let span = (self.max - self.min).truncate().max(Vec3::splat(MIN_COLOR_RANGE));
        let min = self.min.truncate();
        let values = match source {
            Source::Position => &data.pos[..n],
            Source::Velocity => &data.vel[..n],
        };

        for (i, (c, v)) in data.col[..n].iter_mut().zip(values).enumerate() {
            let rgb = (v.truncate() - min) / span;
            let alpha = lerp_alpha(data.start_col[i], data.end_col[i], data.time[i].z);
            *c = rgb.extend(alpha);
        }
    }
}

#[derive(Clone, Copy)]
enum Source {
    Position,
    Velocity,
}

// ========== Lifetime ==========

/// Ages particles and kills the ones whose remaining life drops below zero.
///
/// ```text
/// time.x -= dt
/// time.z  = 1 - time.x * time.w
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicTimeUpdater;

impl BasicTimeUpdater {
    fn update(&self, dt: f32, data: &mut ParticleData) {
        let n = data.alive_count();
        for t in &mut data.time[..n] {
            t.x -= dt;
            t.z = 1.0 - t.x * t.w;
        }

        // A kill swaps the last live row into `i`, so `i` is rechecked
        // rather than advanced.
        let mut i = 0;
        while i < data.alive_count() {
            if data.time[i].x < 0.0 {
                data.kill(i);
            } else {
                i += 1;
            }
        }
    }
}

/// All updater kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Updater {
    /// Semi-implicit Euler integration.
    Euler(EulerUpdater),
    /// Floor plane bounce.
    Floor(FloorUpdater),
    /// Inverse-square attractors.
    Attractor(AttractorUpdater),
    /// `color = lerp(start_color, end_color, age)`.
    BasicColor,
    /// RGB from normalized position.
    PosColor(RangeColorUpdater),
    /// RGB from normalized velocity.
    VelColor(RangeColorUpdater),
    /// Aging and death.
    BasicTime(BasicTimeUpdater),
}

impl Updater {
    /// Apply this updater to the live prefix of `data`.
    pub fn update(&self, dt: f32, data: &mut ParticleData) {
        match self {
            Updater::Euler(u) => u.update(dt, data),
            Updater::Floor(u) => u.update(data),
            Updater::Attractor(u) => u.update(data),
            Updater::BasicColor => {
                let n = data.alive_count();
                let starts = &data.start_col[..n];
                let ends = &data.end_col[..n];
                let times = &data.time[..n];
                for (i, c) in data.col[..n].iter_mut().enumerate() {
                    *c = starts[i].lerp(ends[i], times[i].z);
                }
            }
            Updater::PosColor(u) => u.update(Source::Position, data),
            Updater::VelColor(u) => u.update(Source::Velocity, data),
            Updater::BasicTime(u) => u.update(dt, data),
        }
    }

    /// Display name of the updater kind.
    pub fn name(&self) -> &'static str {
        match self {
            Updater::Euler(_) => "Euler",
            Updater::Floor(_) => "Floor",
            Updater::Attractor(_) => "Attractor",
            Updater::BasicColor => "Color",
            Updater::PosColor(_) => "Position Color",
            Updater::VelColor(_) => "Velocity Color",
            Updater::BasicTime(_) => "Lifetime",
        }
    }

    /// The integrator, if this is [`Updater::Euler`].
    pub fn as_euler_mut(&mut self) -> Option<&mut EulerUpdater> {
        match self {
            Updater::Euler(u) => Some(u),
            _ => None,
        }
    }

    /// The floor, if this is [`Updater::Floor`].
    pub fn as_floor_mut(&mut self) -> Option<&mut FloorUpdater> {
        match self {
            Updater::Floor(u) => Some(u),
            _ => None,
        }
    }

    /// The attractor set, if this is [`Updater::Attractor`].
    pub fn as_attractor_mut(&mut self) -> Option<&mut AttractorUpdater> {
        match self {
            Updater::Attractor(u) => Some(u),
            _ => None,
        }
    }
}

impl From<EulerUpdater> for Updater {
    fn from(u: EulerUpdater) -> Self {
        Updater::Euler(u)
    }
}

impl From<FloorUpdater> for Updater {
    fn from(u: FloorUpdater) -> Self {
        Updater::Floor(u)
    }
}

impl From<AttractorUpdater> for Updater {
    fn from(u: AttractorUpdater) -> Self {
        Updater::Attractor(u)
    }
}

impl From<BasicTimeUpdater> for Updater {
    fn from(u: BasicTimeUpdater) -> Self {
        Updater::BasicTime(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_particle(pos: Vec4, vel: Vec4) -> ParticleData {
        let mut data = ParticleData::new(4).unwrap();
        data.pos[0] = pos;
        data.vel[0] = vel;
        data.wake(0);
        data
    }

    #[test]
    fn test_euler_integration() {
        let mut data = one_particle(Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 0.0, 0.0, 0.0));
        Updater::from(EulerUpdater::new(Vec4::new(0.0, -10.0, 0.0, 0.0))).update(0.5, &mut data);

        assert_eq!(data.accelerations()[0], Vec4::new(0.0, -5.0, 0.0, 0.0));
        assert_eq!(data.velocities()[0], Vec4::new(1.0, -2.5, 0.0, 0.0));
        assert_eq!(data.positions()[0], Vec4::new(0.5, -1.25, 0.0, 1.0));
    }

    #[test]
    fn test_euler_ignores_dead() {
        let mut data = one_particle(Vec4::ZERO, Vec4::ZERO);
        data.vel[1] = Vec4::ONE;
        Updater::from(EulerUpdater::new(Vec4::ZERO)).update(1.0, &mut data);
        assert_eq!(data.positions()[1], Vec4::ZERO);
    }

    #[test]
    fn test_floor_bounce() {
        let mut data = one_particle(Vec4::new(0.0, -0.01, 0.0, 1.0), Vec4::new(0.0, -2.0, 0.0, 0.0));
        data.acc[0] = Vec4::new(0.5, -3.0, 0.0, 0.0);
        Updater::from(FloorUpdater::new(0.0, 0.5)).update(0.016, &mut data);

        assert_eq!(data.velocities()[0].y, 1.0);
        assert_eq!(data.accelerations()[0], Vec4::new(0.5, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_floor_above_plane_untouched() {
        let mut data = one_particle(Vec4::new(0.0, 0.2, 0.0, 1.0), Vec4::new(0.0, -2.0, 0.0, 0.0));
        Updater::from(FloorUpdater::default()).update(0.016, &mut data);
        assert_eq!(data.velocities()[0].y, -2.0);
    }

    #[test]
    fn test_attractor_inverse_square() {
        let mut data = one_particle(Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::ZERO);
        let attractors = AttractorUpdater::new()
            .with_attractor(Attractor::new(Vec3::new(1.0, 0.0, 0.0), 4.0))
            .unwrap();
        Updater::from(attractors).update(0.016, &mut data);
        assert_eq!(data.accelerations()[0], Vec4::new(4.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_attractor_at_particle_stays_finite() {
        let mut data = one_particle(Vec4::new(1.0, 1.0, 1.0, 1.0), Vec4::ZERO);
        let attractors = AttractorUpdater::new()
            .with_attractor(Attractor::new(Vec3::ONE, 1.0))
            .unwrap()
            .with_attractor(Attractor::new(Vec3::new(1.0, 1.0, 1.0 + 1.0e-6), 1.0))
            .unwrap();
        Updater::from(attractors).update(0.016, &mut data);
        assert!(data.accelerations()[0].is_finite());
    }

    #[test]
    fn test_attractor_limit() {
        let mut attractors = AttractorUpdater::new();
        for _ in 0..MAX_ATTRACTORS {
            attractors.add(Attractor::default()).unwrap();
        }
        assert_eq!(
            attractors.add(Attractor::default()),
            Err(ConfigError::TooManyAttractors { limit: MAX_ATTRACTORS })
        );
    }

    #[test]
    fn test_attractor_list_conversion_keeps_limit() {
        let points = vec![Attractor::new(Vec3::X, 0.5); MAX_ATTRACTORS];
        let updater = AttractorUpdater::try_from(points.clone()).unwrap();
        assert_eq!(updater.attractors(), &points[..]);

        let too_many = vec![Attractor::default(); MAX_ATTRACTORS + 1];
        assert_eq!(
            AttractorUpdater::try_from(too_many),
            Err(ConfigError::TooManyAttractors { limit: MAX_ATTRACTORS })
        );
    }

    #[test]
    fn test_basic_color_lerp() {
        let mut data = one_particle(Vec4::ZERO, Vec4::ZERO);
        data.start_col[0] = Vec4::new(1.0, 0.0, 0.0, 1.0);
        data.end_col[0] = Vec4::new(0.0, 0.0, 1.0, 0.0);
        data.time[0].z = 0.25;
        Updater::BasicColor.update(0.016, &mut data);
        assert_eq!(data.colors()[0], Vec4::new(0.75, 0.0, 0.25, 0.75));
    }

    #[test]
    fn test_vel_color_normalizes() {
        let mut data = one_particle(Vec4::ZERO, Vec4::new(1.0, 0.0, -1.0, 0.0));
        data.start_col[0] = Vec4::new(0.0, 0.0, 0.0, 1.0);
        data.end_col[0] = Vec4::new(0.0, 0.0, 0.0, 0.0);
        data.time[0].z = 0.5;
        let u = RangeColorUpdater::new(Vec4::splat(-1.0), Vec4::splat(1.0)).unwrap();
        Updater::VelColor(u).update(0.016, &mut data);
        assert_eq!(data.colors()[0], Vec4::new(1.0, 0.5, 0.0, 0.5));
    }

    #[test]
    fn test_pos_color_degenerate_range_is_finite() {
        let mut data = one_particle(Vec4::new(0.3, 0.3, 0.3, 1.0), Vec4::ZERO);
        let u = RangeColorUpdater::new(Vec4::ZERO, Vec4::ZERO).unwrap();
        Updater::PosColor(u).update(0.016, &mut data);
        assert!(data.colors()[0].is_finite());
    }

    #[test]
    fn test_time_normalized_age() {
        let mut data = one_particle(Vec4::ZERO, Vec4::ZERO);
        data.time[0] = Vec4::new(2.0, 2.0, 0.0, 0.5);
        Updater::from(BasicTimeUpdater).update(1.0, &mut data);
        assert_eq!(data.times()[0].z, 0.5);
        assert_eq!(data.alive_count(), 1);
    }

    #[test]
    fn test_time_kill_rechecks_swapped_row() {
        let mut data = ParticleData::new(5).unwrap();
        // Rows 0, 3 and 4 expire; 4 is swapped into 0 when 0 dies.
        let lives = [0.5, 2.0, 2.0, 0.5, 0.5];
        for (i, life) in lives.iter().enumerate() {
            data.time[i] = Vec4::new(*life, *life, 0.0, 1.0 / life);
            data.pos[i].x = i as f32;
            data.wake(i);
        }
        Updater::from(BasicTimeUpdater).update(1.0, &mut data);

        assert_eq!(data.alive_count(), 2);
        let mut survivors: Vec<f32> = data.positions()[..2].iter().map(|p| p.x).collect();
        survivors.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(survivors, vec![1.0, 2.0]);
        assert!(data.times()[..2].iter().all(|t| t.x >= 0.0));
    }

    #[test]
    fn test_time_zero_remaining_survives() {
        let mut data = one_particle(Vec4::ZERO, Vec4::ZERO);
        data.time[0] = Vec4::new(1.0, 1.0, 0.0, 1.0);
        Updater::from(BasicTimeUpdater).update(1.0, &mut data);
        assert_eq!(data.alive_count(), 1);
        Updater::from(BasicTimeUpdater).update(0.001, &mut data);
        assert_eq!(data.alive_count(), 0);
    }
}
