//! Struct-of-arrays particle storage.
//!
//! Every particle attribute lives in its own array so that updaters stream
//! through exactly the data they need. Live particles always occupy the
//! prefix `[0, alive_count)`:
//!
//! ```text
//! index:  0   1   2   3   4   5   6   7
//!        [A] [A] [A] [A] [ ] [ ] [ ] [ ]
//!                         ^ alive_count = 4
//! ```
//!
//! [`ParticleData::kill`] moves the last live row into the hole it leaves
//! behind, and [`ParticleData::wake`] pulls a row onto the frontier, so the
//! partition holds without ever scanning dead slots.
//!
//! # Time attribute
//!
//! | Component | Meaning |
//! |-----------|---------|
//! | `x` | Remaining lifetime (seconds) |
//! | `y` | Total lifetime (seconds) |
//! | `z` | Normalized age, 0 at spawn, 1 at death |
//! | `w` | `1 / total lifetime` |

use crate::error::{AllocError, ConfigError, SystemError};
use glam::Vec4;
use std::collections::TryReserveError;

/// Fixed-capacity particle store.
///
/// Capacity is chosen once in [`ParticleData::new`] and never changes.
/// The store has no behaviour beyond the swap primitives; generators and
/// updaters write the attribute arrays directly.
#[derive(Debug, Clone)]
pub struct ParticleData {
    pub(crate) pos: Vec<Vec4>,
    pub(crate) col: Vec<Vec4>,
    pub(crate) start_col: Vec<Vec4>,
    pub(crate) end_col: Vec<Vec4>,
    pub(crate) vel: Vec<Vec4>,
    pub(crate) acc: Vec<Vec4>,
    pub(crate) time: Vec<Vec4>,
    pub(crate) alive: Vec<bool>,
    count: usize,
    alive_count: usize,
}

fn alloc_filled<T: Clone>(capacity: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;
    v.resize(capacity, value);
    Ok(v)
}

impl ParticleData {
    /// Allocate storage for `capacity` particles, all of them dead.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] for an empty store and with
    /// an [`AllocError`] when the arrays cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self, SystemError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity.into());
        }

        let alloc = |e| AllocError::new(capacity, e);
        Ok(Self {
            pos: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            col: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            start_col: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            end_col: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            vel: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            acc: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            time: alloc_filled(capacity, Vec4::ZERO).map_err(alloc)?,
            alive: alloc_filled(capacity, false).map_err(alloc)?,
            count: capacity,
            alive_count: 0,
        })
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.count
    }

    /// Number of live particles; they occupy `[0, alive_count)`.
    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Whether slot `id` is flagged alive.
    ///
    /// Only meaningful inside the live prefix; flags past `alive_count` may
    /// lag after [`ParticleData::clear`].
    #[inline]
    pub fn is_alive(&self, id: usize) -> bool {
        self.alive[id]
    }

    /// Kill the live particle at `id`.
    ///
    /// The last live row is moved into `id`, so after the call `id` holds a
    /// different particle (or is past the live prefix if `id` was last).
    pub fn kill(&mut self, id: usize) {
        debug_assert!(id < self.alive_count, "kill({id}) outside live prefix {}", self.alive_count);
        self.alive[id] = false;
        self.swap_data(id, self.alive_count - 1);
        self.alive_count -= 1;
    }

    /// Bring the dead particle at `id` into the live prefix.
    ///
    /// The row at `id` is swapped onto the frontier slot `alive_count`.
    pub fn wake(&mut self, id: usize) {
        debug_assert!(
            id >= self.alive_count && id < self.count,
            "wake({id}) outside dead region [{}, {})",
            self.alive_count,
            self.count
        );
        self.alive[id] = true;
        self.swap_data(id, self.alive_count);
        self.alive_count += 1;
    }

    /// Swap every attribute of rows `a` and `b`.
    pub fn swap_data(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.pos.swap(a, b);
        self.col.swap(a, b);
        self.start_col.swap(a, b);
        self.end_col.swap(a, b);
        self.vel.swap(a, b);
        self.acc.swap(a, b);
        self.time.swap(a, b);
        self.alive.swap(a, b);
    }

    /// Kill everything at once. Attributes are left as they are and get
    /// overwritten on the next spawn.
    #[inline]
    pub fn clear(&mut self) {
        self.alive_count = 0;
    }

    /// Zero the acceleration of every slot, live or not.
    pub(crate) fn clear_accelerations(&mut self) {
        self.acc.fill(Vec4::ZERO);
    }

    /// Copy the live prefix of `source` into `destination`.
    ///
    /// Both stores must have the same capacity. Used to hand a renderer a
    /// stable snapshot while the source keeps simulating.
    pub fn copy_only_alive(
        source: &ParticleData,
        destination: &mut ParticleData,
    ) -> Result<(), ConfigError> {
        if source.count != destination.count {
            return Err(ConfigError::CapacityMismatch {
                source: source.count,
                destination: destination.count,
            });
        }
        let n = source.alive_count;
        destination.pos[..n].copy_from_slice(&source.pos[..n]);
        destination.col[..n].copy_from_slice(&source.col[..n]);
        destination.start_col[..n].copy_from_slice(&source.start_col[..n]);
        destination.end_col[..n].copy_from_slice(&source.end_col[..n]);
        destination.vel[..n].copy_from_slice(&source.vel[..n]);
        destination.acc[..n].copy_from_slice(&source.acc[..n]);
        destination.time[..n].copy_from_slice(&source.time[..n]);
        destination.alive[..n].fill(true);
        destination.alive_count = n;
        Ok(())
    }

    /// Bytes held by the attribute arrays.
    pub fn memory_usage(&self) -> usize {
        self.count * (std::mem::size_of::<Vec4>() * 7 + std::mem::size_of::<bool>())
            + std::mem::size_of::<usize>() * 2
    }

    // ========== Attribute access ==========

    /// Positions of all slots.
    pub fn positions(&self) -> &[Vec4] {
        &self.pos
    }

    /// Mutable positions of all slots.
    pub fn positions_mut(&mut self) -> &mut [Vec4] {
        &mut self.pos
    }

    /// Current (rendered) colors of all slots.
    pub fn colors(&self) -> &[Vec4] {
        &self.col
    }

    /// Mutable current colors of all slots.
    pub fn colors_mut(&mut self) -> &mut [Vec4] {
        &mut self.col
    }

    /// Colors at birth.
    pub fn start_colors(&self) -> &[Vec4] {
        &self.start_col
    }

    /// Mutable colors at birth.
    pub fn start_colors_mut(&mut self) -> &mut [Vec4] {
        &mut self.start_col
    }

    /// Colors at death.
    pub fn end_colors(&self) -> &[Vec4] {
        &self.end_col
    }

    /// Mutable colors at death.
    pub fn end_colors_mut(&mut self) -> &mut [Vec4] {
        &mut self.end_col
    }

    /// Velocities of all slots.
    pub fn velocities(&self) -> &[Vec4] {
        &self.vel
    }

    /// Mutable velocities of all slots.
    pub fn velocities_mut(&mut self) -> &mut [Vec4] {
        &mut self.vel
    }

    /// Accelerations accumulated during the current step.
    pub fn accelerations(&self) -> &[Vec4] {
        &self.acc
    }

    /// Mutable accelerations.
    pub fn accelerations_mut(&mut self) -> &mut [Vec4] {
        &mut self.acc
    }

    /// Lifetime attribute of all slots (see the module docs for layout).
    pub fn times(&self) -> &[Vec4] {
        &self.time
    }

    /// Mutable lifetime attribute.
    pub fn times_mut(&mut self) -> &mut [Vec4] {
        &mut self.time
    }
}
