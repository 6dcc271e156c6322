//! Error types for particle-fx.
//!
//! Setup is the only place anything can fail: building a store, configuring
//! generators and updaters, or picking an effect by name. Once a system is
//! running, numeric edge cases are clamped in place instead of reported.

use std::collections::TryReserveError;
use std::fmt;

/// Errors caused by invalid construction-time parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A particle store was requested with zero capacity.
    ZeroCapacity,
    /// A `[min, max]` range has `min > max` in at least one component.
    InvalidRange {
        /// Which parameter the range belongs to.
        what: &'static str,
        /// Offending lower bound (first failing component).
        min: f32,
        /// Offending upper bound (first failing component).
        max: f32,
    },
    /// More attractor points than the attractor updater can hold.
    TooManyAttractors {
        /// Maximum number of attractors.
        limit: usize,
    },
    /// A parameter was NaN or infinite.
    NonFiniteValue {
        /// Which parameter was not finite.
        what: &'static str,
    },
    /// No effect preset with this name exists.
    UnknownEffect(String),
    /// Two particle stores that must match in capacity do not.
    CapacityMismatch {
        /// Capacity of the store being read.
        source: usize,
        /// Capacity of the store being written.
        destination: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "Particle capacity must be greater than zero"),
            ConfigError::InvalidRange { what, min, max } => {
                write!(f, "Invalid {} range: min {} is greater than max {}", what, min, max)
            }
            ConfigError::TooManyAttractors { limit } => {
                write!(f, "Attractor updater holds at most {} attractors", limit)
            }
            ConfigError::NonFiniteValue { what } => write!(f, "{} must be a finite number", what),
            ConfigError::UnknownEffect(name) => write!(
                f,
                "Unknown effect '{}'. Available effects: fountain, attractors, tunnel, burning",
                name
            ),
            ConfigError::CapacityMismatch { source, destination } => write!(
                f,
                "Cannot copy a store of {} particles into one of {}",
                source, destination
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to reserve the backing storage of a particle store.
#[derive(Debug)]
pub struct AllocError {
    /// Requested capacity in particles.
    pub capacity: usize,
    source: TryReserveError,
}

impl AllocError {
    pub(crate) fn new(capacity: usize, source: TryReserveError) -> Self {
        Self { capacity, source }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate storage for {} particles: {}",
            self.capacity, self.source
        )
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Errors that can occur while building a particle system or effect.
#[derive(Debug)]
pub enum SystemError {
    /// Invalid configuration.
    Config(ConfigError),
    /// Backing storage could not be allocated.
    Alloc(AllocError),
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::Config(e) => write!(f, "Configuration error: {}", e),
            SystemError::Alloc(e) => write!(f, "Allocation error: {}", e),
        }
    }
}

impl std::error::Error for SystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SystemError::Config(e) => Some(e),
            SystemError::Alloc(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SystemError {
    fn from(e: ConfigError) -> Self {
        SystemError::Config(e)
    }
}

impl From<AllocError> for SystemError {
    fn from(e: AllocError) -> Self {
        SystemError::Alloc(e)
    }
}

/// Check that every component of `min` is `<= max`.
pub(crate) fn check_range4(
    what: &'static str,
    min: glam::Vec4,
    max: glam::Vec4,
) -> Result<(), ConfigError> {
    for (lo, hi) in min.to_array().into_iter().zip(max.to_array()) {
        check_range(what, lo, hi)?;
    }
    Ok(())
}

/// Check that a scalar range is finite and ordered.
pub(crate) fn check_range(what: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::NonFiniteValue { what });
    }
    if min > max {
        return Err(ConfigError::InvalidRange { what, min, max });
    }
    Ok(())
}
