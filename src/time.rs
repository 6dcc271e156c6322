//! Fixed-step simulation clock.
//!
//! Drives effects at a constant `dt` and keeps track of how long the CPU
//! spent stepping, so headless runs can report throughput.
//!
//! # Example
//!
//! ```ignore
//! use particle_fx::time::Time;
//!
//! let mut time = Time::fixed(1.0 / 60.0);
//!
//! for _ in 0..time.steps_for(10.0) {
//!     let dt = time.tick();
//!     time.measure(|| effect.cpu_update(dt));
//! }
//!
//! println!("{:.1} us/step", time.mean_step_micros());
//! ```

use std::time::{Duration, Instant};

/// Simulated time plus wall-clock cost of the steps taken.
#[derive(Debug, Clone)]
pub struct Time {
    /// Step size in seconds.
    fixed_delta: f64,
    /// Steps per simulated second, when `fixed_delta` divides a second.
    steps_per_second: Option<u64>,
    /// Steps taken.
    frame_count: u64,
    /// Wall-clock time spent inside [`Time::measure`].
    busy: Duration,
    /// Steps measured since the last [`Time::take_report`].
    window_frames: u64,
    /// Wall-clock time measured since the last [`Time::take_report`].
    window_busy: Duration,
}

impl Time {
    /// Clock advancing by `fixed_delta` seconds per tick.
    ///
    /// Non-positive or non-finite deltas fall back to 60 Hz.
    pub fn fixed(fixed_delta: f64) -> Self {
        let fixed_delta = if fixed_delta.is_finite() && fixed_delta > 0.0 {
            fixed_delta
        } else {
            1.0 / 60.0
        };
        Self {
            fixed_delta,
            steps_per_second: whole_steps(1.0 / fixed_delta),
            frame_count: 0,
            busy: Duration::ZERO,
            window_frames: 0,
            window_busy: Duration::ZERO,
        }
    }

    /// Advance one step and return its `dt`.
    pub fn tick(&mut self) -> f64 {
        self.frame_count += 1;
        self.fixed_delta
    }

    /// Run `f`, adding its wall-clock duration to the step statistics.
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = f();
        let spent = start.elapsed();
        self.busy += spent;
        self.window_busy += spent;
        self.window_frames += 1;
        out
    }

    /// Step size in seconds.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.fixed_delta
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.frame_count as f64 * self.fixed_delta
    }

    /// Number of steps that cover `seconds` of simulated time.
    pub fn steps_for(&self, seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        let steps = seconds / self.fixed_delta;
        whole_steps(steps).unwrap_or(steps.ceil() as u64)
    }

    /// Steps taken.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Whether the last tick crossed a whole simulated second.
    pub fn crossed_second(&self) -> bool {
        if self.frame_count == 0 {
            return false;
        }
        match self.steps_per_second {
            Some(steps) => self.frame_count % steps == 0,
            None => {
                let second = |frame: u64| (frame as f64 * self.fixed_delta + STEP_EPSILON).floor();
                second(self.frame_count) > second(self.frame_count - 1)
            }
        }
    }

    /// Mean wall-clock microseconds per step, over the whole run.
    pub fn mean_step_micros(&self) -> f64 {
        let measured = self.frame_count.max(1) as f64;
        self.busy.as_secs_f64() * 1.0e6 / measured
    }

    /// Mean microseconds per step since the previous report, then reset the
    /// window.
    pub fn take_report(&mut self) -> f64 {
        let micros = self.window_busy.as_secs_f64() * 1.0e6 / self.window_frames.max(1) as f64;
        self.window_frames = 0;
        self.window_busy = Duration::ZERO;
        micros
    }
}

/// Tolerance for treating a step count as whole.
const STEP_EPSILON: f64 = 1.0e-9;

/// `value` as an integer when it is within rounding error of one.
fn whole_steps(value: f64) -> Option<u64> {
    let nearest = value.round();
    let close = (value - nearest).abs() < STEP_EPSILON * value.max(1.0);
    (close && nearest >= 1.0).then_some(nearest as u64)
}

impl Default for Time {
    fn default() -> Self {
        Self::fixed(1.0 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances() {
        let mut time = Time::fixed(0.25);
        assert_eq!(time.tick(), 0.25);
        time.tick();
        assert_eq!(time.elapsed(), 0.5);
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_crossed_second() {
        let mut time = Time::fixed(0.25);
        let crossings: Vec<bool> = (0..8).map(|_| { time.tick(); time.crossed_second() }).collect();
        assert_eq!(crossings, vec![false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_crossed_second_at_60hz() {
        let mut time = Time::fixed(1.0 / 60.0);
        let crossings: Vec<u64> = (0..180)
            .filter_map(|_| {
                time.tick();
                time.crossed_second().then(|| time.frame())
            })
            .collect();
        assert_eq!(crossings, vec![60, 120, 180]);
        assert_eq!(time.elapsed(), 3.0);
    }

    #[test]
    fn test_crossed_second_uneven_delta() {
        let mut time = Time::fixed(0.3);
        let crossings: Vec<u64> = (0..10)
            .filter_map(|_| {
                time.tick();
                time.crossed_second().then(|| time.frame())
            })
            .collect();
        assert_eq!(crossings, vec![4, 7, 10]);
    }

    #[test]
    fn test_steps_for_duration() {
        let time = Time::fixed(1.0 / 60.0);
        assert_eq!(time.steps_for(10.0), 600);
        assert_eq!(time.steps_for(0.5), 30);
        assert_eq!(time.steps_for(0.01), 1);
        assert_eq!(time.steps_for(-1.0), 0);
        assert_eq!(Time::fixed(0.3).steps_for(1.0), 4);
    }

    #[test]
    fn test_invalid_delta_falls_back() {
        assert_eq!(Time::fixed(0.0).delta(), 1.0 / 60.0);
        assert_eq!(Time::fixed(f64::NAN).delta(), 1.0 / 60.0);
    }

    #[test]
    fn test_report_window_resets() {
        let mut time = Time::default();
        time.tick();
        assert_eq!(time.measure(|| 7), 7);
        time.take_report();
        assert_eq!(time.take_report(), 0.0);
    }
}
