//! Time-based eased scroll animation
//!
//! Offsets are sampled from wall-clock time, never advanced per frame, so a
//! dropped frame skips ahead instead of slowing the scroll down.

use crate::consts::{SCROLL_MAX_MS, SCROLL_MIN_MS, SCROLL_MS_PER_PX};
use crate::easing::Easing;

/// Maps travel distance to animation length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTiming {
    pub ms_per_px: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Default for ScrollTiming {
    fn default() -> Self {
        Self {
            ms_per_px: SCROLL_MS_PER_PX,
            min_ms: SCROLL_MIN_MS,
            max_ms: SCROLL_MAX_MS,
        }
    }
}

impl ScrollTiming {
    /// Duration (ms) for travelling `distance` px in either direction.
    /// Swapped bounds are read in order.
    pub fn duration_for(&self, distance: f64) -> f64 {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        let raw = distance.abs() * self.ms_per_px;
        if raw.is_nan() {
            return lo;
        }
        raw.max(lo).min(hi)
    }
}

/// A single in-flight scroll from one offset to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub start_offset: f64,
    pub target_offset: f64,
    pub start_time: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl ScrollAnimation {
    pub fn new(start_offset: f64, target_offset: f64, start_time: f64, duration: f64) -> Self {
        Self {
            start_offset,
            target_offset,
            start_time,
            duration: duration.max(1.0),
            easing: Easing::EaseInOutCubic,
        }
    }

    /// Animation between two offsets, timed by travel distance
    pub fn timed(start_offset: f64, target_offset: f64, now: f64, timing: &ScrollTiming) -> Self {
        let duration = timing.duration_for(target_offset - start_offset);
        Self::new(start_offset, target_offset, now, duration)
    }

    /// Normalized progress at `now`, clamped to `[0, 1]`
    pub fn progress(&self, now: f64) -> f64 {
        let t = (now - self.start_time) / self.duration;
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }

    /// Offset at `now`. Exactly `target_offset` once the duration has elapsed.
    pub fn sample(&self, now: f64) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target_offset;
        }
        let delta = self.target_offset - self.start_offset;
        self.start_offset + delta * self.easing.apply(t)
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_duration_scales_then_clamps() {
        let timing = ScrollTiming::default();
        assert_eq!(timing.duration_for(100.0), 350.0);
        assert!((timing.duration_for(1300.0) - 780.0).abs() < 1e-9);
        assert!((timing.duration_for(-1300.0) - 780.0).abs() < 1e-9);
        assert_eq!(timing.duration_for(10_000.0), 1200.0);
        assert_eq!(timing.duration_for(f64::NAN), 350.0);
    }

    #[test]
    fn test_swapped_bounds_do_not_panic() {
        let timing = ScrollTiming {
            ms_per_px: 0.6,
            min_ms: 1200.0,
            max_ms: 350.0,
        };
        assert_eq!(timing.duration_for(100.0), 350.0);
        assert!((timing.duration_for(1300.0) - 780.0).abs() < 1e-9);
        assert_eq!(timing.duration_for(10_000.0), 1200.0);
        assert_eq!(timing.duration_for(f64::NAN), 350.0);
    }

    #[test]
    fn test_sample_endpoints() {
        let anim = ScrollAnimation::new(500.0, 1800.0, 1000.0, 780.0);
        assert_eq!(anim.sample(1000.0), 500.0);
        assert_eq!(anim.sample(900.0), 500.0);
        assert_eq!(anim.sample(1780.0), 1800.0);
        assert_eq!(anim.sample(5000.0), 1800.0);
        assert!((anim.sample(1390.0) - 1150.0).abs() < 1e-9);
        assert!(anim.is_done(1780.0));
        assert!(!anim.is_done(1779.0));
    }

    #[test]
    fn test_zero_duration_is_guarded() {
        let anim = ScrollAnimation::new(0.0, 100.0, 0.0, 0.0);
        assert_eq!(anim.duration, 1.0);
        assert_eq!(anim.sample(1.0), 100.0);
    }

    proptest! {
        #[test]
        fn prop_sample_monotonic_between_endpoints(
            start in 0.0f64..5000.0,
            target in 0.0f64..5000.0,
            a in 0.0f64..1.5,
            b in 0.0f64..1.5,
        ) {
            let anim = ScrollAnimation::timed(start, target, 0.0, &ScrollTiming::default());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p = anim.sample(lo * anim.duration);
            let q = anim.sample(hi * anim.duration);
            let (min, max) = (start.min(target), start.max(target));
            prop_assert!(p >= min - 1e-9 && p <= max + 1e-9);
            if target >= start {
                prop_assert!(q >= p - 1e-9);
            } else {
                prop_assert!(q <= p + 1e-9);
            }
        }
    }
}
