//! Damped spring integrator
//!
//! A mass on a spring with viscous damping, pulled toward `target`:
//!
//! ```text
//! m·x'' = -k·(x - target) - c·x'
//! ```
//!
//! Each step advances the analytic solution of that equation, so the result
//! is the same whether a second is covered by 30 frames or 240, and no frame
//! delta can destabilize it. The solution is linear in the initial
//! displacement and velocity, so one set of scalar coefficients serves every
//! axis of a vector value.

use std::ops::{Add, Mul, Sub};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Values a spring can animate
pub trait SpringValue:
    Copy + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    const ZERO: Self;
    /// Largest absolute component
    fn max_abs(self) -> f32;
    fn is_finite(self) -> bool;
}

impl SpringValue for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn max_abs(self) -> f32 {
        self.abs()
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl SpringValue for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    #[inline]
    fn max_abs(self) -> f32 {
        self.abs().max_element()
    }

    #[inline]
    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }
}

/// Spring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Settle once within this distance of the target...
    pub rest_delta: f32,
    /// ...and slower than this (units per second)
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Slow, heavily over-damped drift for background layers
    pub const BACKGROUND: Self = Self {
        stiffness: BACKGROUND_STIFFNESS,
        damping: BACKGROUND_DAMPING,
        mass: BACKGROUND_MASS,
        rest_delta: PX_REST_DELTA,
        rest_speed: PX_REST_SPEED,
    };

    /// Snappy follower for the custom cursor
    pub const CURSOR: Self = Self {
        stiffness: CURSOR_STIFFNESS,
        damping: CURSOR_DAMPING,
        mass: CURSOR_MASS,
        rest_delta: PX_REST_DELTA,
        rest_speed: PX_REST_SPEED,
    };

    /// Cursor feel for unit-range values (scales, opacities)
    pub const CURSOR_UNIT: Self = Self {
        rest_delta: UNIT_REST_DELTA,
        rest_speed: UNIT_REST_SPEED,
        ..Self::CURSOR
    };

    /// Pixel-valued spring with the default rest thresholds
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_delta: PX_REST_DELTA,
            rest_speed: PX_REST_SPEED,
        }
    }

    /// ζ = c / (2·√(k·m)). 1.0 is critical damping.
    pub fn damping_ratio(&self) -> f32 {
        let denom = 2.0 * (self.stiffness * self.mass).sqrt();
        if denom > 0.0 {
            self.damping / denom
        } else {
            f32::INFINITY
        }
    }

    /// True when the spring settles without oscillating
    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio() >= 1.0
    }

    /// Coefficients `(a, b, c, d)` such that after `t` seconds
    /// `x = a·x0 + b·v0` and `v = c·x0 + d·v0`, where `x0` is the
    /// displacement from the target.
    fn propagator(&self, t: f64) -> (f64, f64, f64, f64) {
        let k = self.stiffness.max(0.0) as f64;
        let c = self.damping.max(0.0) as f64;
        let m = (self.mass as f64).max(f64::EPSILON);

        if k == 0.0 {
            // Pure drag: displacement never recovers, velocity decays
            let decay = (-(c / m) * t).exp();
            let b = if c > 0.0 { (1.0 - decay) * m / c } else { t };
            return (1.0, b, 0.0, decay);
        }

        let omega = (k / m).sqrt();
        let zeta = c / (2.0 * (k * m).sqrt());

        if (zeta - 1.0).abs() < 1e-6 {
            let e = (-omega * t).exp();
            (
                e * (1.0 + omega * t),
                e * t,
                -e * omega * omega * t,
                e * (1.0 - omega * t),
            )
        } else if zeta < 1.0 {
            let wd = omega * (1.0 - zeta * zeta).sqrt();
            let e = (-zeta * omega * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            (
                e * (cos + zeta * omega / wd * sin),
                e * sin / wd,
                -e * omega * omega / wd * sin,
                e * (cos - zeta * omega / wd * sin),
            )
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let s1 = -omega * (zeta - root);
            let s2 = -omega * (zeta + root);
            let (e1, e2) = ((s1 * t).exp(), (s2 * t).exp());
            let delta = s1 - s2;
            (
                (s1 * e2 - s2 * e1) / delta,
                (e1 - e2) / delta,
                s1 * s2 * (e2 - e1) / delta,
                (s1 * e1 - s2 * e2) / delta,
            )
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::BACKGROUND
    }
}

/// A value chasing a target under spring physics
#[derive(Debug, Clone, Copy)]
pub struct Spring<T: SpringValue> {
    pub config: SpringConfig,
    position: T,
    velocity: T,
    target: T,
    at_rest: bool,
}

impl<T: SpringValue> Spring<T> {
    /// A spring resting at `initial`
    pub fn new(config: SpringConfig, initial: T) -> Self {
        Self {
            config,
            position: initial,
            velocity: T::ZERO,
            target: initial,
            at_rest: true,
        }
    }

    pub fn position(&self) -> T {
        self.position
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Retarget. Non-finite targets are ignored.
    pub fn set_target(&mut self, target: T) {
        if !target.is_finite() || target == self.target {
            return;
        }
        self.target = target;
        self.at_rest = false;
    }

    /// Teleport to `value` and stop
    pub fn jump_to(&mut self, value: T) {
        if !value.is_finite() {
            return;
        }
        self.position = value;
        self.target = value;
        self.velocity = T::ZERO;
        self.at_rest = true;
    }

    /// Advance by `dt` seconds. Returns true while still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.at_rest {
            return false;
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return true;
        }

        let (a, b, c, d) = self.config.propagator(dt as f64);
        let x0 = self.position - self.target;
        let v0 = self.velocity;
        let x = x0 * a as f32 + v0 * b as f32;
        let v = x0 * c as f32 + v0 * d as f32;

        if !x.is_finite() || !v.is_finite() {
            // Degenerate config; settle rather than leak NaN downstream
            log::warn!("spring diverged, snapping to target");
            self.jump_to(self.target);
            return false;
        }

        self.position = self.target + x;
        self.velocity = v;

        if x.max_abs() < self.config.rest_delta && v.max_abs() < self.config.rest_speed {
            self.position = self.target;
            self.velocity = T::ZERO;
            self.at_rest = true;
        }
        !self.at_rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settle<T: SpringValue>(spring: &mut Spring<T>, dts: &[f32], max_secs: f32) -> f32 {
        let mut elapsed = 0.0;
        let mut i = 0;
        while elapsed < max_secs {
            let dt = dts[i % dts.len()];
            if !spring.step(dt) {
                break;
            }
            elapsed += dt;
            i += 1;
        }
        elapsed
    }

    #[test]
    fn test_configs_are_overdamped() {
        assert!(SpringConfig::BACKGROUND.is_overdamped());
        assert!(SpringConfig::CURSOR.is_overdamped());
        assert!(SpringConfig::new(100.0, 5.0, 1.0).damping_ratio() < 1.0);
    }

    #[test]
    fn test_cursor_spring_converges() {
        let mut s = Spring::new(SpringConfig::CURSOR, Vec2::ZERO);
        s.set_target(Vec2::new(800.0, 600.0));
        settle(&mut s, &[1.0 / 60.0], 5.0);
        assert!(s.is_at_rest());
        assert_eq!(s.position(), Vec2::new(800.0, 600.0));
        assert_eq!(s.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_background_spring_converges_with_irregular_frames() {
        let mut s = Spring::new(SpringConfig::BACKGROUND, Vec2::ZERO);
        s.set_target(Vec2::new(800.0, 600.0));
        settle(&mut s, &[0.004, 0.016, 0.033, 0.1, 0.25, 0.007], 120.0);
        assert!(s.is_at_rest());
        assert_eq!(s.position(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_overdamped_spring_does_not_overshoot() {
        for config in [SpringConfig::BACKGROUND, SpringConfig::CURSOR] {
            let mut s = Spring::new(config, 0.0_f32);
            s.set_target(1000.0);
            for _ in 0..2000 {
                s.step(1.0 / 60.0);
                assert!(s.position() <= 1000.0 + 1e-3, "{:?} overshot", config);
            }
        }
    }

    #[test]
    fn test_underdamped_spring_still_settles() {
        let mut s = Spring::new(SpringConfig::new(200.0, 4.0, 1.0), 0.0_f32);
        s.set_target(100.0);
        settle(&mut s, &[1.0 / 60.0], 30.0);
        assert!(s.is_at_rest());
        assert_eq!(s.position(), 100.0);
    }

    #[test]
    fn test_frame_rate_independence() {
        let mut fast = Spring::new(SpringConfig::CURSOR, 0.0_f32);
        let mut slow = Spring::new(SpringConfig::CURSOR, 0.0_f32);
        fast.set_target(500.0);
        slow.set_target(500.0);

        for _ in 0..24 {
            fast.step(1.0 / 240.0);
        }
        for _ in 0..3 {
            slow.step(1.0 / 30.0);
        }
        // Same 0.1s of simulated time
        assert!((fast.position() - slow.position()).abs() < 0.01);
        // x(t) = 500·(1 - 3e^(-20t) + 2e^(-30t)) for this spring from rest
        let t = 0.1_f64;
        let exact = 500.0 * (1.0 - 3.0 * (-20.0 * t).exp() + 2.0 * (-30.0 * t).exp());
        assert!((slow.position() as f64 - exact).abs() < 0.01);
    }

    #[test]
    fn test_huge_dt_settles() {
        let mut s = Spring::new(SpringConfig::CURSOR, 0.0_f32);
        s.set_target(100.0);
        assert!(!s.step(1000.0));
        assert_eq!(s.position(), 100.0);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut s = Spring::new(SpringConfig::CURSOR, Vec2::new(1.0, 2.0));
        s.set_target(Vec2::new(f32::NAN, 0.0));
        assert!(s.is_at_rest());
        assert_eq!(s.target(), Vec2::new(1.0, 2.0));

        s.set_target(Vec2::new(10.0, 10.0));
        assert!(s.step(f32::NAN));
        assert!(s.position().is_finite());
    }

    #[test]
    fn test_jump_to_stops_motion() {
        let mut s = Spring::new(SpringConfig::CURSOR, 0.0_f32);
        s.set_target(300.0);
        s.step(0.016);
        s.jump_to(42.0);
        assert!(s.is_at_rest());
        assert!(!s.step(0.016));
        assert_eq!(s.position(), 42.0);
    }

    proptest! {
        #[test]
        fn prop_converges_from_any_start(
            start in -2000.0f32..2000.0,
            target in -2000.0f32..2000.0,
            dt in 0.001f32..0.2,
        ) {
            let mut s = Spring::new(SpringConfig::CURSOR, start);
            s.set_target(target);
            settle(&mut s, &[dt], 10.0);
            prop_assert!(s.is_at_rest());
            prop_assert_eq!(s.position(), target);
        }
    }
}
