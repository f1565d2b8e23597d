//! Easing curves for time-based tweens
//!
//! All curves map progress `t` in `[0, 1]` onto `[0, 1]`, with `apply(0) == 0`
//! and `apply(1) == 1`. Input outside the range is clamped.

/// Interpolation curve for tweens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Cosine-based in/out, what CSS and most tween libraries call "easeInOut"
    EaseInOut,
    #[default]
    EaseInOutCubic,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::EaseInOut => 0.5 - 0.5 * (std::f64::consts::PI * t).cos(),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 2] = [Easing::EaseInOut, Easing::EaseInOutCubic];

    #[test]
    fn test_easing_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-12, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
            assert_eq!(easing.apply(f64::NAN), easing.apply(0.0));
        }
    }

    #[test]
    fn test_easing_strictly_increasing() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for i in 1..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!(v > prev, "{:?} not increasing at step {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_ease_in_out_cubic_symmetry() {
        let e = Easing::EaseInOutCubic;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
        for i in 0..=10 {
            let t = i as f64 / 20.0;
            assert!((e.apply(t) + e.apply(1.0 - t) - 1.0).abs() < 1e-12);
        }
    }
}
