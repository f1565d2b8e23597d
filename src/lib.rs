//! Wabi Folio - motion and navigation core for a portfolio site
//!
//! Core modules:
//! - `easing`: Tween curves shared by scroll and cursor animations
//! - `motion`: Pointer motion engine (spring smoothing, parallax layers, custom cursor)
//! - `nav`: Scroll navigation (active section, eased smooth scroll, galleries, scroll hint)
//! - `observe`: Observer lists that stand in for reactive UI state
//! - `platform`: Browser bindings (wasm32 only)
//! - `settings`: User motion preferences

pub mod easing;
pub mod motion;
pub mod nav;
pub mod observe;
pub mod platform;
pub mod settings;

pub use motion::{MotionFrame, MotionPolicy, PointerMotionEngine};
pub use nav::{NavEvent, NavOutcome, ScrollNavigator, SectionDescriptor};
pub use settings::Settings;

use glam::Vec2;

/// Tuning constants
pub mod consts {
    /// Largest frame delta the motion engine accepts (seconds). Longer stalls
    /// (tab switch, debugger) are treated as this long.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Background blob spring (heavily over-damped, slow drift)
    pub const BACKGROUND_STIFFNESS: f32 = 60.0;
    pub const BACKGROUND_DAMPING: f32 = 120.0;
    pub const BACKGROUND_MASS: f32 = 1.0;

    /// Cursor spring (just past critical damping)
    pub const CURSOR_STIFFNESS: f32 = 300.0;
    pub const CURSOR_DAMPING: f32 = 25.0;
    pub const CURSOR_MASS: f32 = 0.5;

    /// Spring rest thresholds for pixel values (px, px/s)
    pub const PX_REST_DELTA: f32 = 0.5;
    pub const PX_REST_SPEED: f32 = 2.0;
    /// Spring rest thresholds for unit-range values (scale, opacity)
    pub const UNIT_REST_DELTA: f32 = 0.001;
    pub const UNIT_REST_SPEED: f32 = 0.01;

    /// Share of the normal parallax amplitude kept under reduced motion
    pub const REDUCED_AMPLITUDE: f32 = 0.45;

    /// Custom cursor box is 128px; its origin sits half a box up-left of the pointer
    pub const CURSOR_HALF_SIZE: f32 = 64.0;
    /// Cursor position before the first pointer move (off-screen)
    pub const CURSOR_HIDDEN_POS: f32 = -100.0;
    /// Lens ring tween length (seconds)
    pub const LENS_TWEEN_SECS: f32 = 0.3;

    /// Viewport assumed until the first resize signal
    pub const DEFAULT_VIEWPORT_W: f32 = 1000.0;
    pub const DEFAULT_VIEWPORT_H: f32 = 1000.0;

    /// Distance from viewport top where a section counts as active (px)
    pub const ACTIVATION_LINE: f64 = 120.0;
    /// Fixed header height subtracted from scroll targets (px)
    pub const HEADER_OFFSET: f64 = 80.0;
    /// Scroll containers: activation line as a fraction of the container height
    pub const CONTAINER_ACTIVATION_RATIO: f64 = 0.2;
    /// Header switches to its solid style past this offset (px)
    pub const HEADER_SCROLLED_AT: f64 = 50.0;

    /// Smooth-scroll duration per pixel travelled (ms/px)
    pub const SCROLL_MS_PER_PX: f64 = 0.6;
    pub const SCROLL_MIN_MS: f64 = 350.0;
    pub const SCROLL_MAX_MS: f64 = 1200.0;
    /// Targets closer than this are treated as "already there" (px)
    pub const SCROLL_ARRIVED_PX: f64 = 1.0;

    /// Acknowledge pulse on re-selecting the active section
    pub const PULSE_MS: f64 = 600.0;
    pub const PULSE_SCALE: f64 = 0.04;

    /// Horizontal gallery step: one card plus gap (px)
    pub const GALLERY_STEP_PX: f64 = 600.0;

    /// Scroll hint timings (ms)
    pub const HINT_SHOW_DELAY_MS: f64 = 1500.0;
    pub const HINT_HIDE_AFTER_SCROLL_MS: f64 = 1000.0;
    pub const HINT_HIDE_NEAR_CONTACT_MS: f64 = 500.0;
}

/// Map `value` from `[0, extent]` onto `[-1, 1]`, clamped.
///
/// Degenerate extents (zero, negative, NaN) map everything to the center.
#[inline]
pub fn normalize_centered(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    ((value / extent) * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Clamp a point into the `[0, size]` box
#[inline]
pub fn clamp_to_viewport(p: Vec2, size: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, size.max(Vec2::ZERO))
}
