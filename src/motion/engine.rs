//! Pointer motion engine
//!
//! Owns the raw pointer sample, the spring-smoothed position derived from
//! it, and the custom cursor. Layers read offsets from here every frame;
//! the engine itself never touches the DOM.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cursor::{CursorFrame, CursorState};
use super::layer::{BACKGROUND_LAYERS, LayerParams};
use super::spring::{Spring, SpringConfig};
use crate::consts::*;
use crate::observe::{ObserverId, Observers};

/// How much pointer-driven motion the page may show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionPolicy {
    /// Springs, parallax, custom cursor
    #[default]
    Full,
    /// Reduced-motion preference: layers pinned at a damped static offset
    Reduced,
    /// No hover-capable pointer (or parallax switched off): layers at rest
    Suppressed,
}

impl MotionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPolicy::Full => "full",
            MotionPolicy::Reduced => "reduced",
            MotionPolicy::Suppressed => "suppressed",
        }
    }

    /// Whether pointer input animates anything
    pub fn is_animated(&self) -> bool {
        *self == MotionPolicy::Full
    }
}

/// One committed frame of motion output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionFrame {
    pub policy: MotionPolicy,
    pub smoothed: Vec2,
    /// One offset per layer, in layer order
    pub offsets: Vec<Vec2>,
    pub cursor: CursorFrame,
}

/// Spring-smoothed pointer feeding parallax layers and the custom cursor
#[derive(Debug)]
pub struct PointerMotionEngine {
    viewport: Vec2,
    sample: Vec2,
    has_sample: bool,
    smoothed: Spring<Vec2>,
    layers: Vec<LayerParams>,
    policy: MotionPolicy,
    cursor: CursorState,
    cursor_enabled: bool,
    frame_requested: bool,
    observers: Observers<MotionFrame>,
}

impl Default for PointerMotionEngine {
    fn default() -> Self {
        Self::new(BACKGROUND_LAYERS.to_vec(), SpringConfig::BACKGROUND)
    }
}

impl PointerMotionEngine {
    pub fn new(layers: Vec<LayerParams>, config: SpringConfig) -> Self {
        let viewport = Vec2::new(DEFAULT_VIEWPORT_W, DEFAULT_VIEWPORT_H);
        let center = viewport / 2.0;
        Self {
            viewport,
            sample: center,
            has_sample: false,
            smoothed: Spring::new(config, center),
            layers,
            policy: MotionPolicy::Full,
            cursor: CursorState::new(),
            cursor_enabled: true,
            frame_requested: false,
            observers: Observers::new(),
        }
    }

    fn center(&self) -> Vec2 {
        self.viewport / 2.0
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    /// Viewport resized. Ignores empty or non-finite sizes.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let size = Vec2::new(width, height);
        if !size.is_finite() || width <= 0.0 || height <= 0.0 || size == self.viewport {
            return;
        }
        self.viewport = size;
        if !self.has_sample {
            self.sample = self.center();
            self.smoothed.jump_to(self.sample);
        }
        if !self.policy.is_animated() {
            self.smoothed.jump_to(self.center());
        }
        self.frame_requested = true;
    }

    pub fn set_policy(&mut self, policy: MotionPolicy) {
        if policy == self.policy {
            return;
        }
        log::info!("Motion policy: {} -> {}", self.policy.as_str(), policy.as_str());
        self.policy = policy;
        if policy.is_animated() {
            // Ease back out from the pinned center
            self.smoothed.set_target(self.sample);
        } else {
            self.smoothed.jump_to(self.center());
        }
        self.frame_requested = true;
    }

    /// Whether the custom cursor may show at all (user setting)
    pub fn set_cursor_enabled(&mut self, enabled: bool) {
        self.cursor_enabled = enabled;
        self.frame_requested = true;
    }

    /// Record a raw pointer sample. Smoothing happens on the next [`step`](Self::step).
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let pointer = Vec2::new(x, y);
        if !pointer.is_finite() {
            return;
        }
        self.sample = pointer;
        self.has_sample = true;
        if self.policy.is_animated() {
            self.smoothed.set_target(pointer);
        }
        self.cursor.on_pointer_move(pointer);
        self.frame_requested = true;
    }

    pub fn set_hover_block(&mut self, over: bool) {
        self.cursor.set_over_block(over);
        self.frame_requested = true;
    }

    pub fn set_hover_text(&mut self, text: Option<&str>) {
        self.cursor.set_text(text);
        self.frame_requested = true;
    }

    /// Latest raw pointer sample (viewport center before the first move)
    pub fn sample(&self) -> Vec2 {
        self.sample
    }

    /// Smoothed pointer. Pinned to the viewport center unless motion is `Full`.
    pub fn smoothed(&self) -> Vec2 {
        if self.policy.is_animated() {
            self.smoothed.position()
        } else {
            self.center()
        }
    }

    /// Advance the springs by `dt` seconds. Returns true while anything moves.
    pub fn step(&mut self, dt: f32) -> bool {
        if !self.policy.is_animated() {
            return false;
        }
        let dt = dt.min(MAX_FRAME_DT);
        let mut moving = self.smoothed.step(dt);
        moving |= self.cursor.step(dt);
        moving
    }

    /// Offset for one layer at the current smoothed position
    pub fn offset(&self, layer: &LayerParams) -> Vec2 {
        match self.policy {
            MotionPolicy::Full => layer.offset(self.smoothed.position(), self.viewport),
            MotionPolicy::Reduced => layer
                .damped(REDUCED_AMPLITUDE)
                .offset(self.center(), self.viewport),
            MotionPolicy::Suppressed => layer.rest_offset(),
        }
    }

    pub fn offsets(&self) -> Vec<Vec2> {
        self.layers.iter().map(|layer| self.offset(layer)).collect()
    }

    pub fn cursor_visible(&self) -> bool {
        self.policy.is_animated() && self.cursor_enabled && self.cursor.has_pointer()
    }

    pub fn frame(&self) -> MotionFrame {
        MotionFrame {
            policy: self.policy,
            smoothed: self.smoothed(),
            offsets: self.offsets(),
            cursor: self.cursor.frame(self.cursor_visible()),
        }
    }

    /// True once per input that needs a repaint; the caller schedules the frame
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&MotionFrame) + 'static) -> ObserverId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Publish the current frame to every subscriber
    pub fn commit(&mut self) {
        let frame = self.frame();
        self.observers.notify(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn settle(engine: &mut PointerMotionEngine) {
        for _ in 0..(60 * 60) {
            if !engine.step(1.0 / 60.0) {
                return;
            }
        }
        panic!("engine did not settle within a minute");
    }

    #[test]
    fn test_defaults_before_first_move() {
        let engine = PointerMotionEngine::default();
        let center = engine.viewport() / 2.0;
        assert_eq!(engine.sample(), center);
        assert_eq!(engine.smoothed(), center);
        for offset in engine.offsets() {
            assert!(offset.is_finite());
        }
        assert!(!engine.cursor_visible());
        assert!(!engine.frame().cursor.visible);
    }

    #[test]
    fn test_steady_state_offsets() {
        let mut engine = PointerMotionEngine::default();
        engine.set_viewport(1000.0, 1000.0);
        engine.on_pointer_move(0.0, 0.0);
        settle(&mut engine);
        engine.on_pointer_move(800.0, 600.0);
        settle(&mut engine);

        let pointer = Vec2::new(800.0, 600.0);
        assert_eq!(engine.smoothed(), pointer);
        for (layer, offset) in BACKGROUND_LAYERS.iter().zip(engine.offsets()) {
            assert_eq!(offset, layer.offset(pointer, engine.viewport()));
        }
        assert!((engine.offsets()[0] - Vec2::new(48.0, 24.0)).abs().max_element() < 1e-3);
        assert_eq!(engine.offsets()[4], Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_step_does_not_need_uniform_frames() {
        let mut a = PointerMotionEngine::default();
        let mut b = PointerMotionEngine::default();
        a.on_pointer_move(900.0, 100.0);
        b.on_pointer_move(900.0, 100.0);
        for _ in 0..27 {
            a.step(1.0 / 60.0);
        }
        // The 0.15 stall is capped at MAX_FRAME_DT
        for dt in [0.05, 0.1, 0.03, 0.07, 0.1, 0.15] {
            b.step(dt);
        }
        // Both covered 0.45s
        assert!((a.smoothed() - b.smoothed()).abs().max_element() < 0.01);
    }

    #[test]
    fn test_reduced_motion_output_is_constant() {
        let mut engine = PointerMotionEngine::default();
        engine.set_policy(MotionPolicy::Reduced);
        let first = engine.frame();

        for (i, (x, y)) in [(0.0, 0.0), (999.0, 1.0), (500.0, 800.0)].into_iter().enumerate() {
            engine.on_pointer_move(x, y);
            assert!(!engine.step(0.016 * (i + 1) as f32));
            let frame = engine.frame();
            assert_eq!(frame.smoothed, first.smoothed);
            assert_eq!(frame.offsets, first.offsets);
            assert!(!frame.cursor.visible);
        }
    }

    #[test]
    fn test_reduced_amplitude_is_damped() {
        let mut engine = PointerMotionEngine::default();
        engine.set_policy(MotionPolicy::Reduced);
        let follower = BACKGROUND_LAYERS[4];
        // Center (500, 500) at 45% of the follower's unit scale
        let expected = Vec2::splat(225.0 - 400.0);
        assert!((engine.offset(&follower) - expected).abs().max_element() < 1e-3);
    }

    #[test]
    fn test_suppressed_layers_at_rest_and_no_cursor() {
        let mut engine = PointerMotionEngine::default();
        engine.set_policy(MotionPolicy::Suppressed);
        engine.on_pointer_move(10.0, 10.0);
        for (layer, offset) in BACKGROUND_LAYERS.iter().zip(engine.offsets()) {
            assert_eq!(offset, layer.rest_offset());
        }
        assert!(!engine.cursor_visible());
    }

    #[test]
    fn test_policy_restore_springs_back_to_pointer() {
        let mut engine = PointerMotionEngine::default();
        engine.set_policy(MotionPolicy::Reduced);
        engine.on_pointer_move(100.0, 900.0);
        engine.set_policy(MotionPolicy::Full);
        assert_eq!(engine.smoothed(), engine.viewport() / 2.0);
        settle(&mut engine);
        assert_eq!(engine.smoothed(), Vec2::new(100.0, 900.0));
        assert!(engine.cursor_visible());
    }

    #[test]
    fn test_cursor_setting_hides_cursor() {
        let mut engine = PointerMotionEngine::default();
        engine.on_pointer_move(10.0, 10.0);
        assert!(engine.cursor_visible());
        engine.set_cursor_enabled(false);
        assert!(!engine.cursor_visible());
    }

    #[test]
    fn test_frame_request_is_one_shot() {
        let mut engine = PointerMotionEngine::default();
        assert!(!engine.take_frame_request());
        engine.on_pointer_move(1.0, 2.0);
        assert!(engine.take_frame_request());
        assert!(!engine.take_frame_request());
    }

    #[test]
    fn test_resize_before_pointer_recenters() {
        let mut engine = PointerMotionEngine::default();
        engine.set_viewport(1600.0, 900.0);
        assert_eq!(engine.smoothed(), Vec2::new(800.0, 450.0));
        engine.set_viewport(f32::NAN, 10.0);
        engine.set_viewport(0.0, 10.0);
        assert_eq!(engine.viewport(), Vec2::new(1600.0, 900.0));
    }

    #[test]
    fn test_commit_notifies_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = PointerMotionEngine::default();
        let sink = seen.clone();
        let id = engine.subscribe(move |frame| sink.borrow_mut().push(frame.smoothed));

        engine.commit();
        engine.on_pointer_move(700.0, 700.0);
        settle(&mut engine);
        engine.commit();
        engine.unsubscribe(id);
        engine.commit();

        assert_eq!(*seen.borrow(), vec![Vec2::splat(500.0), Vec2::splat(700.0)]);
    }
}
