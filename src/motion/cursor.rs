//! Custom cursor overlay
//!
//! A 128px lens that trails the pointer on a stiff spring. Hovering a text
//! block grows the lens and hides the center dot; hovering a word fades in
//! its translation inside the lens.

use glam::Vec2;
use serde::Serialize;

use super::spring::{Spring, SpringConfig};
use crate::consts::*;
use crate::easing::Easing;

/// Everything the overlay needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorFrame {
    /// False on touch devices, under reduced motion, and before the first pointer move
    pub visible: bool,
    /// Top-left of the cursor box
    pub position: Vec2,
    pub dot_scale: f32,
    pub lens_scale: f32,
    pub lens_opacity: f32,
    pub text: Option<String>,
    pub text_scale: f32,
    pub text_opacity: f32,
}

/// Lens ring `(scale, opacity)` over a block vs. elsewhere
const LENS_OVER_BLOCK: (f32, f32) = (1.0, 1.0);
const LENS_IDLE: (f32, f32) = (0.3, 0.8);

/// Fixed-length eased tween between two lens states
#[derive(Debug, Clone, Copy)]
struct LensTween {
    from: (f32, f32),
    to: (f32, f32),
    elapsed: f32,
}

impl LensTween {
    fn at_rest(state: (f32, f32)) -> Self {
        Self {
            from: state,
            to: state,
            elapsed: LENS_TWEEN_SECS,
        }
    }

    fn value(&self) -> (f32, f32) {
        if self.is_done() {
            return self.to;
        }
        let t = Easing::EaseInOut.apply((self.elapsed / LENS_TWEEN_SECS) as f64) as f32;
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }

    /// Start toward `to` from wherever the lens currently is
    fn retarget(&mut self, to: (f32, f32)) {
        if to == self.to {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
    }

    fn step(&mut self, dt: f32) -> bool {
        if self.is_done() {
            return false;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(LENS_TWEEN_SECS);
        !self.is_done()
    }

    fn is_done(&self) -> bool {
        self.elapsed >= LENS_TWEEN_SECS
    }
}

/// Custom cursor state
#[derive(Debug, Clone)]
pub struct CursorState {
    position: Spring<Vec2>,
    dot_scale: Spring<f32>,
    text_scale: Spring<f32>,
    text_opacity: Spring<f32>,
    lens: LensTween,
    text: Option<String>,
    has_pointer: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            position: Spring::new(SpringConfig::CURSOR, Vec2::splat(CURSOR_HIDDEN_POS)),
            dot_scale: Spring::new(SpringConfig::CURSOR_UNIT, 1.0),
            text_scale: Spring::new(SpringConfig::CURSOR_UNIT, 0.0),
            text_opacity: Spring::new(SpringConfig::CURSOR_UNIT, 0.0),
            lens: LensTween::at_rest(LENS_IDLE),
            text: None,
            has_pointer: false,
        }
    }

    /// Follow the pointer. The first sample places the cursor directly
    /// instead of flying in from off-screen.
    pub fn on_pointer_move(&mut self, pointer: Vec2) {
        if !pointer.is_finite() {
            return;
        }
        let target = pointer - Vec2::splat(CURSOR_HALF_SIZE);
        if self.has_pointer {
            self.position.set_target(target);
        } else {
            self.position.jump_to(target);
            self.has_pointer = true;
        }
    }

    /// Pointer entered or left a lens block
    pub fn set_over_block(&mut self, over: bool) {
        self.dot_scale.set_target(if over { 0.0 } else { 1.0 });
        self.lens.retarget(if over { LENS_OVER_BLOCK } else { LENS_IDLE });
    }

    /// Hover text shown inside the lens; empty clears it
    pub fn set_text(&mut self, text: Option<&str>) {
        let text = text.filter(|t| !t.is_empty());
        let shown = if text.is_some() { 1.0 } else { 0.0 };
        self.text_scale.set_target(shown);
        self.text_opacity.set_target(shown);
        // Keep the old string while it fades out
        if let Some(t) = text {
            self.text = Some(t.to_owned());
        }
    }

    pub fn has_pointer(&self) -> bool {
        self.has_pointer
    }

    /// Advance all springs. Returns true while anything is still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        let mut moving = self.position.step(dt);
        moving |= self.dot_scale.step(dt);
        moving |= self.text_scale.step(dt);
        moving |= self.text_opacity.step(dt);
        moving |= self.lens.step(dt);

        if self.text_opacity.is_at_rest() && self.text_opacity.position() == 0.0 {
            self.text = None;
        }
        moving
    }

    pub fn frame(&self, visible: bool) -> CursorFrame {
        let (lens_scale, lens_opacity) = self.lens.value();
        CursorFrame {
            visible: visible && self.has_pointer,
            position: self.position.position(),
            dot_scale: self.dot_scale.position(),
            lens_scale,
            lens_opacity,
            text: self.text.clone(),
            text_scale: self.text_scale.position(),
            text_opacity: self.text_opacity.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cursor: &mut CursorState, secs: f32) {
        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        while t < secs {
            cursor.step(dt);
            t += dt;
        }
    }

    #[test]
    fn test_hidden_until_first_move() {
        let mut cursor = CursorState::new();
        let frame = cursor.frame(true);
        assert!(!frame.visible);
        assert_eq!(frame.position, Vec2::splat(CURSOR_HIDDEN_POS));

        cursor.on_pointer_move(Vec2::new(300.0, 200.0));
        let frame = cursor.frame(true);
        assert!(frame.visible);
        assert_eq!(frame.position, Vec2::new(236.0, 136.0));
    }

    #[test]
    fn test_follows_pointer_on_spring() {
        let mut cursor = CursorState::new();
        cursor.on_pointer_move(Vec2::ZERO);
        cursor.on_pointer_move(Vec2::new(864.0, 664.0));

        cursor.step(1.0 / 60.0);
        let mid = cursor.frame(true).position;
        assert!(mid.x > -64.0 && mid.x < 800.0);

        run(&mut cursor, 2.0);
        assert_eq!(cursor.frame(true).position, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_block_hover_grows_lens_and_hides_dot() {
        let mut cursor = CursorState::new();
        cursor.on_pointer_move(Vec2::new(100.0, 100.0));
        let idle = cursor.frame(true);
        assert_eq!((idle.lens_scale, idle.lens_opacity), LENS_IDLE);
        assert_eq!(idle.dot_scale, 1.0);

        cursor.set_over_block(true);
        run(&mut cursor, 1.0);
        let over = cursor.frame(true);
        assert_eq!((over.lens_scale, over.lens_opacity), LENS_OVER_BLOCK);
        assert_eq!(over.dot_scale, 0.0);
    }

    #[test]
    fn test_lens_retarget_mid_tween_is_continuous() {
        let mut cursor = CursorState::new();
        cursor.set_over_block(true);
        cursor.step(LENS_TWEEN_SECS / 2.0);
        let before = cursor.frame(true).lens_scale;
        cursor.set_over_block(false);
        let after = cursor.frame(true).lens_scale;
        assert!((before - after).abs() < 1e-6);
    }

    #[test]
    fn test_text_fades_out_then_clears() {
        let mut cursor = CursorState::new();
        cursor.set_text(Some("品牌"));
        run(&mut cursor, 1.0);
        let frame = cursor.frame(true);
        assert_eq!(frame.text.as_deref(), Some("品牌"));
        assert_eq!(frame.text_opacity, 1.0);

        cursor.set_text(Some(""));
        cursor.step(1.0 / 60.0);
        assert_eq!(cursor.frame(true).text.as_deref(), Some("品牌"));
        run(&mut cursor, 1.0);
        let frame = cursor.frame(true);
        assert_eq!(frame.text, None);
        assert_eq!(frame.text_scale, 0.0);
    }
}
