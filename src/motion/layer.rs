//! Parallax layer transforms
//!
//! Each decorative layer maps the smoothed pointer position to a 2D offset
//! through `(scaleX, scaleY, translateX, translateY)`. Layers never hold
//! state of their own; they are re-evaluated every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{clamp_to_viewport, normalize_centered};

/// What the layer's scale is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerBasis {
    /// Pointer mapped to `[-1, 1]` per axis (viewport center = 0)
    Normalized,
    /// Pointer in viewport pixels, clamped to the viewport
    Absolute,
}

/// Linear transform from pointer position to layer offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerParams {
    pub scale: Vec2,
    pub translate: Vec2,
    pub basis: LayerBasis,
}

impl LayerParams {
    pub const fn normalized(scale_x: f32, scale_y: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale: Vec2::new(scale_x, scale_y),
            translate: Vec2::new(translate_x, translate_y),
            basis: LayerBasis::Normalized,
        }
    }

    pub const fn absolute(scale_x: f32, scale_y: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale: Vec2::new(scale_x, scale_y),
            translate: Vec2::new(translate_x, translate_y),
            basis: LayerBasis::Absolute,
        }
    }

    /// Layer that sweeps from `x.0` to `x.1` as the pointer crosses the
    /// viewport left to right (and likewise for `y`, top to bottom)
    pub fn range(x: (f32, f32), y: (f32, f32)) -> Self {
        Self::normalized(
            (x.1 - x.0) / 2.0,
            (y.1 - y.0) / 2.0,
            (x.0 + x.1) / 2.0,
            (y.0 + y.1) / 2.0,
        )
    }

    /// Offset for a pointer at `pos` in a viewport of `viewport` size
    pub fn offset(&self, pos: Vec2, viewport: Vec2) -> Vec2 {
        let basis = match self.basis {
            LayerBasis::Normalized => Vec2::new(
                normalize_centered(pos.x, viewport.x),
                normalize_centered(pos.y, viewport.y),
            ),
            LayerBasis::Absolute => {
                if !pos.is_finite() {
                    Vec2::ZERO
                } else {
                    clamp_to_viewport(pos, viewport)
                }
            }
        };
        basis * self.scale + self.translate
    }

    /// Largest absolute offset per axis over every possible pointer position
    pub fn amplitude(&self, viewport: Vec2) -> Vec2 {
        match self.basis {
            LayerBasis::Normalized => self.scale.abs() + self.translate.abs(),
            LayerBasis::Absolute => {
                let far = viewport.max(Vec2::ZERO) * self.scale + self.translate;
                far.abs().max(self.translate.abs())
            }
        }
    }

    /// Same layer with its pointer response scaled by `factor`
    pub fn damped(&self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..*self
        }
    }

    /// Offset with no pointer influence at all
    pub fn rest_offset(&self) -> Vec2 {
        self.translate
    }
}

/// The site's background: four drifting color fields, a blob trailing the
/// pointer, and a faint slow drift.
pub const BACKGROUND_LAYERS: [LayerParams; 6] = [
    LayerParams::normalized(80.0, 120.0, 0.0, 0.0),
    LayerParams::normalized(-100.0, -60.0, 0.0, 0.0),
    LayerParams::normalized(120.0, 80.0, 0.0, 0.0),
    LayerParams::normalized(-60.0, -100.0, 0.0, 0.0),
    // 600px follower, offset so it trails just up-left of the pointer
    LayerParams::absolute(1.0, 1.0, -400.0, -400.0),
    LayerParams::absolute(0.03, 0.03, 0.0, 0.0),
];
