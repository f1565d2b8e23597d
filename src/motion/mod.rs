//! Pointer motion module
//!
//! Pure and frame-rate independent:
//! - Springs advance by their analytic solution, never by a per-frame ratio
//! - Layer offsets are functions of the smoothed position only
//! - No DOM or platform dependencies

pub mod cursor;
pub mod engine;
pub mod layer;
pub mod spring;

pub use cursor::{CursorFrame, CursorState};
pub use engine::{MotionFrame, MotionPolicy, PointerMotionEngine};
pub use layer::{BACKGROUND_LAYERS, LayerBasis, LayerParams};
pub use spring::{Spring, SpringConfig, SpringValue};
