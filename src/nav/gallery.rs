//! Horizontal project galleries stepped one card at a time

use super::scroll::{ScrollAnimation, ScrollTiming};
use crate::consts::GALLERY_STEP_PX;

/// Direction of a gallery button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryStep {
    Back,
    Forward,
}

impl GalleryStep {
    /// Parse the `data-gallery-step` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "-1" => Some(Self::Back),
            "1" | "+1" => Some(Self::Forward),
            _ => None,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Back => -1.0,
            Self::Forward => 1.0,
        }
    }
}

/// Eased horizontal scrolling for one gallery row
#[derive(Debug, Clone)]
pub struct GalleryScroller {
    step_px: f64,
    timing: ScrollTiming,
    animation: Option<ScrollAnimation>,
}

impl Default for GalleryScroller {
    fn default() -> Self {
        Self::new(GALLERY_STEP_PX)
    }
}

impl GalleryScroller {
    pub fn new(step_px: f64) -> Self {
        Self {
            step_px,
            timing: ScrollTiming::default(),
            animation: None,
        }
    }

    /// Start scrolling one card in `step`. Presses during an animation
    /// stack onto its target. Returns false at either end of the row.
    pub fn step(&mut self, step: GalleryStep, current: f64, max_scroll: f64, now: f64) -> bool {
        let target = self.target(step, current, max_scroll);
        if (target - current).abs() < 0.5 {
            self.animation = None;
            return false;
        }
        self.animation = Some(ScrollAnimation::timed(current, target, now, &self.timing));
        true
    }

    /// Where a press would end up, clamped to the row
    pub fn target(&self, step: GalleryStep, current: f64, max_scroll: f64) -> f64 {
        let base = self.animation.map_or(current, |a| a.target_offset);
        (base + step.sign() * self.step_px).clamp(0.0, max_scroll.max(0.0))
    }

    /// Horizontal offset to write this frame, `None` when idle
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let animation = self.animation?;
        let offset = animation.sample(now);
        if animation.is_done(now) {
            self.animation = None;
        }
        Some(offset)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The user swiped or dragged the row
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(gallery: &mut GalleryScroller, now: f64) -> Option<f64> {
        let mut last = None;
        let mut t = now;
        while let Some(offset) = gallery.tick(t) {
            last = Some(offset);
            t += 16.0;
        }
        last
    }

    #[test]
    fn test_parse_step() {
        assert_eq!(GalleryStep::parse("-1"), Some(GalleryStep::Back));
        assert_eq!(GalleryStep::parse(" 1 "), Some(GalleryStep::Forward));
        assert_eq!(GalleryStep::parse("2"), None);
    }

    #[test]
    fn test_forward_one_card() {
        let mut gallery = GalleryScroller::default();
        assert!(gallery.step(GalleryStep::Forward, 0.0, 3000.0, 0.0));
        assert_eq!(finish(&mut gallery, 0.0), Some(600.0));
    }

    #[test]
    fn test_clamped_at_ends() {
        let mut gallery = GalleryScroller::default();
        assert!(!gallery.step(GalleryStep::Back, 0.0, 3000.0, 0.0));
        assert!(!gallery.is_animating());

        assert!(gallery.step(GalleryStep::Forward, 2800.0, 3000.0, 0.0));
        assert_eq!(finish(&mut gallery, 0.0), Some(3000.0));
        assert!(!gallery.step(GalleryStep::Forward, 3000.0, 3000.0, 1000.0));
    }

    #[test]
    fn test_target_without_animation() {
        let gallery = GalleryScroller::default();
        assert_eq!(gallery.target(GalleryStep::Forward, 100.0, 3000.0), 700.0);
        assert_eq!(gallery.target(GalleryStep::Back, 100.0, 3000.0), 0.0);
        assert_eq!(gallery.target(GalleryStep::Forward, 0.0, -5.0), 0.0);
    }

    #[test]
    fn test_presses_stack_during_animation() {
        let mut gallery = GalleryScroller::default();
        gallery.step(GalleryStep::Forward, 0.0, 3000.0, 0.0);
        let mid = gallery.tick(100.0).expect("animating");
        gallery.step(GalleryStep::Forward, mid, 3000.0, 100.0);
        assert_eq!(finish(&mut gallery, 100.0), Some(1200.0));
    }

    #[test]
    fn test_cancel_stops() {
        let mut gallery = GalleryScroller::default();
        gallery.step(GalleryStep::Forward, 0.0, 3000.0, 0.0);
        gallery.cancel();
        assert_eq!(gallery.tick(50.0), None);
    }
}
