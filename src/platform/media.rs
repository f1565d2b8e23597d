//! Media-query signals
//!
//! `None` means the browser couldn't answer (no `matchMedia`, query not
//! supported). Unknown answers resolve to the calmer behavior.

use crate::motion::MotionPolicy;
use crate::settings::Settings;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const COARSE_POINTER_QUERY: &str = "(hover: none), (pointer: coarse)";

/// What the browser reports about motion preference and pointer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaSignals {
    pub reduced_motion: Option<bool>,
    pub coarse_pointer: Option<bool>,
}

impl MediaSignals {
    pub fn new(reduced_motion: Option<bool>, coarse_pointer: Option<bool>) -> Self {
        Self {
            reduced_motion,
            coarse_pointer,
        }
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.unwrap_or(true)
    }

    pub fn is_coarse_pointer(&self) -> bool {
        self.coarse_pointer.unwrap_or(true)
    }

    pub fn motion_policy(&self, settings: &Settings) -> MotionPolicy {
        settings.motion_policy(self.prefers_reduced_motion(), self.is_coarse_pointer())
    }

    pub fn custom_cursor(&self, settings: &Settings) -> bool {
        settings.effective_custom_cursor(self.prefers_reduced_motion(), self.is_coarse_pointer())
    }

    pub fn smooth_scroll(&self, settings: &Settings) -> bool {
        settings.effective_smooth_scroll(self.prefers_reduced_motion())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn query(window: &web_sys::Window) -> Self {
        let matches = |query: &str| {
            window
                .match_media(query)
                .ok()
                .flatten()
                .map(|list| list.matches())
        };
        Self::new(matches(REDUCED_MOTION_QUERY), matches(COARSE_POINTER_QUERY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_full_motion() {
        let media = MediaSignals::new(Some(false), Some(false));
        let settings = Settings::default();
        assert_eq!(media.motion_policy(&settings), MotionPolicy::Full);
        assert!(media.custom_cursor(&settings));
        assert!(media.smooth_scroll(&settings));
    }

    #[test]
    fn test_unknown_signals_degrade() {
        let media = MediaSignals::default();
        let settings = Settings::default();
        assert_eq!(media.motion_policy(&settings), MotionPolicy::Suppressed);
        assert!(!media.custom_cursor(&settings));
        assert!(!media.smooth_scroll(&settings));

        let media = MediaSignals::new(None, Some(false));
        assert_eq!(media.motion_policy(&settings), MotionPolicy::Reduced);
    }

    #[test]
    fn test_touch_keeps_smooth_scroll() {
        let media = MediaSignals::new(Some(false), Some(true));
        let settings = Settings::default();
        assert_eq!(media.motion_policy(&settings), MotionPolicy::Suppressed);
        assert!(media.smooth_scroll(&settings));
    }
}
