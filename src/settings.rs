//! Visitor motion preferences
//!
//! Persisted in LocalStorage. Every preference is combined with what the
//! browser reports (reduced-motion media query, coarse pointer) before use.

use serde::{Deserialize, Serialize};

use crate::motion::MotionPolicy;

/// Motion preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reduce motion even when the OS doesn't ask for it
    pub reduced_motion: bool,
    /// Pointer-driven background parallax
    pub parallax: bool,
    /// Custom cursor overlay (fine pointers only)
    pub custom_cursor: bool,
    /// Animated scrolling for section links and galleries
    pub smooth_scroll: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            parallax: true,
            custom_cursor: true,
            smooth_scroll: true,
        }
    }
}

impl Settings {
    /// Effective reduced motion (user setting or OS preference)
    pub fn effective_reduced_motion(&self, system_reduced: bool) -> bool {
        self.reduced_motion || system_reduced
    }

    /// Policy for the pointer motion engine
    pub fn motion_policy(&self, system_reduced: bool, coarse_pointer: bool) -> MotionPolicy {
        if coarse_pointer || !self.parallax {
            MotionPolicy::Suppressed
        } else if self.effective_reduced_motion(system_reduced) {
            MotionPolicy::Reduced
        } else {
            MotionPolicy::Full
        }
    }

    /// Effective custom cursor (hidden on touch and under reduced motion)
    pub fn effective_custom_cursor(&self, system_reduced: bool, coarse_pointer: bool) -> bool {
        self.custom_cursor && !coarse_pointer && !self.effective_reduced_motion(system_reduced)
    }

    /// Effective smooth scroll (jumps under reduced motion)
    pub fn effective_smooth_scroll(&self, system_reduced: bool) -> bool {
        self.smooth_scroll && !self.effective_reduced_motion(system_reduced)
    }

    /// Parse stored JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Flip the visitor's reduced-motion choice. Returns the new value.
    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "wabi_folio_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Stored preferences, or defaults when absent or unreadable
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.as_deref().map(Self::from_json) {
            Some(Some(settings)) => {
                log::info!("Loaded motion preferences: {:?}", settings);
                settings
            }
            Some(None) => {
                log::warn!("Ignoring unreadable stored preferences");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Persist preferences. Private browsing or a full quota only logs.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::debug!("No LocalStorage; preferences kept for this visit only");
            return;
        };
        let written = serde_json::to_string(self)
            .map_err(|err| err.to_string())
            .and_then(|json| {
                storage
                    .set_item(Self::STORAGE_KEY, &json)
                    .map_err(|err| format!("{:?}", err))
            });
        match written {
            Ok(()) => log::debug!("Saved motion preferences"),
            Err(err) => log::warn!("Could not save motion preferences: {}", err),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
