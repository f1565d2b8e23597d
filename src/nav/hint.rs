//! Swipe hint shown over the project galleries on touch screens
//!
//! Appears a moment after the projects section scrolls into view and goes
//! away once the visitor has swiped a gallery or reached the contact
//! section. Leaving the projects section resets it.

use crate::consts::{HINT_HIDE_AFTER_SCROLL_MS, HINT_HIDE_NEAR_CONTACT_MS, HINT_SHOW_DELAY_MS};

#[derive(Debug, Clone, Default)]
pub struct ScrollHint {
    projects_in_view: bool,
    contact_in_view: bool,
    has_scrolled: bool,
    visible: bool,
    show_at: Option<f64>,
    hide_at: Option<f64>,
}

impl ScrollHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_projects_in_view(&mut self, in_view: bool, now: f64) {
        self.projects_in_view = in_view;
        self.reconcile(now);
    }

    pub fn set_contact_in_view(&mut self, in_view: bool, now: f64) {
        self.contact_in_view = in_view;
        self.reconcile(now);
    }

    /// A gallery row scrolled horizontally
    pub fn on_gallery_scroll(&mut self, now: f64) {
        if self.has_scrolled {
            return;
        }
        self.has_scrolled = true;
        if self.visible {
            let hide = now + HINT_HIDE_AFTER_SCROLL_MS;
            self.hide_at = Some(self.hide_at.map_or(hide, |t| t.min(hide)));
        }
        self.reconcile(now);
    }

    /// Fire due timers. Returns true if visibility changed.
    pub fn update(&mut self, now: f64) -> bool {
        let before = self.visible;
        if self.show_at.is_some_and(|t| now >= t) {
            self.show_at = None;
            self.visible = true;
        }
        if self.hide_at.is_some_and(|t| now >= t) {
            self.hide_at = None;
            self.visible = false;
        }
        self.reconcile(now);
        self.visible != before
    }

    /// Earliest pending timer, for scheduling the next `update`
    pub fn next_deadline(&self) -> Option<f64> {
        match (self.show_at, self.hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn reconcile(&mut self, now: f64) {
        if !self.projects_in_view {
            self.visible = false;
            self.has_scrolled = false;
            self.show_at = None;
            self.hide_at = None;
            return;
        }

        let wants_show = !self.visible && !self.contact_in_view && !self.has_scrolled;
        if wants_show {
            self.show_at.get_or_insert(now + HINT_SHOW_DELAY_MS);
        } else {
            self.show_at = None;
        }

        if self.visible && self.contact_in_view && self.hide_at.is_none() {
            self.hide_at = Some(now + HINT_HIDE_NEAR_CONTACT_MS);
        }
    }
}
