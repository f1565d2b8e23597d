//! Scroll navigation controller
//!
//! Owns the active section, the in-flight smooth scroll and the acknowledge
//! pulse. Page geometry is read through [`PageLayout`]; the caller writes the
//! offsets returned by [`ScrollNavigator::tick`] back to the page.

use serde::Serialize;

use super::scroll::{ScrollAnimation, ScrollTiming};
use super::section::{PageLayout, SectionDescriptor, detect_active};
use crate::consts::*;
use crate::observe::{ObserverId, Observers};

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavOutcome {
    /// Unknown section or no element on the page; nothing changed
    Missing,
    /// Already there: no scroll, one pulse
    Acknowledged,
    /// Reduced motion: write this offset immediately
    Jumped(f64),
    /// Animation started (or restarted) toward `target`
    Started { target: f64, duration: f64 },
}

/// Changes the page chrome reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NavEvent {
    ActiveChanged(Option<String>),
    Pulse(String),
    Scrolled(bool),
}

#[derive(Debug, Clone)]
struct Pulse {
    section_id: String,
    started_at: f64,
}

/// Drives section navigation for one page
#[derive(Debug)]
pub struct ScrollNavigator {
    sections: Vec<SectionDescriptor>,
    timing: ScrollTiming,
    activation_line: f64,
    header_offset: f64,
    animation: Option<ScrollAnimation>,
    pulse: Option<Pulse>,
    active: Option<String>,
    scrolled: bool,
    reduced_motion: bool,
    activate_on_navigate: bool,
    events: Vec<NavEvent>,
    observers: Observers<NavEvent>,
}

impl ScrollNavigator {
    pub fn new(sections: Vec<SectionDescriptor>) -> Self {
        Self {
            sections,
            timing: ScrollTiming::default(),
            activation_line: ACTIVATION_LINE,
            header_offset: HEADER_OFFSET,
            animation: None,
            pulse: None,
            active: None,
            scrolled: false,
            reduced_motion: false,
            activate_on_navigate: false,
            events: Vec::new(),
            observers: Observers::new(),
        }
    }

    /// Space kept above a section when scrolling to it (fixed header height)
    pub fn with_header_offset(mut self, header_offset: f64) -> Self {
        self.header_offset = header_offset;
        self
    }

    /// Mark the requested section active as soon as a scroll or jump starts,
    /// ahead of the next `on_scroll`
    pub fn with_activate_on_navigate(mut self) -> Self {
        self.activate_on_navigate = true;
        self
    }

    /// Move the activation line (px below the top of the scroll area)
    pub fn set_activation_line(&mut self, y: f64) {
        if y.is_finite() {
            self.activation_line = y;
        }
    }

    pub fn activation_line(&self) -> f64 {
        self.activation_line
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&ScrollAnimation> {
        self.animation.as_ref()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Reduced motion swaps animated scrolls for instant jumps
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Scroll offset that brings `id` to the top, below the fixed header.
    /// `None` if the section is unknown or not on the page.
    pub fn target_offset<L: PageLayout + ?Sized>(&self, id: &str, layout: &L) -> Option<f64> {
        if !self.sections.iter().any(|s| s.id == id) {
            return None;
        }
        let rect = layout.section_rect(id)?;
        let max = layout.max_scroll().max(0.0);
        let target = rect.top + layout.scroll_offset() - self.header_offset;
        if !target.is_finite() {
            return None;
        }
        Some(target.clamp(0.0, max))
    }

    /// Handle a click on a navigation link
    pub fn navigate_to<L: PageLayout + ?Sized>(
        &mut self,
        id: &str,
        now: f64,
        layout: &L,
    ) -> NavOutcome {
        let Some(target) = self.target_offset(id, layout) else {
            log::debug!("Navigation target '{}' not found", id);
            return NavOutcome::Missing;
        };
        let current = layout.scroll_offset();

        if self.active.as_deref() == Some(id) || (target - current).abs() < SCROLL_ARRIVED_PX {
            // A scroll already heading here keeps running; anything else stops
            let heading_here = self
                .animation
                .is_some_and(|a| (a.target_offset - target).abs() < SCROLL_ARRIVED_PX);
            if !heading_here {
                self.animation = None;
            }
            self.pulse = Some(Pulse {
                section_id: id.to_owned(),
                started_at: now,
            });
            self.events.push(NavEvent::Pulse(id.to_owned()));
            return NavOutcome::Acknowledged;
        }

        if self.activate_on_navigate {
            self.set_active(Some(id.to_owned()));
        }

        if self.reduced_motion {
            self.animation = None;
            return NavOutcome::Jumped(target);
        }

        if self.animation.is_some() {
            log::debug!("Restarting scroll from {:.0}", current);
        }
        let animation = ScrollAnimation::timed(current, target, now, &self.timing);
        let duration = animation.duration;
        self.animation = Some(animation);
        NavOutcome::Started { target, duration }
    }

    fn set_active(&mut self, active: Option<String>) {
        if active != self.active {
            self.active = active.clone();
            self.events.push(NavEvent::ActiveChanged(active));
        }
    }

    /// Offset to write this frame, `None` when idle
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let animation = self.animation?;
        let offset = animation.sample(now);
        if animation.is_done(now) {
            self.animation = None;
        }
        Some(offset)
    }

    /// Wheel, touch or key input from the user. Any in-flight scroll stops
    /// where it is. Returns true if one was cancelled.
    pub fn on_user_scroll_input(&mut self) -> bool {
        let cancelled = self.animation.take().is_some();
        if cancelled {
            log::debug!("Scroll animation cancelled by user input");
        }
        cancelled
    }

    /// Recompute the active section and header state after the page scrolled
    pub fn on_scroll<L: PageLayout + ?Sized>(&mut self, layout: &L) {
        let active = detect_active(&self.sections, layout, self.activation_line).map(|s| s.id.clone());
        self.set_active(active);

        let scrolled = layout.scroll_offset() > HEADER_SCROLLED_AT;
        if scrolled != self.scrolled {
            self.scrolled = scrolled;
            self.events.push(NavEvent::Scrolled(scrolled));
        }
    }

    /// Heading scale for the pulsing section at `now`. Clears the pulse once
    /// it has run its course.
    pub fn pulse_scale(&mut self, now: f64) -> Option<(&str, f64)> {
        let finished = self
            .pulse
            .as_ref()
            .is_some_and(|p| now - p.started_at >= PULSE_MS);
        if finished {
            self.pulse = None;
        }
        let pulse = self.pulse.as_ref()?;
        let t = ((now - pulse.started_at) / PULSE_MS).clamp(0.0, 1.0);
        let scale = 1.0 + PULSE_SCALE * (std::f64::consts::PI * t).sin();
        Some((pulse.section_id.as_str(), scale))
    }

    /// Whether another animation frame is needed
    pub fn needs_frame(&self) -> bool {
        self.animation.is_some() || self.pulse.is_some()
    }

    /// Stop everything in flight
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pulse = None;
    }

    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&NavEvent) + 'static) -> ObserverId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Deliver queued events to observers. Returns how many were delivered.
    pub fn flush(&mut self) -> usize {
        let events = self.drain_events();
        for event in &events {
            self.observers.notify(event);
        }
        events.len()
    }
}
