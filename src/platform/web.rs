//! Page mounting
//!
//! [`PageContext::mount`] reads the page, builds the motion engine and one
//! scroll navigator per scroll region, and attaches every listener. Dropping
//! the context detaches them again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, PointerEvent, Window};

use super::MountError;
use super::callbacks::{FrameLoop, Listeners, Timer};
use super::dom::{self, CursorElements, DomLayout, LayerElements, SCROLL_ROOT_SELECTOR, ScrollRoot};
use super::media::{COARSE_POINTER_QUERY, MediaSignals, REDUCED_MOTION_QUERY};
use crate::consts::CONTAINER_ACTIVATION_RATIO;
use crate::motion::PointerMotionEngine;
use crate::nav::{
    GalleryScroller, GalleryStep, NavEvent, NavOutcome, PageLayout, ScrollHint, ScrollNavigator,
};
use crate::settings::Settings;

/// Keys that scroll the page
const SCROLL_KEYS: [&str; 7] = ["ArrowUp", "ArrowDown", "PageUp", "PageDown", "Home", "End", " "];

/// Section whose galleries the swipe hint points at
const HINT_SECTION: &str = "projects";
const CONTACT_SECTION: &str = "contact";

/// Buttons that flip the visitor's reduced-motion preference
const MOTION_TOGGLE_SELECTOR: &str = "[data-motion-toggle]";

/// The window region is always first
const WINDOW_REGION: usize = 0;

struct Gallery {
    element: Element,
    scroller: GalleryScroller,
}

impl Gallery {
    fn scroll_left(&self) -> f64 {
        self.element.scroll_left() as f64
    }

    fn max_scroll(&self) -> f64 {
        (self.element.scroll_width() - self.element.client_width()).max(0) as f64
    }
}

/// A scroll area with its own sections and navigator
struct Region {
    root: ScrollRoot,
    nav: ScrollNavigator,
    pulsing: Option<String>,
}

impl Region {
    fn layout<'a>(&'a self, document: &'a Document) -> DomLayout<'a> {
        DomLayout::new(&self.root, document)
    }

    /// Containers place their activation line a fixed share down their height
    fn fit_activation_line(&mut self) {
        if self.root.container().is_some() {
            let height = self.root.client_height();
            self.nav.set_activation_line(height * CONTAINER_ACTIVATION_RATIO);
        }
    }

    fn render_pulse(&mut self, document: &Document, pulse: Option<(String, f64)>) {
        if let Some(previous) = self.pulsing.as_deref() {
            if pulse.as_ref().is_none_or(|(id, _)| id != previous) {
                dom::set_pulse(document, previous, None);
            }
        }
        self.pulsing = pulse.map(|(id, scale)| {
            dom::set_pulse(document, &id, Some(scale));
            id
        });
    }
}

struct Page {
    window: Window,
    document: Document,
    settings: RefCell<Settings>,
    motion: RefCell<PointerMotionEngine>,
    regions: RefCell<Vec<Region>>,
    galleries: RefCell<Vec<Gallery>>,
    hint: RefCell<ScrollHint>,
    hint_element: Option<HtmlElement>,
    motion_toggles: Vec<Element>,
    last_motion_time: Cell<Option<f64>>,
    motion_loop: FrameLoop,
    scroll_loop: FrameLoop,
    hint_timer: Timer,
    listeners: RefCell<Listeners>,
}

/// A mounted page. Listeners and frame loops live exactly as long as this.
pub struct PageContext {
    page: Rc<Page>,
}

/// Adapt a `Page` method into a browser callback that holds the page weakly
fn with_page<A: 'static>(weak: &Weak<Page>, handler: fn(&Page, A)) -> impl FnMut(A) + 'static {
    let weak = weak.clone();
    move |arg| {
        if let Some(page) = weak.upgrade() {
            handler(&page, arg);
        }
    }
}

/// The window navigator: fixed header offset, header chrome, top-level links
fn window_region(window: &Window, document: &Document) -> Region {
    let sections = dom::read_sections(document, None);
    if sections.is_empty() {
        log::debug!("No [data-section] elements; navigation disabled");
    }
    let mut nav = ScrollNavigator::new(sections);

    let links = dom::nav_links(document, None);
    let header = document.get_element_by_id("site-header");
    nav.subscribe(move |event| match event {
        NavEvent::ActiveChanged(active) => dom::mark_active(&links, active.as_deref()),
        NavEvent::Scrolled(scrolled) => {
            if let Some(header) = &header {
                dom::set_flag(header, "data-scrolled", *scrolled);
            }
        }
        NavEvent::Pulse(id) => log::debug!("Already at '{}'", id),
    });

    Region {
        root: ScrollRoot::Window(window.clone()),
        nav,
        pulsing: None,
    }
}

/// Overlay containers with their own sections and side navigation. The
/// clicked section lights up at once; sections align with the container top.
fn container_regions(document: &Document) -> Vec<Region> {
    dom::query_all(document, SCROLL_ROOT_SELECTOR)
        .into_iter()
        .filter_map(|container| {
            let sections = dom::read_sections(document, Some(&container));
            if sections.is_empty() {
                log::debug!("Scroll container without sections ignored");
                return None;
            }
            let mut nav = ScrollNavigator::new(sections)
                .with_header_offset(0.0)
                .with_activate_on_navigate();
            let links = dom::nav_links(document, Some(&container));
            nav.subscribe(move |event| {
                if let NavEvent::ActiveChanged(active) = event {
                    dom::mark_active(&links, active.as_deref());
                }
            });
            let mut region = Region {
                root: ScrollRoot::Element(container),
                nav,
                pulsing: None,
            };
            region.fit_activation_line();
            Some(region)
        })
        .collect()
}

impl PageContext {
    pub fn mount() -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let settings = Settings::load();
        let media = MediaSignals::query(&window);

        let mut regions = vec![window_region(&window, &document)];
        regions.extend(container_regions(&document));
        let smooth = media.smooth_scroll(&settings);
        for region in regions.iter_mut() {
            region.nav.set_reduced_motion(!smooth);
        }

        let mut motion = PointerMotionEngine::default();
        if let Some((width, height)) = dom::viewport_size(&window) {
            motion.set_viewport(width as f32, height as f32);
        }
        motion.set_policy(media.motion_policy(&settings));
        motion.set_cursor_enabled(media.custom_cursor(&settings));

        let layers = LayerElements::find(&document);
        let cursor = CursorElements::find(&document).unwrap_or_else(|err| {
            log::warn!("Custom cursor disabled: {}", err);
            None
        });
        log::info!(
            "Found {} parallax layers, custom cursor: {}, {} scroll regions",
            layers.len(),
            cursor.is_some(),
            regions.len()
        );
        motion.subscribe(move |frame| {
            layers.render(frame);
            if let Some(cursor) = &cursor {
                cursor.render(&frame.cursor);
            }
        });

        let galleries: Vec<Gallery> = dom::query_all(&document, "[data-gallery]")
            .into_iter()
            .map(|element| Gallery {
                element,
                scroller: GalleryScroller::default(),
            })
            .collect();
        let hint_element = document
            .get_element_by_id("scroll-hint")
            .and_then(dom::html_element);
        let motion_toggles = dom::query_all(&document, MOTION_TOGGLE_SELECTOR);

        let page = Rc::new_cyclic(|weak: &Weak<Page>| Page {
            motion_loop: FrameLoop::new(window.clone(), with_page(weak, Page::on_motion_frame)),
            scroll_loop: FrameLoop::new(window.clone(), with_page(weak, Page::on_scroll_frame)),
            hint_timer: Timer::new(window.clone(), {
                let weak = weak.clone();
                move || {
                    if let Some(page) = weak.upgrade() {
                        page.on_hint_timer();
                    }
                }
            }),
            window,
            document,
            settings: RefCell::new(settings),
            motion: RefCell::new(motion),
            regions: RefCell::new(regions),
            galleries: RefCell::new(galleries),
            hint: RefCell::new(ScrollHint::new()),
            hint_element,
            motion_toggles,
            last_motion_time: Cell::new(None),
            listeners: RefCell::new(Listeners::new()),
        });

        page.attach(&Rc::downgrade(&page))?;
        page.render_motion_toggles();
        page.sync_all_regions();
        page.motion_loop.request();

        log::info!(
            "Mounted: {} listeners, motion {}",
            page.listeners.borrow().len(),
            page.motion.borrow().policy().as_str()
        );
        Ok(Self { page })
    }

    /// Tear down explicitly (dropping does the same)
    pub fn unmount(self) {}
}

impl Drop for PageContext {
    fn drop(&mut self) {
        for region in self.page.regions.borrow_mut().iter_mut() {
            region.nav.cancel();
        }
        self.page.motion_loop.cancel();
        self.page.scroll_loop.cancel();
        self.page.hint_timer.cancel();
        self.page.listeners.borrow_mut().clear();
        log::info!("Unmounted");
    }
}

impl Page {
    fn attach(&self, weak: &Weak<Page>) -> Result<(), MountError> {
        let mut listeners = self.listeners.borrow_mut();
        let window = &self.window;

        listeners.add(window, "pointermove", with_page(weak, Page::on_pointer_move))?;
        listeners.add_passive(window, "resize", with_page(weak, Page::on_resize))?;
        listeners.add_passive(window, "wheel", with_page(weak, Page::on_user_input))?;
        listeners.add_passive(window, "touchstart", with_page(weak, Page::on_user_input))?;
        listeners.add(window, "keydown", with_page(weak, Page::on_key))?;

        for query in [REDUCED_MOTION_QUERY, COARSE_POINTER_QUERY] {
            match window.match_media(query) {
                Ok(Some(list)) => {
                    listeners.add(&list, "change", with_page(weak, Page::on_media_change))?;
                }
                _ => log::debug!("matchMedia unavailable for {}", query),
            }
        }

        for toggle in &self.motion_toggles {
            listeners.add(toggle, "click", with_page(weak, Page::on_motion_toggle))?;
        }

        let regions = self.regions.borrow();
        for (index, region) in regions.iter().enumerate() {
            let scrolled = weak.clone();
            listeners.add_passive(region.root.event_target(), "scroll", move |_: Event| {
                if let Some(page) = scrolled.upgrade() {
                    page.sync_region(index);
                }
            })?;

            for (id, link) in dom::nav_links(&self.document, region.root.container()) {
                let weak = weak.clone();
                listeners.add(&link, "click", move |event: Event| {
                    if let Some(page) = weak.upgrade() {
                        event.prevent_default();
                        page.navigate(index, &id);
                    }
                })?;
            }
        }

        let galleries = self.galleries.borrow();
        for (index, gallery) in galleries.iter().enumerate() {
            listeners.add_passive(&gallery.element, "scroll", with_page(weak, Page::on_gallery_scroll))?;

            let touched = weak.clone();
            listeners.add_passive(&gallery.element, "touchstart", move |_: Event| {
                if let Some(page) = touched.upgrade() {
                    if let Some(gallery) = page.galleries.borrow_mut().get_mut(index) {
                        gallery.scroller.cancel();
                    }
                }
            })?;

            for button in dom::gallery_buttons(&gallery.element) {
                let Some(step) = button
                    .get_attribute("data-gallery-step")
                    .as_deref()
                    .and_then(GalleryStep::parse)
                else {
                    log::debug!("Ignoring gallery button with an unknown step");
                    continue;
                };
                let weak = weak.clone();
                listeners.add(&button, "click", move |_: Event| {
                    if let Some(page) = weak.upgrade() {
                        page.step_gallery(index, step);
                    }
                })?;
            }
        }
        Ok(())
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |performance| performance.now())
    }

    fn request_motion_frame(&self) {
        if self.motion.borrow_mut().take_frame_request() {
            self.motion_loop.request();
        }
    }

    fn on_pointer_move(&self, event: Event) {
        let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
        let over_block = target
            .as_ref()
            .and_then(|el| el.closest("[data-cursor-block]").ok().flatten())
            .is_some();
        let text = target
            .as_ref()
            .and_then(|el| el.closest("[data-cursor-text]").ok().flatten())
            .and_then(|el| el.get_attribute("data-cursor-text"));

        {
            let mut motion = self.motion.borrow_mut();
            motion.on_pointer_move(pointer.client_x() as f32, pointer.client_y() as f32);
            motion.set_hover_block(over_block);
            motion.set_hover_text(text.as_deref());
        }
        self.request_motion_frame();
    }

    fn on_motion_frame(&self, time: f64) {
        self.motion_loop.begin();
        // First frame after idling gets a nominal step, not the idle gap
        let dt = match self.last_motion_time.replace(Some(time)) {
            Some(last) => ((time - last) / 1000.0) as f32,
            None => 1.0 / 60.0,
        };

        let moving = {
            let mut motion = self.motion.borrow_mut();
            let moving = motion.step(dt);
            motion.take_frame_request();
            motion.commit();
            moving
        };

        if moving {
            self.motion_loop.request();
        } else {
            self.last_motion_time.set(None);
        }
    }

    fn on_resize(&self, _event: Event) {
        if let Some((width, height)) = dom::viewport_size(&self.window) {
            self.motion.borrow_mut().set_viewport(width as f32, height as f32);
        }
        self.request_motion_frame();
        self.sync_all_regions();
    }

    fn on_media_change(&self, _event: Event) {
        self.apply_preferences();
    }

    fn on_motion_toggle(&self, _event: Event) {
        let reduced = {
            let mut settings = self.settings.borrow_mut();
            let reduced = settings.toggle_reduced_motion();
            settings.save();
            reduced
        };
        log::info!("Reduced motion {}", if reduced { "on" } else { "off" });
        self.render_motion_toggles();
        self.apply_preferences();
    }

    fn render_motion_toggles(&self) {
        let pressed = if self.settings.borrow().reduced_motion { "true" } else { "false" };
        for toggle in &self.motion_toggles {
            let _ = toggle.set_attribute("aria-pressed", pressed);
        }
    }

    /// Combine stored preferences with the current media signals
    fn apply_preferences(&self) {
        let media = MediaSignals::query(&self.window);
        log::info!(
            "Motion inputs: reduced motion {:?}, coarse pointer {:?}",
            media.reduced_motion,
            media.coarse_pointer
        );
        let settings = self.settings.borrow();
        {
            let mut motion = self.motion.borrow_mut();
            motion.set_policy(media.motion_policy(&settings));
            motion.set_cursor_enabled(media.custom_cursor(&settings));
        }
        let smooth = media.smooth_scroll(&settings);
        for region in self.regions.borrow_mut().iter_mut() {
            region.nav.set_reduced_motion(!smooth);
        }
        self.request_motion_frame();
    }

    fn sync_all_regions(&self) {
        let count = self.regions.borrow().len();
        for index in 0..count {
            self.sync_region(index);
        }
    }

    /// Active section and chrome after a region scrolled or resized
    fn sync_region(&self, index: usize) {
        {
            let mut regions = self.regions.borrow_mut();
            let Some(region) = regions.get_mut(index) else {
                return;
            };
            region.fit_activation_line();
            let Region { root, nav, .. } = region;
            nav.on_scroll(&DomLayout::new(root, &self.document));
            nav.flush();
        }
        if index == WINDOW_REGION {
            self.sync_hint();
        }
    }

    /// Swipe hint follows what the window shows
    fn sync_hint(&self) {
        let (projects, contact) = {
            let regions = self.regions.borrow();
            let Some(region) = regions.get(WINDOW_REGION) else {
                return;
            };
            let layout = region.layout(&self.document);
            let viewport_height = layout.viewport_height();
            let in_view = |id: &str| {
                layout
                    .section_rect(id)
                    .is_some_and(|rect| rect.intersects(viewport_height))
            };
            (in_view(HINT_SECTION), in_view(CONTACT_SECTION))
        };
        let now = self.now();
        {
            let mut hint = self.hint.borrow_mut();
            hint.set_projects_in_view(projects, now);
            hint.set_contact_in_view(contact, now);
        }
        self.apply_hint(now);
    }

    fn on_user_input(&self, _event: Event) {
        for region in self.regions.borrow_mut().iter_mut() {
            region.nav.on_user_scroll_input();
        }
    }

    fn on_key(&self, event: Event) {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) else {
            return;
        };
        if SCROLL_KEYS.contains(&key.as_str()) {
            self.on_user_input(event);
        }
    }

    fn navigate(&self, index: usize, id: &str) {
        let now = self.now();
        let mut regions = self.regions.borrow_mut();
        let Some(region) = regions.get_mut(index) else {
            return;
        };
        let Region { root, nav, .. } = region;
        match nav.navigate_to(id, now, &DomLayout::new(root, &self.document)) {
            NavOutcome::Missing => {}
            NavOutcome::Jumped(offset) => root.scroll_to(offset),
            NavOutcome::Acknowledged | NavOutcome::Started { .. } => self.scroll_loop.request(),
        }
        nav.flush();
    }

    fn step_gallery(&self, index: usize, step: GalleryStep) {
        let now = self.now();
        let smooth = self
            .regions
            .borrow()
            .get(WINDOW_REGION)
            .is_some_and(|region| !region.nav.reduced_motion());
        let mut galleries = self.galleries.borrow_mut();
        let Some(gallery) = galleries.get_mut(index) else {
            return;
        };
        let (current, max) = (gallery.scroll_left(), gallery.max_scroll());
        if smooth {
            if gallery.scroller.step(step, current, max, now) {
                self.scroll_loop.request();
            }
        } else {
            let target = gallery.scroller.target(step, current, max);
            gallery.element.scroll_to_with_x_and_y(target, 0.0);
        }
    }

    /// Shared frame loop for section scrolls, pulses and gallery rows
    fn on_scroll_frame(&self, time: f64) {
        self.scroll_loop.begin();

        let mut busy = false;
        for region in self.regions.borrow_mut().iter_mut() {
            if let Some(offset) = region.nav.tick(time) {
                region.root.scroll_to(offset);
            }
            let pulse = region
                .nav
                .pulse_scale(time)
                .map(|(id, scale)| (id.to_owned(), scale));
            region.render_pulse(&self.document, pulse);
            busy |= region.nav.needs_frame();
        }

        for gallery in self.galleries.borrow_mut().iter_mut() {
            if let Some(offset) = gallery.scroller.tick(time) {
                gallery.element.scroll_to_with_x_and_y(offset, 0.0);
            }
            busy |= gallery.scroller.is_animating();
        }

        if busy {
            self.scroll_loop.request();
        }
    }

    fn on_gallery_scroll(&self, _event: Event) {
        let now = self.now();
        self.hint.borrow_mut().on_gallery_scroll(now);
        self.apply_hint(now);
    }

    fn on_hint_timer(&self) {
        self.hint_timer.begin();
        let now = self.now();
        self.hint.borrow_mut().update(now);
        self.apply_hint(now);
    }

    /// Reflect hint visibility and schedule its next deadline
    fn apply_hint(&self, now: f64) {
        let (visible, deadline) = {
            let hint = self.hint.borrow();
            (hint.is_visible(), hint.next_deadline())
        };
        if let Some(element) = &self.hint_element {
            dom::set_flag(element, "data-visible", visible);
        }
        match deadline {
            Some(at) => self.hint_timer.schedule(at - now),
            None => self.hint_timer.cancel(),
        }
    }
}
