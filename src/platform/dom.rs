//! DOM reads and writes
//!
//! Element lookup follows the page's data-attribute contract. All writes are
//! best effort: a failed style or attribute write is ignored.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use super::MountError;
use crate::motion::{CursorFrame, MotionFrame};
use crate::nav::{PageLayout, SectionDescriptor, SectionRect};

pub fn html_element(element: Element) -> Option<HtmlElement> {
    element.dyn_into::<HtmlElement>().ok()
}

/// Every element under `document` matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("Bad selector: {}", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_within(parent: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = parent.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// A child element the markup must provide
fn require(parent: &Element, selector: &str) -> Result<HtmlElement, MountError> {
    parent
        .query_selector(selector)?
        .and_then(html_element)
        .ok_or_else(|| MountError::MissingElement(selector.to_owned()))
}

pub fn viewport_size(window: &Window) -> Option<(f64, f64)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Marks an overflow container with sections of its own
pub const SCROLL_ROOT_SELECTOR: &str = "[data-scroll-root]";

/// Elements matching `selector` that belong to `scope`: descendants of a
/// container, or for the window everything outside any container
fn query_scoped(document: &Document, scope: Option<&Element>, selector: &str) -> Vec<Element> {
    match scope {
        Some(container) => query_within(container, selector),
        None => query_all(document, selector)
            .into_iter()
            .filter(|element| matches!(element.closest(SCROLL_ROOT_SELECTOR), Ok(None)))
            .collect(),
    }
}

/// `[data-section]` elements with an id, labelled by `data-label`
pub fn read_sections(document: &Document, scope: Option<&Element>) -> Vec<SectionDescriptor> {
    query_scoped(document, scope, "[data-section]")
        .into_iter()
        .filter_map(|element| {
            let id = element.id();
            if id.is_empty() {
                log::debug!("Skipping [data-section] without an id");
                return None;
            }
            let label = element.get_attribute("data-label").unwrap_or_else(|| id.clone());
            Some(SectionDescriptor::new(id, label))
        })
        .collect()
}

/// Navigation links and the section id each one targets
pub fn nav_links(document: &Document, scope: Option<&Element>) -> Vec<(String, Element)> {
    query_scoped(document, scope, "[data-nav-target]")
        .into_iter()
        .filter_map(|element| {
            let target = element.get_attribute("data-nav-target")?;
            Some((target, element))
        })
        .collect()
}

/// Step buttons for a gallery row: siblings sharing its parent
pub fn gallery_buttons(gallery: &Element) -> Vec<Element> {
    match gallery.parent_element() {
        Some(parent) => query_within(&parent, "[data-gallery-step]"),
        None => Vec::new(),
    }
}

pub fn set_flag(element: &Element, name: &str, on: bool) {
    let _ = if on {
        element.set_attribute(name, "")
    } else {
        element.remove_attribute(name)
    };
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

/// `aria-current="location"` on links to the active section only
pub fn mark_active(links: &[(String, Element)], active: Option<&str>) {
    for (target, link) in links {
        if Some(target.as_str()) == active {
            let _ = link.set_attribute("aria-current", "location");
            let _ = link.set_attribute("data-active", "");
        } else {
            let _ = link.remove_attribute("aria-current");
            let _ = link.remove_attribute("data-active");
        }
    }
}

/// Heading pulse on a section: `data-pulse` plus the `--pulse-scale` variable
pub fn set_pulse(document: &Document, section_id: &str, scale: Option<f64>) {
    let Some(section) = document.get_element_by_id(section_id).and_then(html_element) else {
        return;
    };
    match scale {
        Some(scale) => {
            set_flag(&section, "data-pulse", true);
            set_style(&section, "--pulse-scale", &format!("{:.4}", scale));
        }
        None => {
            set_flag(&section, "data-pulse", false);
            let _ = section.style().remove_property("--pulse-scale");
        }
    }
}

/// What a navigator scrolls: the window or an overflow container
pub enum ScrollRoot {
    Window(Window),
    Element(Element),
}

impl ScrollRoot {
    /// The container element, `None` for the window
    pub fn container(&self) -> Option<&Element> {
        match self {
            Self::Window(_) => None,
            Self::Element(element) => Some(element),
        }
    }

    pub fn event_target(&self) -> &EventTarget {
        match self {
            Self::Window(window) => window,
            Self::Element(element) => element,
        }
    }

    pub fn scroll_top(&self) -> f64 {
        match self {
            Self::Window(window) => window.scroll_y().unwrap_or(0.0),
            Self::Element(element) => element.scroll_top() as f64,
        }
    }

    pub fn scroll_to(&self, offset: f64) {
        match self {
            Self::Window(window) => window.scroll_to_with_x_and_y(0.0, offset),
            Self::Element(element) => {
                element.scroll_to_with_x_and_y(element.scroll_left() as f64, offset)
            }
        }
    }

    /// Visible height of the scroll area
    pub fn client_height(&self) -> f64 {
        match self {
            Self::Window(window) => viewport_size(window).map_or(0.0, |(_, h)| h),
            Self::Element(element) => element.client_height() as f64,
        }
    }

    /// Viewport y of the scroll area's top edge
    fn top(&self) -> f64 {
        match self {
            Self::Window(_) => 0.0,
            Self::Element(element) => element.get_bounding_client_rect().top(),
        }
    }

    fn content_height(&self, document: &Document) -> f64 {
        match self {
            Self::Window(_) => document
                .document_element()
                .map_or(0.0, |root| root.scroll_height() as f64),
            Self::Element(element) => element.scroll_height() as f64,
        }
    }
}

/// Live geometry of one scroll area, sections measured from its top edge
pub struct DomLayout<'a> {
    root: &'a ScrollRoot,
    document: &'a Document,
}

impl<'a> DomLayout<'a> {
    pub fn new(root: &'a ScrollRoot, document: &'a Document) -> Self {
        Self { root, document }
    }

    pub fn viewport_height(&self) -> f64 {
        self.root.client_height()
    }
}

impl PageLayout for DomLayout<'_> {
    fn section_rect(&self, id: &str) -> Option<SectionRect> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        let top = self.root.top();
        Some(SectionRect::new(rect.top() - top, rect.bottom() - top))
    }

    fn scroll_offset(&self) -> f64 {
        self.root.scroll_top()
    }

    fn max_scroll(&self) -> f64 {
        (self.root.content_height(self.document) - self.viewport_height()).max(0.0)
    }
}

/// `[data-parallax-layer="<index>"]` elements
pub struct LayerElements {
    layers: Vec<(usize, HtmlElement)>,
}

impl LayerElements {
    pub fn find(document: &Document) -> Self {
        let layers = query_all(document, "[data-parallax-layer]")
            .into_iter()
            .filter_map(|element| {
                let index = element.get_attribute("data-parallax-layer")?.trim().parse().ok();
                if index.is_none() {
                    log::debug!("Ignoring parallax layer with a non-numeric index");
                }
                Some((index?, html_element(element)?))
            })
            .collect();
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn render(&self, frame: &MotionFrame) {
        for (index, element) in &self.layers {
            if let Some(offset) = frame.offsets.get(*index) {
                set_style(
                    element,
                    "transform",
                    &format!("translate3d({:.2}px, {:.2}px, 0)", offset.x, offset.y),
                );
            }
        }
    }
}

/// `#custom-cursor` and its three parts
pub struct CursorElements {
    root: HtmlElement,
    dot: HtmlElement,
    lens: HtmlElement,
    text: HtmlElement,
}

impl CursorElements {
    /// `Ok(None)` when the page has no custom cursor
    pub fn find(document: &Document) -> Result<Option<Self>, MountError> {
        let Some(root) = document.get_element_by_id("custom-cursor") else {
            return Ok(None);
        };
        let dot = require(&root, ".cursor-dot")?;
        let lens = require(&root, ".cursor-lens")?;
        let text = require(&root, ".cursor-text")?;
        let root = html_element(root).ok_or_else(|| MountError::MissingElement("#custom-cursor".to_owned()))?;
        Ok(Some(Self {
            root,
            dot,
            lens,
            text,
        }))
    }

    pub fn render(&self, frame: &CursorFrame) {
        if !frame.visible {
            set_style(&self.root, "display", "none");
            return;
        }
        set_style(&self.root, "display", "block");
        set_style(
            &self.root,
            "transform",
            &format!("translate3d({:.2}px, {:.2}px, 0)", frame.position.x, frame.position.y),
        );
        set_style(&self.dot, "transform", &format!("scale({:.3})", frame.dot_scale));
        set_style(&self.lens, "transform", &format!("scale({:.3})", frame.lens_scale));
        set_style(&self.lens, "opacity", &format!("{:.3}", frame.lens_opacity));
        set_style(&self.text, "transform", &format!("scale({:.3})", frame.text_scale));
        set_style(&self.text, "opacity", &format!("{:.3}", frame.text_opacity));
        let text = frame.text.as_deref().unwrap_or_default();
        if self.text.text_content().as_deref() != Some(text) {
            self.text.set_text_content(Some(text));
        }
    }
}
