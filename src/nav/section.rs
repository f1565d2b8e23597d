//! Sections and active-section detection

use serde::{Deserialize, Serialize};

/// A navigable page section. Declared once, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: String,
    pub label: String,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The site's top-level sections
pub fn site_sections() -> Vec<SectionDescriptor> {
    vec![
        SectionDescriptor::new("home", "Home"),
        SectionDescriptor::new("profile", "Profile"),
        SectionDescriptor::new("projects", "Works"),
        SectionDescriptor::new("contact", "Contact"),
    ]
}

/// Vertical extent of a section relative to the viewport top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub top: f64,
    pub bottom: f64,
}

impl SectionRect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether the horizontal line `y` crosses this rect (edges inclusive)
    #[inline]
    pub fn spans(&self, y: f64) -> bool {
        self.top <= y && self.bottom >= y
    }

    /// Whether any part is inside a viewport of the given height
    #[inline]
    pub fn intersects(&self, viewport_height: f64) -> bool {
        self.top < viewport_height && self.bottom > 0.0
    }
}

/// Read access to live page geometry
pub trait PageLayout {
    /// Viewport-relative rect of the section element, `None` if it's not on the page
    fn section_rect(&self, id: &str) -> Option<SectionRect>;
    /// Current vertical scroll offset
    fn scroll_offset(&self) -> f64;
    /// Largest reachable scroll offset
    fn max_scroll(&self) -> f64;
}

/// First section, in declared order, spanning the activation line.
///
/// Recomputed from scratch on every call; section lists are short.
pub fn detect_active<'a, L: PageLayout + ?Sized>(
    sections: &'a [SectionDescriptor],
    layout: &L,
    activation_line: f64,
) -> Option<&'a SectionDescriptor> {
    sections.iter().find(|section| {
        layout
            .section_rect(&section.id)
            .is_some_and(|rect| rect.spans(activation_line))
    })
}

/// A page held in memory: sections at fixed document positions.
///
/// Used by the headless demo and tests in place of the DOM.
#[derive(Debug, Clone)]
pub struct StaticPage {
    sections: Vec<(String, SectionRect)>,
    scroll: f64,
    viewport_height: f64,
}

impl StaticPage {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            sections: Vec::new(),
            scroll: 0.0,
            viewport_height,
        }
    }

    /// Add a section occupying `[top, top + height)` in document coordinates
    pub fn with_section(mut self, id: impl Into<String>, top: f64, height: f64) -> Self {
        self.sections
            .push((id.into(), SectionRect::new(top, top + height)));
        self
    }

    pub fn document_height(&self) -> f64 {
        self.sections
            .iter()
            .map(|(_, rect)| rect.bottom)
            .fold(self.viewport_height, f64::max)
    }

    /// Scroll the page, clamped to the reachable range
    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }
}

impl PageLayout for StaticPage {
    fn section_rect(&self, id: &str) -> Option<SectionRect> {
        self.sections
            .iter()
            .find(|(section_id, _)| section_id == id)
            .map(|(_, rect)| SectionRect::new(rect.top - self.scroll, rect.bottom - self.scroll))
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LINE: f64 = 120.0;

    fn abc() -> Vec<SectionDescriptor> {
        vec![
            SectionDescriptor::new("a", "A"),
            SectionDescriptor::new("b", "B"),
            SectionDescriptor::new("c", "C"),
        ]
    }

    /// Rects given directly in viewport space
    struct Rects(Vec<(&'static str, SectionRect)>);

    impl PageLayout for Rects {
        fn section_rect(&self, id: &str) -> Option<SectionRect> {
            self.0.iter().find(|(i, _)| *i == id).map(|(_, r)| *r)
        }
        fn scroll_offset(&self) -> f64 {
            0.0
        }
        fn max_scroll(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_only_b_spans_line() {
        let page = StaticPage::new(900.0)
            .with_section("a", 0.0, 800.0)
            .with_section("b", 800.0, 1000.0)
            .with_section("c", 1800.0, 1000.0);
        let mut page = page;
        page.set_scroll(1000.0);
        let sections = abc();
        assert_eq!(detect_active(&sections, &page, LINE).map(|s| s.id.as_str()), Some("b"));
    }

    #[test]
    fn test_overlap_first_declared_wins() {
        let layout = Rects(vec![
            ("a", SectionRect::new(0.0, 200.0)),
            ("b", SectionRect::new(100.0, 400.0)),
            ("c", SectionRect::new(400.0, 800.0)),
        ]);
        let sections = abc();
        assert_eq!(detect_active(&sections, &layout, LINE).map(|s| s.id.as_str()), Some("a"));
    }

    #[test]
    fn test_edges_inclusive() {
        let layout = Rects(vec![("b", SectionRect::new(LINE, 500.0))]);
        let sections = abc();
        assert_eq!(detect_active(&sections, &layout, LINE).map(|s| s.id.as_str()), Some("b"));

        let layout = Rects(vec![("b", SectionRect::new(0.0, LINE))]);
        assert_eq!(detect_active(&sections, &layout, LINE).map(|s| s.id.as_str()), Some("b"));
    }

    #[test]
    fn test_none_when_nothing_spans_or_missing() {
        let layout = Rects(vec![("a", SectionRect::new(300.0, 600.0))]);
        assert!(detect_active(&abc(), &layout, LINE).is_none());
        assert!(detect_active(&abc(), &Rects(Vec::new()), LINE).is_none());
    }

    #[test]
    fn test_intersects_viewport() {
        assert!(SectionRect::new(-100.0, 10.0).intersects(800.0));
        assert!(SectionRect::new(799.0, 1500.0).intersects(800.0));
        assert!(!SectionRect::new(800.0, 1500.0).intersects(800.0));
        assert!(!SectionRect::new(-500.0, 0.0).intersects(800.0));
    }

    #[test]
    fn test_static_page_scroll_clamps() {
        let mut page = StaticPage::new(1000.0).with_section("a", 0.0, 3000.0);
        assert_eq!(page.max_scroll(), 2000.0);
        page.set_scroll(5000.0);
        assert_eq!(page.scroll_offset(), 2000.0);
        page.set_scroll(-10.0);
        assert_eq!(page.scroll_offset(), 0.0);
        assert_eq!(page.section_rect("a"), Some(SectionRect::new(0.0, 3000.0)));
    }

    proptest! {
        #[test]
        fn prop_active_is_first_spanning_section(
            rects in prop::collection::vec((-2000.0f64..2000.0, 0.0f64..1500.0), 3),
            line in 0.0f64..400.0,
        ) {
            let ids = ["a", "b", "c"];
            let layout = Rects(
                ids.iter()
                    .zip(rects.iter())
                    .map(|(id, (top, h))| (*id, SectionRect::new(*top, top + h)))
                    .collect(),
            );
            let sections = abc();
            let expected = ids
                .iter()
                .zip(rects.iter())
                .find(|(_, (top, h))| *top <= line && top + h >= line)
                .map(|(id, _)| *id);
            let active = detect_active(&sections, &layout, line).map(|s| s.id.as_str());
            prop_assert_eq!(active, expected);
        }
    }
}
