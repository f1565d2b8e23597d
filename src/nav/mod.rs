//! Scroll navigation module
//!
//! Active-section tracking, eased smooth scrolling to sections and along
//! gallery rows, and the swipe hint. Time is passed in as milliseconds from
//! any monotonic clock.

pub mod controller;
pub mod gallery;
pub mod hint;
pub mod scroll;
pub mod section;

pub use controller::{NavEvent, NavOutcome, ScrollNavigator};
pub use gallery::{GalleryScroller, GalleryStep};
pub use hint::ScrollHint;
pub use scroll::{ScrollAnimation, ScrollTiming};
pub use section::{PageLayout, SectionDescriptor, SectionRect, StaticPage, detect_active, site_sections};
