//! The rendering surface the enhancements act on.
//!
//! Nothing in this crate talks to a real document. Components receive a
//! [`Page`] and only ever read and write through [`Element`], which keeps
//! them usable against the in-memory [`MemoryPage`] in tests and in the
//! terminal renderer.

mod memory;
mod selector;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use memory::{MemoryElement, MemoryPage};
pub use selector::Selector;

/// Axis-aligned box in viewport coordinates (pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// A full-width box spanning `top..bottom`.
    pub fn vertical(top: f64, bottom: f64) -> Self {
        Self::new(top, bottom, 0.0, 0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Same box moved `dy` pixels down.
    pub fn shifted(&self, dy: f64) -> Self {
        Self::new(self.top + dy, self.bottom + dy, self.left, self.right)
    }
}

/// Scroll position and extents of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A single addressable node of the page.
///
/// Methods take `&self`: the host owns the node and mutation happens on its
/// single event thread.
pub trait Element {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Set an inline style property, e.g. `("width", "42%")`.
    fn set_style(&self, property: &str, value: &str);
    fn style(&self, property: &str) -> Option<String>;

    fn bounding_rect(&self) -> Rect;
}

pub type ElementRef = Rc<dyn Element>;

/// The document and its viewport.
pub trait Page {
    /// First element matching `selector`, in document order.
    fn query(&self, selector: &Selector) -> Option<ElementRef>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementRef>;

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Scroll so that `element`'s top aligns with the viewport top.
    fn scroll_into_view(&self, element: &ElementRef, behavior: ScrollBehavior);
}
