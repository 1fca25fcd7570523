//! In-memory page used by tests and by the terminal renderer.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{Element, ElementRef, Page, Rect, ScrollBehavior, ScrollMetrics, Selector};

/// A detached element with an id, classes, attributes and a layout box.
///
/// `layout` is in document coordinates; once the element is added to a
/// [`MemoryPage`], its bounding rect follows the page's scroll offset.
#[derive(Debug, Default)]
pub struct MemoryElement {
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    classes: RefCell<BTreeSet<String>>,
    text: RefCell<String>,
    styles: RefCell<BTreeMap<String, String>>,
    layout: Cell<Rect>,
    scroll: OnceCell<Rc<Cell<ScrollMetrics>>>,
    text_writes: Cell<usize>,
    class_adds: RefCell<BTreeMap<String, usize>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.classes.borrow_mut().insert(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        *self.text.borrow_mut() = text.into();
        self
    }

    pub fn with_layout(self, layout: Rect) -> Self {
        self.layout.set(layout);
        self
    }

    pub fn set_layout(&self, layout: Rect) {
        self.layout.set(layout);
    }

    /// How many times `set_text` has been called.
    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }

    /// How many times `class` has been added.
    pub fn class_additions(&self, class: &str) -> usize {
        self.class_adds.borrow().get(class).copied().unwrap_or(0)
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Class(name) => self.classes.borrow().contains(name),
            Selector::Id(name) => self.id.as_deref() == Some(name.as_str()),
            Selector::Attribute { name, value } => {
                self.attributes.get(name).map(String::as_str) == Some(value.as_str())
            }
        }
    }
}

impl Element for MemoryElement {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        self.text_writes.set(self.text_writes.get() + 1);
        *self.text.borrow_mut() = text.to_string();
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn add_class(&self, class: &str) {
        *self
            .class_adds
            .borrow_mut()
            .entry(class.to_string())
            .or_insert(0) += 1;
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn set_style(&self, property: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    fn bounding_rect(&self) -> Rect {
        let scroll_top = self.scroll.get().map(|s| s.get().scroll_top).unwrap_or(0.0);
        self.layout.get().shifted(-scroll_top)
    }
}

/// A document made of [`MemoryElement`]s, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: RefCell<Vec<Rc<MemoryElement>>>,
    scroll: Rc<Cell<ScrollMetrics>>,
    scrolled_into_view: RefCell<Vec<(Rect, ScrollBehavior)>>,
}

impl MemoryPage {
    pub fn new(scroll_height: f64, viewport_height: f64) -> Self {
        let page = Self::default();
        page.scroll.set(ScrollMetrics {
            scroll_top: 0.0,
            scroll_height,
            viewport_height,
        });
        page
    }

    /// Append `element` to the document and return a handle to it.
    pub fn add(&self, element: MemoryElement) -> Rc<MemoryElement> {
        let element = Rc::new(element);
        // A fresh element has no page yet, so this cannot fail.
        let _ = element.scroll.set(self.scroll.clone());
        self.elements.borrow_mut().push(element.clone());
        element
    }

    /// Detach `element` from the document. Returns false if it was not on
    /// this page.
    pub fn remove(&self, element: &Rc<MemoryElement>) -> bool {
        let mut elements = self.elements.borrow_mut();
        let before = elements.len();
        elements.retain(|e| !Rc::ptr_eq(e, element));
        elements.len() != before
    }

    pub fn set_scroll_top(&self, scroll_top: f64) {
        let mut metrics = self.scroll.get();
        metrics.scroll_top = scroll_top;
        self.scroll.set(metrics);
    }

    /// Targets passed to `scroll_into_view`, oldest first, with their
    /// document-coordinate layout.
    pub fn scrolled_into_view(&self) -> Vec<(Rect, ScrollBehavior)> {
        self.scrolled_into_view.borrow().clone()
    }
}

impl Page for MemoryPage {
    fn query(&self, selector: &Selector) -> Option<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .find(|e| e.matches(selector))
            .map(|e| e.clone() as ElementRef)
    }

    fn query_all(&self, selector: &Selector) -> Vec<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .filter(|e| e.matches(selector))
            .map(|e| e.clone() as ElementRef)
            .collect()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll.get()
    }

    fn scroll_into_view(&self, element: &ElementRef, behavior: ScrollBehavior) {
        let metrics = self.scroll.get();
        let layout = element.bounding_rect().shifted(metrics.scroll_top);
        let max_top = (metrics.scroll_height - metrics.viewport_height).max(0.0);
        self.set_scroll_top(layout.top.clamp(0.0, max_top));
        self.scrolled_into_view.borrow_mut().push((layout, behavior));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_by_class_id_and_attribute() {
        let page = MemoryPage::new(2_000.0, 800.0);
        page.add(MemoryElement::new().with_class("scroll-line"));
        page.add(MemoryElement::new().with_id("venue").with_class("reveal-text"));
        page.add(MemoryElement::new().with_attribute("data-countdown", "days"));

        assert!(page.query(&Selector::class("scroll-line")).is_some());
        assert!(page.query(&Selector::id("venue")).is_some());
        assert!(page
            .query(&Selector::attribute("data-countdown", "days"))
            .is_some());
        assert!(page
            .query(&Selector::attribute("data-countdown", "hours"))
            .is_none());
        assert_eq!(page.query_all(&Selector::class("reveal-text")).len(), 1);
    }

    #[test]
    fn bounding_rect_follows_scroll() {
        let page = MemoryPage::new(3_000.0, 800.0);
        let el = page.add(MemoryElement::new().with_layout(Rect::vertical(1_000.0, 1_200.0)));
        assert_eq!(el.bounding_rect().top, 1_000.0);
        page.set_scroll_top(400.0);
        assert_eq!(el.bounding_rect(), Rect::vertical(600.0, 800.0));
    }

    #[test]
    fn scroll_into_view_clamps_to_scrollable_range() {
        let page = MemoryPage::new(1_500.0, 800.0);
        let el = page.add(
            MemoryElement::new()
                .with_id("rsvp")
                .with_layout(Rect::vertical(1_400.0, 1_500.0)),
        );
        let el: ElementRef = el;
        page.scroll_into_view(&el, ScrollBehavior::Smooth);
        assert_eq!(page.scroll_metrics().scroll_top, 700.0);
        assert_eq!(page.scrolled_into_view().len(), 1);
    }

    #[test]
    fn removed_element_no_longer_matches() {
        let page = MemoryPage::new(2_000.0, 800.0);
        let el = page.add(MemoryElement::new().with_id("venue"));
        assert!(page.remove(&el));
        assert!(page.query(&Selector::id("venue")).is_none());
        assert!(!page.remove(&el));
    }

    #[test]
    fn text_writes_are_counted() {
        let el = MemoryElement::new().with_text("00");
        assert_eq!(el.text_writes(), 0);
        el.set_text("01");
        assert_eq!(el.text(), "01");
        assert_eq!(el.text_writes(), 1);
    }
}
