//! One-shot reveal of content as it scrolls into view.
//!
//! Elements are observed against the viewport with its bottom edge pulled
//! up by a margin. An element whose visible share reaches the threshold is
//! marked and never looked at again.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::events::Event;
use crate::page::{ElementRef, Page, Rect, Selector};
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct RevealSettings {
    pub selector: Selector,
    pub visible_class: String,
    /// Bottom inset of the observation area, as a percentage of viewport height.
    pub bottom_margin_pct: f64,
    /// Visible fraction of an element's height required to reveal it.
    pub threshold: f64,
    /// Delay before the startup pass over already-visible elements.
    pub initial_delay: Duration,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            selector: Selector::class("reveal-text"),
            visible_class: "visible".into(),
            bottom_margin_pct: 10.0,
            threshold: 0.1,
            initial_delay: Duration::from_millis(100),
        }
    }
}

struct Observer {
    page: Rc<dyn Page>,
    settings: RevealSettings,
    /// Still-hidden elements with their document-order index.
    observed: RefCell<Vec<(usize, ElementRef)>>,
}

pub struct RevealAnimator {
    observer: Rc<Observer>,
    initial_pass: TaskHandle,
}

impl RevealAnimator {
    /// Start observing every element matching the configured selector.
    ///
    /// Elements already past the threshold are revealed right away; the
    /// startup pass then catches anything else inside the viewport.
    pub fn attach(
        page: Rc<dyn Page>,
        scheduler: &dyn Scheduler,
        settings: RevealSettings,
    ) -> Option<Self> {
        let elements = page.query_all(&settings.selector);
        if elements.is_empty() {
            tracing::debug!(selector = %settings.selector, "reveal disabled: no targets");
            return None;
        }

        let delay = settings.initial_delay;
        let observer = Rc::new(Observer {
            page,
            settings,
            observed: RefCell::new(elements.into_iter().enumerate().collect()),
        });
        observer.observe();

        let weak: Weak<Observer> = Rc::downgrade(&observer);
        let initial_pass = scheduler.after(
            delay,
            Box::new(move || {
                if let Some(observer) = weak.upgrade() {
                    observer.reveal_in_viewport();
                }
            }),
        );

        Some(Self {
            observer,
            initial_pass,
        })
    }

    /// Re-check intersections after the page scrolled.
    pub fn on_scroll(&self) -> Vec<Event> {
        self.observer.observe()
    }

    /// Elements not yet revealed.
    pub fn observed(&self) -> usize {
        self.observer.observed.borrow().len()
    }
}

impl Drop for RevealAnimator {
    fn drop(&mut self) {
        self.initial_pass.cancel();
    }
}

impl Observer {
    fn observe(&self) -> Vec<Event> {
        let viewport_height = self.page.scroll_metrics().viewport_height;
        let settings = &self.settings;
        self.reveal_where(|rect| {
            let ratio = intersection_ratio(rect, viewport_height, settings.bottom_margin_pct);
            ratio > 0.0 && ratio >= settings.threshold
        })
    }

    fn reveal_in_viewport(&self) -> Vec<Event> {
        let viewport_height = self.page.scroll_metrics().viewport_height;
        self.reveal_where(|rect| rect.top < viewport_height && rect.bottom > 0.0)
    }

    fn reveal_where(&self, should_reveal: impl Fn(&Rect) -> bool) -> Vec<Event> {
        let mut events = Vec::new();
        self.observed.borrow_mut().retain(|(index, element)| {
            if !should_reveal(&element.bounding_rect()) {
                return true;
            }
            element.add_class(&self.settings.visible_class);
            events.push(Event::ElementRevealed { index: *index });
            false
        });
        if !events.is_empty() {
            tracing::trace!(revealed = events.len(), "reveal pass");
        }
        events
    }
}

/// Fraction of `rect`'s height inside the viewport `0..viewport_height`
/// shrunk at the bottom by `bottom_margin_pct` percent.
///
/// Zero-height elements count as fully visible when they sit inside the
/// area.
pub fn intersection_ratio(rect: &Rect, viewport_height: f64, bottom_margin_pct: f64) -> f64 {
    let root_bottom = viewport_height * (1.0 - bottom_margin_pct / 100.0);
    let top = rect.top.max(0.0);
    let bottom = rect.bottom.min(root_bottom);
    let height = rect.height();
    if height == 0.0 {
        return if rect.top >= 0.0 && rect.top < root_bottom {
            1.0
        } else {
            0.0
        };
    }
    ((bottom - top).max(0.0) / height).min(1.0)
}
