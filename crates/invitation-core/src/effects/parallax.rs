use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::page::{ElementRef, Page, Selector};
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxSettings {
    pub selector: Selector,
    /// Speed of the first layer, in pixels moved per pixel scrolled.
    pub base_speed: f64,
    /// Added per subsequent layer.
    pub speed_step: f64,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            selector: Selector::class("watercolor-bg"),
            base_speed: 0.02,
            speed_step: 0.005,
        }
    }
}

impl ParallaxSettings {
    pub fn speed(&self, index: usize) -> f64 {
        self.base_speed + index as f64 * self.speed_step
    }
}

struct Layers {
    page: Rc<dyn Page>,
    settings: ParallaxSettings,
    layers: Vec<ElementRef>,
    frame: RefCell<Option<TaskHandle>>,
    frame_pending: Cell<bool>,
}

/// Background layers drifting upwards slower than the content.
///
/// Scroll events are coalesced: at most one update per animation frame.
pub struct Parallax {
    layers: Rc<Layers>,
    scheduler: Rc<dyn Scheduler>,
}

impl Parallax {
    pub fn attach(
        page: Rc<dyn Page>,
        scheduler: Rc<dyn Scheduler>,
        settings: ParallaxSettings,
    ) -> Option<Self> {
        let layers = page.query_all(&settings.selector);
        if layers.is_empty() {
            tracing::debug!(selector = %settings.selector, "parallax disabled: no layers");
            return None;
        }
        Some(Self {
            layers: Rc::new(Layers {
                page,
                settings,
                layers,
                frame: RefCell::new(None),
                frame_pending: Cell::new(false),
            }),
            scheduler,
        })
    }

    /// Request a frame unless one is already pending. Returns whether a new
    /// frame was requested.
    pub fn on_scroll(&self) -> bool {
        if self.layers.frame_pending.replace(true) {
            return false;
        }
        let weak: Weak<Layers> = Rc::downgrade(&self.layers);
        let handle = self.scheduler.next_frame(Box::new(move || {
            if let Some(layers) = weak.upgrade() {
                layers.update();
            }
        }));
        *self.layers.frame.borrow_mut() = Some(handle);
        true
    }
}

impl Drop for Parallax {
    fn drop(&mut self) {
        if let Some(frame) = self.layers.frame.borrow_mut().take() {
            frame.cancel();
        }
    }
}

impl Layers {
    fn update(&self) {
        let scrolled = self.page.scroll_metrics().scroll_top;
        for (index, layer) in self.layers.iter().enumerate() {
            let offset = -(scrolled * self.settings.speed(index));
            // Avoid rendering "-0px" at the top of the page.
            let offset = if offset == 0.0 { 0.0 } else { offset };
            layer.set_style("transform", &format!("translateY({offset}px)"));
        }
        self.frame_pending.set(false);
        self.frame.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, MemoryElement, MemoryPage};
    use crate::scheduler::{ManualScheduler, FRAME_INTERVAL};

    fn offset(el: &MemoryElement) -> f64 {
        let transform = el.style("transform").unwrap();
        transform
            .trim_start_matches("translateY(")
            .trim_end_matches("px)")
            .parse()
            .unwrap()
    }

    #[test]
    fn speeds_grow_with_index() {
        let settings = ParallaxSettings::default();
        assert!((settings.speed(0) - 0.02).abs() < 1e-12);
        assert!((settings.speed(2) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn one_update_per_frame() {
        let page = Rc::new(MemoryPage::new(5_000.0, 1_000.0));
        let layers: Vec<_> = (0..3)
            .map(|_| page.add(MemoryElement::new().with_class("watercolor-bg")))
            .collect();
        let sched = Rc::new(ManualScheduler::new(0));
        let parallax =
            Parallax::attach(page.clone(), sched.clone(), ParallaxSettings::default()).unwrap();

        page.set_scroll_top(400.0);
        assert!(parallax.on_scroll());
        page.set_scroll_top(1_000.0);
        assert!(!parallax.on_scroll());
        assert_eq!(sched.pending(), 1);

        sched.advance(FRAME_INTERVAL);
        assert!((offset(&layers[0]) + 20.0).abs() < 1e-9);
        assert!((offset(&layers[1]) + 25.0).abs() < 1e-9);
        assert!((offset(&layers[2]) + 30.0).abs() < 1e-9);

        // Next scroll after the frame ran requests a fresh one.
        assert!(parallax.on_scroll());
    }

    #[test]
    fn top_of_page_renders_zero() {
        let page = Rc::new(MemoryPage::new(5_000.0, 1_000.0));
        let layer = page.add(MemoryElement::new().with_class("watercolor-bg"));
        let sched = Rc::new(ManualScheduler::new(0));
        let parallax = Parallax::attach(page, sched.clone(), ParallaxSettings::default()).unwrap();
        parallax.on_scroll();
        sched.advance(FRAME_INTERVAL);
        assert_eq!(layer.style("transform").as_deref(), Some("translateY(0px)"));
    }

    #[test]
    fn no_layers_disables() {
        let page = Rc::new(MemoryPage::new(5_000.0, 1_000.0));
        let sched = Rc::new(ManualScheduler::new(0));
        assert!(Parallax::attach(page, sched, ParallaxSettings::default()).is_none());
    }
}
