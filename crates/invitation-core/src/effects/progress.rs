use std::rc::Rc;

use crate::page::{ElementRef, Page, ScrollMetrics, Selector};

/// Reading progress bar: its width tracks how far the page is scrolled.
pub struct ScrollProgress {
    page: Rc<dyn Page>,
    bar: ElementRef,
}

impl ScrollProgress {
    /// Bind to the first element matching `selector` and draw once.
    pub fn attach(page: Rc<dyn Page>, selector: &Selector) -> Option<Self> {
        let Some(bar) = page.query(selector) else {
            tracing::debug!(%selector, "scroll progress disabled: no bar element");
            return None;
        };
        let progress = Self { page, bar };
        progress.update();
        Some(progress)
    }

    /// Recompute and write the bar width. Returns the percentage written.
    pub fn update(&self) -> f64 {
        let pct = progress_percent(self.page.scroll_metrics());
        self.bar.set_style("width", &format!("{pct}%"));
        pct
    }
}

/// Scrolled fraction of the scrollable range, in `0.0..=100.0`.
///
/// A page that fits in the viewport has nothing to scroll and reports 0.
pub fn progress_percent(metrics: ScrollMetrics) -> f64 {
    let scrollable = metrics.scroll_height - metrics.viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, MemoryElement, MemoryPage};

    fn metrics(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            scroll_height,
            viewport_height,
        }
    }

    #[test]
    fn percent_of_scrollable_range() {
        assert_eq!(progress_percent(metrics(0.0, 3_000.0, 1_000.0)), 0.0);
        assert_eq!(progress_percent(metrics(1_000.0, 3_000.0, 1_000.0)), 50.0);
        assert_eq!(progress_percent(metrics(2_000.0, 3_000.0, 1_000.0)), 100.0);
    }

    #[test]
    fn short_page_and_overscroll_are_clamped() {
        assert_eq!(progress_percent(metrics(0.0, 600.0, 800.0)), 0.0);
        assert_eq!(progress_percent(metrics(2_500.0, 3_000.0, 1_000.0)), 100.0);
        assert_eq!(progress_percent(metrics(-50.0, 3_000.0, 1_000.0)), 0.0);
    }

    #[test]
    fn writes_width_at_attach_and_on_update() {
        let page = Rc::new(MemoryPage::new(3_000.0, 1_000.0));
        let bar = page.add(MemoryElement::new().with_class("scroll-line"));
        let progress =
            ScrollProgress::attach(page.clone(), &Selector::class("scroll-line")).unwrap();
        assert_eq!(bar.style("width").as_deref(), Some("0%"));

        page.set_scroll_top(500.0);
        assert_eq!(progress.update(), 25.0);
        assert_eq!(bar.style("width").as_deref(), Some("25%"));
    }

    #[test]
    fn absent_bar_disables() {
        let page = Rc::new(MemoryPage::new(3_000.0, 1_000.0));
        assert!(ScrollProgress::attach(page, &Selector::class("scroll-line")).is_none());
    }
}
