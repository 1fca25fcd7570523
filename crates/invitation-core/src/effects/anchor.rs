use std::rc::Rc;

use crate::page::{Page, ScrollBehavior, Selector};

/// What the host should do with an anchor click after we saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// We scrolled; suppress the default jump.
    Handled,
    /// Not ours; let the default navigation happen.
    FallThrough,
}

/// Smooth scrolling for in-page `#id` links.
pub struct SmoothScroll {
    page: Rc<dyn Page>,
}

impl SmoothScroll {
    pub fn new(page: Rc<dyn Page>) -> Self {
        Self { page }
    }

    pub fn on_click(&self, href: &str) -> ClickOutcome {
        let Some(selector) = anchor_selector(href) else {
            return ClickOutcome::FallThrough;
        };
        match self.page.query(&selector) {
            Some(target) => {
                self.page.scroll_into_view(&target, ScrollBehavior::Smooth);
                ClickOutcome::Handled
            }
            None => {
                tracing::trace!(href, "anchor target missing");
                ClickOutcome::FallThrough
            }
        }
    }
}

/// `#venue` -> `Selector::Id("venue")`. Anything else is not an in-page link.
pub fn anchor_selector(href: &str) -> Option<Selector> {
    match href.parse::<Selector>().ok()? {
        selector @ Selector::Id(_) => Some(selector),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryElement, MemoryPage, Rect};

    #[test]
    fn scrolls_to_existing_target() {
        let page = Rc::new(MemoryPage::new(4_000.0, 800.0));
        page.add(
            MemoryElement::new()
                .with_id("venue")
                .with_layout(Rect::vertical(1_800.0, 2_400.0)),
        );
        let anchors = SmoothScroll::new(page.clone());

        assert_eq!(anchors.on_click("#venue"), ClickOutcome::Handled);
        assert_eq!(page.scroll_metrics().scroll_top, 1_800.0);
        let scrolled = page.scrolled_into_view();
        assert_eq!(scrolled.len(), 1);
        assert_eq!(scrolled[0].1, ScrollBehavior::Smooth);
    }

    #[test]
    fn missing_target_falls_through() {
        let page = Rc::new(MemoryPage::new(4_000.0, 800.0));
        let anchors = SmoothScroll::new(page.clone());
        assert_eq!(anchors.on_click("#rsvp"), ClickOutcome::FallThrough);
        assert!(page.scrolled_into_view().is_empty());
    }

    #[test]
    fn only_fragment_links_qualify() {
        assert_eq!(anchor_selector("#story"), Some(Selector::id("story")));
        assert_eq!(anchor_selector("#"), None);
        assert_eq!(anchor_selector(".story"), None);
        assert_eq!(anchor_selector("https://example.com/#story"), None);
    }
}
