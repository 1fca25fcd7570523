//! Page startup: wires every enhancement to one page.

use std::rc::Rc;

use crate::clock::Clock;
use crate::countdown::Countdown;
use crate::effects::{ClickOutcome, Parallax, RevealAnimator, ScrollProgress, SmoothScroll};
use crate::error::Result;
use crate::events::Event;
use crate::page::Page;
use crate::scheduler::Scheduler;
use crate::storage::Config;

/// All enhancements mounted on a page. Dropping it cancels every timer.
pub struct Invitation {
    progress: Option<ScrollProgress>,
    reveal: Option<RevealAnimator>,
    countdown: Option<Countdown>,
    anchors: SmoothScroll,
    parallax: Option<Parallax>,
}

impl Invitation {
    /// Attach every enhancement whose elements exist on `page`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid, including a
    /// target that does not resolve to a local instant. Missing elements
    /// just leave the matching effect off.
    pub fn mount(
        page: Rc<dyn Page>,
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn Scheduler>,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        let target = config.target()?;

        let progress = ScrollProgress::attach(page.clone(), &config.scroll.progress_selector);
        let reveal =
            RevealAnimator::attach(page.clone(), scheduler.as_ref(), config.reveal_settings());
        let countdown = Countdown::start(
            target,
            page.clone(),
            clock,
            scheduler.clone(),
            config.countdown_settings(),
        );
        let anchors = SmoothScroll::new(page.clone());
        let parallax = Parallax::attach(page, scheduler, config.parallax_settings());

        tracing::debug!(
            progress = progress.is_some(),
            reveal = reveal.is_some(),
            countdown = countdown.is_some(),
            parallax = parallax.is_some(),
            "invitation mounted"
        );

        Ok(Self {
            progress,
            reveal,
            countdown,
            anchors,
            parallax,
        })
    }

    /// Scroll listener: progress bar, reveal and parallax.
    pub fn on_scroll(&self) -> Vec<Event> {
        if let Some(progress) = &self.progress {
            progress.update();
        }
        if let Some(parallax) = &self.parallax {
            parallax.on_scroll();
        }
        self.reveal
            .as_ref()
            .map(RevealAnimator::on_scroll)
            .unwrap_or_default()
    }

    /// Click listener for `a[href^="#"]` links.
    pub fn on_anchor_click(&self, href: &str) -> ClickOutcome {
        self.anchors.on_click(href)
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }
}
