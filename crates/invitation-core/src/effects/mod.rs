//! Scroll-driven page effects.
//!
//! Each effect looks up its elements first and returns `None` from its
//! constructor when they are missing, leaving the page untouched.

mod anchor;
mod parallax;
mod progress;
mod reveal;

pub use anchor::{anchor_selector, ClickOutcome, SmoothScroll};
pub use parallax::{Parallax, ParallaxSettings};
pub use progress::{progress_percent, ScrollProgress};
pub use reveal::{intersection_ratio, RevealAnimator, RevealSettings};
