//! # Invitation Core Library
//!
//! Behaviour layer for a single-page wedding invitation: a live countdown
//! to the wedding day plus a handful of scroll effects. The binary in
//! `invitation-cli` renders the same engine in a terminal.
//!
//! ## Architecture
//!
//! - **Countdown**: a tick-driven state machine (`Running -> Ended`) that
//!   rewrites only the fields whose text changed
//! - **Page**: the rendering surface, injected as a trait so the engine
//!   never reaches for a global document
//! - **Scheduler / Clock**: cancelable periodic and deferred tasks, and the
//!   current instant, both injected
//! - **Effects**: scroll progress, reveal-on-scroll, smooth anchors, parallax
//!
//! ## Key Components
//!
//! - [`Countdown`]: countdown engine
//! - [`Invitation`]: mounts every enhancement on a page
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod countdown;
pub mod effects;
pub mod error;
pub mod events;
pub mod invitation;
pub mod page;
pub mod scheduler;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use countdown::{
    Countdown, CountdownSettings, CountdownState, Field, Remaining, TargetInstant, TickReport,
};
pub use effects::ClickOutcome;
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use invitation::Invitation;
pub use page::{Element, MemoryElement, MemoryPage, Page, Rect, Selector};
pub use scheduler::{LocalScheduler, ManualScheduler, Scheduler, TaskHandle};
pub use storage::Config;
