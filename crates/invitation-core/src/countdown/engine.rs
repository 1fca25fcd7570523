//! Countdown engine.
//!
//! Holds no thread of its own: it registers one periodic task with the
//! injected [`Scheduler`] and one deferred marker-clear task per changed
//! field. Bindings are looked up on every tick, so a field whose element
//! leaves the page is skipped without disturbing the others.
//!
//! ## Usage
//!
//! ```ignore
//! let countdown = Countdown::start(target, page, clock, scheduler, settings);
//! // ... page lives ...
//! drop(countdown); // cancels the periodic tick and pending marker clears
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::field::{Field, Remaining, TargetInstant};
use crate::clock::Clock;
use crate::events::Event;
use crate::page::{ElementRef, Page};
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Running,
    /// Target passed; every field shows the placeholder.
    Ended,
}

/// Tunables for rendering and timing.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownSettings {
    pub tick_interval: Duration,
    /// How long the change marker stays on a field.
    pub animation: Duration,
    /// Text shown in every field once the target has passed.
    pub placeholder: String,
    pub ended_opacity: f64,
    /// Class applied to a field while its change animation plays.
    pub marker_class: String,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1_000),
            animation: Duration::from_millis(300),
            placeholder: "--".into(),
            ended_opacity: 0.5,
            marker_class: "ticking".into(),
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub state: CountdownState,
    /// Fields whose text was written, in render order.
    pub changed: Vec<Field>,
    /// `Some(CountdownEnded)` on the tick that crossed the target.
    pub transition: Option<Event>,
}

struct Engine {
    target: TargetInstant,
    settings: CountdownSettings,
    page: Rc<dyn Page>,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn Scheduler>,
    state: Cell<CountdownState>,
    /// False until the first render; that render writes without markers.
    rendered: Cell<bool>,
    pending_clears: RefCell<BTreeMap<Field, (ElementRef, TaskHandle)>>,
}

/// A running countdown bound to a page. Dropping it stops the countdown.
pub struct Countdown {
    engine: Rc<Engine>,
    periodic: TaskHandle,
}

impl Countdown {
    /// Bind to the page, render once, and start ticking.
    ///
    /// Returns `None` when none of the four field bindings exists on the
    /// page; there is nothing to render, so nothing is scheduled.
    pub fn start(
        target: TargetInstant,
        page: Rc<dyn Page>,
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn Scheduler>,
        settings: CountdownSettings,
    ) -> Option<Self> {
        let bound = Field::ALL
            .iter()
            .filter(|f| page.query(&f.selector()).is_some())
            .count();
        if bound == 0 {
            tracing::debug!("countdown disabled: no field bindings on page");
            return None;
        }
        tracing::debug!(
            until = %target.as_datetime(),
            bound,
            "countdown starting"
        );

        let period = settings.tick_interval;
        let engine = Rc::new(Engine {
            target,
            settings,
            page,
            clock,
            scheduler: scheduler.clone(),
            state: Cell::new(CountdownState::Running),
            rendered: Cell::new(false),
            pending_clears: RefCell::new(BTreeMap::new()),
        });

        engine.tick();

        let weak: Weak<Engine> = Rc::downgrade(&engine);
        let periodic = scheduler.every(
            period,
            Box::new(move || {
                if let Some(engine) = weak.upgrade() {
                    engine.tick();
                }
            }),
        );

        Some(Self { engine, periodic })
    }

    /// Run one recompute-and-render cycle now.
    pub fn tick(&self) -> TickReport {
        self.engine.tick()
    }

    pub fn state(&self) -> CountdownState {
        self.engine.state.get()
    }

    pub fn target(&self) -> TargetInstant {
        self.engine.target
    }

    /// Current remaining time and displayed text, without rendering.
    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    /// Stop ticking and drop every pending marker, removing the marker
    /// class from fields that still carry it. Idempotent.
    pub fn cancel(&self) {
        if !self.periodic.is_cancelled() {
            tracing::debug!("countdown cancelled");
        }
        self.periodic.cancel();
        let pending = std::mem::take(&mut *self.engine.pending_clears.borrow_mut());
        for (element, handle) in pending.into_values() {
            if !handle.is_cancelled() {
                handle.cancel();
                element.remove_class(&self.engine.settings.marker_class);
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.periodic.is_cancelled()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Engine {
    fn tick(&self) -> TickReport {
        if self.state.get() == CountdownState::Ended {
            return self.render_ended(None);
        }

        let remaining_ms = self.target.remaining_ms(self.clock.now_ms());
        match Remaining::from_millis(remaining_ms) {
            Some(remaining) => self.render_running(&remaining),
            None => {
                self.state.set(CountdownState::Ended);
                tracing::debug!(remaining_ms, "countdown ended");
                let event = Event::CountdownEnded {
                    target: self.target.as_datetime(),
                    at: self.now_utc(),
                };
                self.render_ended(Some(event))
            }
        }
    }

    fn render_running(&self, remaining: &Remaining) -> TickReport {
        let animate = self.rendered.replace(true);
        let mut changed = Vec::new();

        for field in Field::ALL {
            let Some(element) = self.page.query(&field.selector()) else {
                continue;
            };
            let text = remaining.format(field);
            if element.text() == text {
                continue;
            }
            if animate {
                element.add_class(&self.settings.marker_class);
                element.set_text(&text);
                self.schedule_clear(field, element);
            } else {
                element.set_text(&text);
            }
            changed.push(field);
        }

        if !changed.is_empty() {
            tracing::trace!(?changed, "countdown rendered");
        }
        TickReport {
            state: CountdownState::Running,
            changed,
            transition: None,
        }
    }

    /// Remove the marker after the animation; replaces any earlier pending
    /// removal for the same field.
    fn schedule_clear(&self, field: Field, element: ElementRef) {
        let marker = self.settings.marker_class.clone();
        let target = element.clone();
        let handle = self.scheduler.after(
            self.settings.animation,
            Box::new(move || target.remove_class(&marker)),
        );
        if let Some((_, previous)) = self
            .pending_clears
            .borrow_mut()
            .insert(field, (element, handle))
        {
            previous.cancel();
        }
    }

    /// Placeholder pass. Runs on every ended tick but only touches bindings
    /// not already showing the placeholder, so a settled page sees no writes
    /// while a binding added after the end still gets one.
    fn render_ended(&self, transition: Option<Event>) -> TickReport {
        let opacity = self.settings.ended_opacity.to_string();
        let mut changed = Vec::new();
        for field in Field::ALL {
            let Some(element) = self.page.query(&field.selector()) else {
                continue;
            };
            if element.text() != self.settings.placeholder {
                element.set_text(&self.settings.placeholder);
                changed.push(field);
            }
            if element.style("opacity").as_deref() != Some(opacity.as_str()) {
                element.set_style("opacity", &opacity);
            }
        }
        self.rendered.set(true);
        TickReport {
            state: CountdownState::Ended,
            changed,
            transition,
        }
    }

    fn snapshot(&self) -> Event {
        let remaining_ms = self.target.remaining_ms(self.clock.now_ms());
        let remaining = match self.state.get() {
            CountdownState::Ended => None,
            CountdownState::Running => Remaining::from_millis(remaining_ms),
        };
        let state = if remaining.is_some() {
            CountdownState::Running
        } else {
            CountdownState::Ended
        };
        let display = Field::ALL
            .iter()
            .filter_map(|&f| self.page.query(&f.selector()).map(|e| (f, e.text())))
            .collect();

        Event::CountdownSnapshot {
            state,
            target: self.target.as_datetime(),
            remaining_ms,
            remaining,
            display,
            at: self.now_utc(),
        }
    }

    fn now_utc(&self) -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(self.clock.now_ms())
            .single()
            .unwrap_or_else(Utc::now)
    }
}
