//! Live countdown to a fixed local-time target.
//!
//! ## State Transitions
//!
//! ```text
//! Running -> Ended
//! ```
//!
//! `Ended` is terminal: the target never moves and time only moves forward.

mod engine;
mod field;

pub use engine::{Countdown, CountdownSettings, CountdownState, TickReport};
pub use field::{
    format_field, parse_local, Field, Remaining, TargetInstant, BINDING_ATTRIBUTE,
    DATE_TIME_FORMAT, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
};
