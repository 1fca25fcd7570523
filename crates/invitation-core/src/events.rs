use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::{CountdownState, Field, Remaining};

/// Observable state changes, serialized for the CLI and for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Full view of the countdown at one instant.
    CountdownSnapshot {
        state: CountdownState,
        target: DateTime<Local>,
        /// Negative once the target has passed.
        remaining_ms: i64,
        /// `None` while ended.
        remaining: Option<Remaining>,
        /// Text currently shown by each bound field.
        display: BTreeMap<Field, String>,
        at: DateTime<Utc>,
    },
    /// The countdown reached its target and switched to the placeholder.
    CountdownEnded {
        target: DateTime<Local>,
        at: DateTime<Utc>,
    },
    /// A reveal target became visible.
    ElementRevealed { index: usize },
}
