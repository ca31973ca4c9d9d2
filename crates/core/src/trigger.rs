//! Trigger events as data, for scripted sessions and replay files.
//!
//! JSON shape: `{"at_ms": 120, "kind": "ripple", "origin": {"x": 0, "y": 0}}`,
//! `{"at_ms": 0, "kind": "twinkle", "count": 3}`, `{"at_ms": 50, "kind": "transition"}`.

use crate::field::Point;
use crate::ripple::DEFAULT_TWINKLE_COUNT;
use serde::{Deserialize, Serialize};

/// A fire-and-forget input from a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Start a ripple; `None` means the surface center.
    Ripple {
        #[serde(default)]
        origin: Option<Point>,
    },
    /// Highlight a random burst. Signed so that scripts can carry negative
    /// counts, which clamp to zero.
    Twinkle {
        #[serde(default = "default_twinkle_count")]
        count: i64,
    },
    /// Start the transition wobble.
    Transition,
}

impl Trigger {
    /// Clamps a signed count to a usable burst size.
    pub fn clamp_count(count: i64) -> usize {
        usize::try_from(count.max(0)).unwrap_or(usize::MAX)
    }
}

fn default_twinkle_count() -> i64 {
    DEFAULT_TWINKLE_COUNT as i64
}

/// A trigger with the session time at which it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTrigger {
    pub at_ms: f64,
    #[serde(flatten)]
    pub trigger: Trigger,
}

impl ScheduledTrigger {
    pub fn new(at_ms: f64, trigger: Trigger) -> Self {
        Self { at_ms, trigger }
    }
}
