// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::vision::Region;

/// Matching strategy used to recognize a task's target.
///
/// The runner never inspects this; it is dispatched by the recognizer, so a
/// new strategy is a new variant plus one match arm there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecognitionAlgorithm {
    /// Normalized correlation of a reference image against the region of interest.
    #[default]
    #[serde(rename = "MatchTemplate", alias = "templateMatch")]
    MatchTemplate,
}

impl RecognitionAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognitionAlgorithm::MatchTemplate => "MatchTemplate",
        }
    }
}

impl fmt::Display for RecognitionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side effect performed once a task's target is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionKind {
    /// Pure wait/check. A miss on such a task polls the same task again.
    #[default]
    #[serde(rename = "DoNothing", alias = "none")]
    DoNothing,
    /// Tap at the centre of the recognized location.
    #[serde(rename = "ClickSelf", alias = "tapAtMatch")]
    ClickSelf,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::DoNothing => "DoNothing",
            ActionKind::ClickSelf => "ClickSelf",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vertex of the automation graph.
///
/// Built by the loader after validation, so `roi` is non-empty and inside the
/// reference canvas and `threshold` is in `[0, 1]`. Transition targets are
/// *not* checked; they resolve when traversed.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub name: String,
    pub algorithm: RecognitionAlgorithm,
    pub action: ActionKind,
    pub template: String,
    pub roi: Region,
    pub threshold: f32,
    /// Tried in order after the action completes; the first success stops the walk.
    pub on_success: Vec<String>,
    /// Tried in order when recognition misses; the first success recovers this task.
    pub on_failure: Vec<String>,
    pub max_executions: u32,
    pub pre_delay: Duration,
    pub post_delay: Duration,
    pub cacheable: bool,
}

impl TaskNode {
    pub fn is_idle_wait(&self) -> bool {
        self.action == ActionKind::DoNothing
    }
}
