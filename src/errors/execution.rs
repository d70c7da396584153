// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-node failure outcomes produced by the pipeline runner.
//!
//! None of these abort a run. Each one collapses to "this node failed" at the
//! node that experienced it, and the caller handles it through its own
//! `onErrorNext` chain exactly like a recognition miss.

use thiserror::Error;

/// Why a single task node reported failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// A transition named a task that is not in the graph.
    #[error("task is not defined in the graph")]
    NodeNotFound,

    /// The controller could not produce a frame.
    #[error("screen capture failed: {0}")]
    CaptureFailure(String),

    /// The recursion budget ran out before this node was entered.
    #[error("maximum task chain depth exceeded")]
    DepthExceeded,

    /// The node already fired its action `max_executions` times this session.
    #[error("task already executed {max_executions} time(s)")]
    Exhausted { max_executions: u32 },

    /// Recognition missed and no recovery target succeeded.
    #[error("target not recognized and no recovery task succeeded")]
    NoMatch,

    /// The action executor reported an error after a successful match.
    #[error("action failed: {0}")]
    ActionFailed(String),

    /// A collaborator panicked while the run was in progress.
    #[error("run aborted by panic: {0}")]
    Panicked(String),
}

/// The terminal node of a failed branch together with its reason.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("task '{node}' failed: {reason}")]
pub struct NodeFailure {
    pub node: String,
    pub reason: FailureReason,
}

impl NodeFailure {
    pub fn new(node: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            node: node.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_failure_names_task_and_reason() {
        let failure = NodeFailure::new("Start", FailureReason::Exhausted { max_executions: 1 });
        assert_eq!(
            failure.to_string(),
            "task 'Start' failed: task already executed 1 time(s)"
        );
    }
}
