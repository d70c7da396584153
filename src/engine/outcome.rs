// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::errors::{FailureReason, NodeFailure};

/// Result of running one task node, or of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success,
    /// Carries the node at which the failing branch terminated and why.
    Failure(NodeFailure),
}

impl RunOutcome {
    pub(crate) fn failed(node: &str, reason: FailureReason) -> Self {
        RunOutcome::Failure(NodeFailure::new(node, reason))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }

    pub fn failure(&self) -> Option<&NodeFailure> {
        match self {
            RunOutcome::Success => None,
            RunOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        self.failure().map(|f| &f.reason)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => f.write_str("success"),
            RunOutcome::Failure(failure) => write!(f, "failure ({})", failure),
        }
    }
}
