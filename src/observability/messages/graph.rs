// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph loading and validation.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use crate::vision::Resolution;
use std::fmt::{Display, Formatter};

/// A graph document was parsed and validated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sightline::observability::messages::graph::GraphLoaded;
/// use sightline::vision::Resolution;
///
/// let msg = GraphLoaded {
///     task_count: 12,
///     reference: Resolution::new(1280, 720),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct GraphLoaded {
    pub task_count: usize,
    pub reference: Resolution,
}

impl Display for GraphLoaded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded task graph with {} tasks (reference resolution {})",
            self.task_count, self.reference
        )
    }
}

impl StructuredLog for GraphLoaded {
    fn log(&self) {
        tracing::info!(
            task_count = self.task_count,
            reference = %self.reference,
            "{}", self
        );
    }
}

/// A task definition failed validation.
///
/// # Log Level
/// `error!` - The graph is rejected
pub struct InvalidTaskDefinition<'a> {
    pub error: &'a ValidationError,
}

impl Display for InvalidTaskDefinition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid task definition: {}", self.error)
    }
}

impl StructuredLog for InvalidTaskDefinition<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}

/// A transition names a task that the graph does not define.
///
/// # Log Level
/// `warn!` - Traversing the edge will fail with `NodeNotFound`
///
/// # Example
/// ```
/// use sightline::observability::messages::graph::UnresolvedTransition;
///
/// let msg = UnresolvedTransition {
///     task: "StartButton",
///     target: "Lobby",
///     transition: "next",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct UnresolvedTransition<'a> {
    pub task: &'a str,
    pub target: &'a str,
    pub transition: &'a str,
}

impl Display for UnresolvedTransition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' lists undefined task '{}' in {}",
            self.task, self.target, self.transition
        )
    }
}

impl StructuredLog for UnresolvedTransition<'_> {
    fn log(&self) {
        tracing::warn!(
            task = self.task,
            target = self.target,
            transition = self.transition,
            "{}", self
        );
    }
}

/// Transitions form a cycle. Allowed; the depth limit bounds traversal.
///
/// # Log Level
/// `warn!`
pub struct TransitionCycleDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for TransitionCycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transition cycle detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for TransitionCycleDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }
}
