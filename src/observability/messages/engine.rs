// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the pipeline runner.
//!
//! This module contains message types for logging events related to:
//! * Run lifecycle (start, finish, panics)
//! * Per-task guards (depth, exhaustion, unknown tasks)
//! * Recognition outcomes, cache reuse and idle-wait polling
//! * Actions and transitions between tasks

use crate::errors::NodeFailure;
use crate::observability::messages::StructuredLog;
use crate::vision::{Point, Resolution};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A run was started at a task.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sightline::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     start_task: "StartButton",
///     max_depth: 50,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub start_task: &'a str,
    pub max_depth: u32,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run at task '{}' (max depth {})",
            self.start_task, self.max_depth
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            start_task = self.start_task,
            max_depth = self.max_depth,
            "{}", self
        );
    }
}

/// A run reached a terminal outcome.
///
/// # Log Level
/// `info!` on success, `warn!` on failure with the terminal task and reason
pub struct RunFinished<'a> {
    pub start_task: &'a str,
    pub failure: Option<&'a NodeFailure>,
    pub duration: Duration,
}

impl Display for RunFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.failure {
            None => write!(
                f,
                "Run from '{}' succeeded in {:?}",
                self.start_task, self.duration
            ),
            Some(failure) => write!(
                f,
                "Run from '{}' failed in {:?}: {}",
                self.start_task, self.duration, failure
            ),
        }
    }
}

impl StructuredLog for RunFinished<'_> {
    fn log(&self) {
        match self.failure {
            None => tracing::info!(
                start_task = self.start_task,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            ),
            Some(failure) => tracing::warn!(
                start_task = self.start_task,
                terminal_task = %failure.node,
                reason = %failure.reason,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            ),
        }
    }
}

/// A collaborator panicked; the run collapses to a failure.
///
/// # Log Level
/// `error!`
pub struct RunPanicked<'a> {
    pub task: &'a str,
    pub message: &'a str,
}

impl Display for RunPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' panicked: {}", self.task, self.message)
    }
}

impl StructuredLog for RunPanicked<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, panic = self.message, "{}", self);
    }
}

/// Entry into a task. [`TaskEntered::span`] scopes the task's work.
///
/// # Log Level
/// `debug!`
pub struct TaskEntered<'a> {
    pub task: &'a str,
    pub remaining_depth: u32,
}

impl Display for TaskEntered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Entering task '{}' (remaining depth {})",
            self.task, self.remaining_depth
        )
    }
}

impl StructuredLog for TaskEntered<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            remaining_depth = self.remaining_depth,
            "{}", self
        );
    }
}

impl TaskEntered<'_> {
    pub fn span(&self) -> Span {
        tracing::debug_span!(
            "task",
            task = self.task,
            remaining_depth = self.remaining_depth,
        )
    }
}

pub struct DepthLimitReached<'a> {
    pub task: &'a str,
}

impl Display for DepthLimitReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Depth limit reached before entering task '{}'", self.task)
    }
}

impl StructuredLog for DepthLimitReached<'_> {
    fn log(&self) {
        tracing::warn!(task = self.task, "{}", self);
    }
}

/// A transition named a task the graph does not define.
///
/// # Log Level
/// `warn!` - The branch fails with `NodeNotFound`
pub struct TaskNotFound<'a> {
    pub task: &'a str,
}

impl Display for TaskNotFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' is not defined in the graph", self.task)
    }
}

impl StructuredLog for TaskNotFound<'_> {
    fn log(&self) {
        tracing::warn!(task = self.task, "{}", self);
    }
}

pub struct TaskExhausted<'a> {
    pub task: &'a str,
    pub max_executions: u32,
}

impl Display for TaskExhausted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' already executed {} time(s); skipping",
            self.task, self.max_executions
        )
    }
}

impl StructuredLog for TaskExhausted<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            max_executions = self.max_executions,
            "{}", self
        );
    }
}

/// The controller could not produce a frame.
///
/// # Log Level
/// `error!` - The task fails without trying its recovery chain
pub struct CaptureFailed<'a> {
    pub task: &'a str,
    pub error: &'a dyn Error,
}

impl Display for CaptureFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Screen capture for task '{}' failed: {}", self.task, self.error)
    }
}

impl StructuredLog for CaptureFailed<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, error = %self.error, "{}", self);
    }
}

/// Captured frames changed size; regions are rescaled from the reference.
///
/// # Log Level
/// `info!`
pub struct FrameResolutionChanged {
    pub reference: Resolution,
    pub runtime: Resolution,
}

impl Display for FrameResolutionChanged {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frame resolution is {}; scaling regions from reference {}",
            self.runtime, self.reference
        )
    }
}

impl StructuredLog for FrameResolutionChanged {
    fn log(&self) {
        tracing::info!(
            reference = %self.reference,
            runtime = %self.runtime,
            "{}", self
        );
    }
}

pub struct RecognitionHit<'a> {
    pub task: &'a str,
    pub location: Point,
    pub confidence: f32,
}

impl Display for RecognitionHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recognized task '{}' at {} (confidence {:.3})",
            self.task, self.location, self.confidence
        )
    }
}

impl StructuredLog for RecognitionHit<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            x = self.location.x,
            y = self.location.y,
            confidence = self.confidence,
            "{}", self
        );
    }
}

pub struct RecognitionMissed<'a> {
    pub task: &'a str,
}

impl Display for RecognitionMissed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' not recognized", self.task)
    }
}

impl StructuredLog for RecognitionMissed<'_> {
    fn log(&self) {
        tracing::debug!(task = self.task, "{}", self);
    }
}

/// Recognition could not be attempted, for example a missing template.
///
/// # Log Level
/// `warn!` - Treated as a miss
pub struct RecognitionFailed<'a> {
    pub task: &'a str,
    pub error: &'a dyn Error,
}

impl Display for RecognitionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Recognition for task '{}' failed: {}", self.task, self.error)
    }
}

impl StructuredLog for RecognitionFailed<'_> {
    fn log(&self) {
        tracing::warn!(task = self.task, error = %self.error, "{}", self);
    }
}

pub struct CachedMatchReused<'a> {
    pub task: &'a str,
    pub location: Point,
}

impl Display for CachedMatchReused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reusing cached location {} for task '{}'",
            self.location, self.task
        )
    }
}

impl StructuredLog for CachedMatchReused<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            x = self.location.x,
            y = self.location.y,
            "{}", self
        );
    }
}

/// An idle-wait task missed and will look again after `interval`.
///
/// # Log Level
/// `trace!` - Emitted once per poll
pub struct IdleWaitPolling<'a> {
    pub task: &'a str,
    pub polls: u32,
    pub interval: Duration,
}

impl Display for IdleWaitPolling<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Waiting for task '{}' to appear (poll {}, next in {:?})",
            self.task, self.polls, self.interval
        )
    }
}

impl StructuredLog for IdleWaitPolling<'_> {
    fn log(&self) {
        tracing::trace!(
            task = self.task,
            polls = self.polls,
            interval_ms = self.interval.as_millis() as u64,
            "{}", self
        );
    }
}

pub struct IdlePollLimitReached<'a> {
    pub task: &'a str,
    pub polls: u32,
}

impl Display for IdlePollLimitReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' still not visible after {} polls; taking error path",
            self.task, self.polls
        )
    }
}

impl StructuredLog for IdlePollLimitReached<'_> {
    fn log(&self) {
        tracing::warn!(task = self.task, polls = self.polls, "{}", self);
    }
}

/// A tap was injected at a recognized location.
///
/// # Log Level
/// `info!` - Every side effect on the controlled surface is visible
pub struct TapPerformed {
    pub location: Point,
    pub confidence: f32,
}

impl Display for TapPerformed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Tapped at {} (confidence {:.3})",
            self.location, self.confidence
        )
    }
}

impl StructuredLog for TapPerformed {
    fn log(&self) {
        tracing::info!(
            x = self.location.x,
            y = self.location.y,
            confidence = self.confidence,
            "{}", self
        );
    }
}

/// A dry-run injector received a tap instead of a device.
///
/// # Log Level
/// `info!`
pub struct TapRecorded {
    pub x: u32,
    pub y: u32,
}

impl Display for TapRecorded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dry run: tap at ({}, {}) not injected", self.x, self.y)
    }
}

impl StructuredLog for TapRecorded {
    fn log(&self) {
        tracing::info!(x = self.x, y = self.y, "{}", self);
    }
}

pub struct TaskCompleted<'a> {
    pub task: &'a str,
    pub action: &'a str,
    pub executions: u32,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' completed action {} (execution {})",
            self.task, self.action, self.executions
        )
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            action = self.action,
            executions = self.executions,
            "{}", self
        );
    }
}

/// The executor rejected an action after a successful match.
///
/// # Log Level
/// `error!` - The task fails without trying its recovery chain
pub struct ActionFailed<'a> {
    pub task: &'a str,
    pub action: &'a str,
    pub error: &'a dyn Error,
}

impl Display for ActionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Action {} for task '{}' failed: {}",
            self.action, self.task, self.error
        )
    }
}

impl StructuredLog for ActionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            task = self.task,
            action = self.action,
            error = %self.error,
            "{}", self
        );
    }
}

/// About to follow an edge of the graph.
///
/// # Log Level
/// `debug!`
pub struct TransitionAttempted<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub transition: &'a str,
}

impl Display for TransitionAttempted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} '{}' -> '{}'", self.transition, self.from, self.to)
    }
}

impl StructuredLog for TransitionAttempted<'_> {
    fn log(&self) {
        tracing::debug!(
            from = self.from,
            to = self.to,
            transition = self.transition,
            "{}", self
        );
    }
}

pub struct TransitionFailed<'a> {
    pub from: &'a str,
    pub transition: &'a str,
    pub failure: &'a NodeFailure,
}

impl Display for TransitionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} target of '{}' did not succeed: {}",
            self.transition, self.from, self.failure
        )
    }
}

impl StructuredLog for TransitionFailed<'_> {
    fn log(&self) {
        tracing::debug!(
            from = self.from,
            transition = self.transition,
            terminal_task = %self.failure.node,
            reason = %self.failure.reason,
            "{}", self
        );
    }
}

/// A recovery target succeeded, so the task that missed reports success.
///
/// # Log Level
/// `info!`
pub struct RecoverySucceeded<'a> {
    pub task: &'a str,
    pub via: &'a str,
}

impl Display for RecoverySucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' recovered via '{}'", self.task, self.via)
    }
}

impl StructuredLog for RecoverySucceeded<'_> {
    fn log(&self) {
        tracing::info!(task = self.task, via = self.via, "{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureReason;

    #[test]
    fn run_finished_names_terminal_task_on_failure() {
        let failure = NodeFailure::new("Lobby", FailureReason::NoMatch);
        let msg = RunFinished {
            start_task: "Start",
            failure: Some(&failure),
            duration: Duration::from_millis(5),
        };
        let text = msg.to_string();
        assert!(text.starts_with("Run from 'Start' failed in 5ms"));
        assert!(text.contains("task 'Lobby' failed"));
    }

    #[test]
    fn transition_display() {
        let msg = TransitionAttempted {
            from: "Start",
            to: "Lobby",
            transition: "next",
        };
        assert_eq!(msg.to_string(), "next 'Start' -> 'Lobby'");
    }

    #[test]
    fn task_entered_span_scopes_the_task() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = TaskEntered {
                task: "Lobby",
                remaining_depth: 7,
            }
            .span();
            let metadata = span.metadata().unwrap();
            assert_eq!(metadata.name(), "task");
            assert!(metadata.fields().field("task").is_some());
            assert!(metadata.fields().field("remaining_depth").is_some());
        });
    }
}
