// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The pipeline runner: a recursive walk over the task graph.
//!
//! Each visit to a task is `(task, remaining_depth)` and ends in exactly one
//! [`RunOutcome`]:
//!
//! 1. A depth of zero fails with `DepthExceeded`; an unknown task fails with
//!    `NodeNotFound`; a task that already fired `max_executions` actions fails
//!    with `Exhausted`. None of these touch a collaborator.
//! 2. Sleep `pre_delay`, capture a frame, then recognize (or reuse the cached
//!    location of a cacheable task).
//! 3. On a match the action fires, the execution is counted, `post_delay`
//!    elapses and `on_success` targets are tried in order until one succeeds.
//!    The task itself succeeds whatever its continuations do.
//! 4. On a miss an idle-wait task (`DoNothing`) polls again after the idle
//!    interval. Any other task tries `on_failure` targets in order and
//!    succeeds as soon as one of them does.
//!
//! Branches run strictly one after another. Counts and cached locations live
//! in one [`ExecutionState`] shared by every branch of every run on the same
//! runner.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::Instrument;

use crate::config::{EngineSettings, TransitionKind};
use crate::engine::outcome::RunOutcome;
use crate::engine::state::ExecutionState;
use crate::errors::{FailureReason, RecognitionError};
use crate::graph::{TaskGraph, TaskNode};
use crate::observability::messages::engine::{
    ActionFailed, CachedMatchReused, CaptureFailed, DepthLimitReached, FrameResolutionChanged,
    IdlePollLimitReached, IdleWaitPolling, RecognitionFailed, RecognitionHit, RecognitionMissed,
    RecoverySucceeded, RunFinished, RunPanicked, RunStarted, TaskCompleted, TaskEntered,
    TaskExhausted, TaskNotFound, TransitionAttempted, TransitionFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ActionExecutor, Controller, Match, RecognitionRequest, Recognizer};
use crate::vision::Frame;

/// Executes task graphs against one controlled surface.
///
/// A runner is one session: execution counts and cached locations persist
/// across calls to [`run`](Self::run) until [`reset_session`](Self::reset_session).
/// `run` takes `&mut self`, so one session can never serve two runs at once.
pub struct PipelineRunner {
    graph: Arc<TaskGraph>,
    controller: Arc<dyn Controller>,
    recognizer: Arc<dyn Recognizer>,
    executor: Arc<dyn ActionExecutor>,
    settings: EngineSettings,
    state: ExecutionState,
    /// Tasks currently being visited, innermost last.
    trail: Vec<String>,
}

impl PipelineRunner {
    pub fn new(
        graph: Arc<TaskGraph>,
        controller: Arc<dyn Controller>,
        recognizer: Arc<dyn Recognizer>,
        executor: Arc<dyn ActionExecutor>,
        settings: EngineSettings,
    ) -> Self {
        let state = ExecutionState::new(graph.reference_resolution());
        Self {
            graph,
            controller,
            recognizer,
            executor,
            settings,
            state,
            trail: Vec::new(),
        }
    }

    /// Run the graph starting at `start` with the configured depth budget.
    ///
    /// Never panics and never returns an error: every problem, including a
    /// panicking collaborator, becomes a [`RunOutcome::Failure`] naming the
    /// task where the failing branch ended.
    pub async fn run(&mut self, start: &str) -> RunOutcome {
        let max_depth = self.settings.max_depth;
        let started = Instant::now();
        RunStarted {
            start_task: start,
            max_depth,
        }
        .log();

        self.trail.clear();
        let outcome = match AssertUnwindSafe(self.run_node(start, max_depth))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let task = self.trail.last().map(String::as_str).unwrap_or(start);
                RunPanicked {
                    task,
                    message: &message,
                }
                .log();
                RunOutcome::failed(task, FailureReason::Panicked(message))
            }
        };
        self.trail.clear();

        RunFinished {
            start_task: start,
            failure: outcome.failure(),
            duration: started.elapsed(),
        }
        .log();
        outcome
    }

    /// Forget every execution count and cached location.
    pub fn reset_session(&mut self) {
        self.state = ExecutionState::new(self.graph.reference_resolution());
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    fn run_node<'a>(&'a mut self, name: &'a str, remaining_depth: u32) -> BoxFuture<'a, RunOutcome> {
        let span = TaskEntered {
            task: name,
            remaining_depth,
        }
        .span();
        Box::pin(self.visit(name, remaining_depth).instrument(span))
    }

    async fn visit(&mut self, name: &str, remaining_depth: u32) -> RunOutcome {
        if remaining_depth == 0 {
            DepthLimitReached { task: name }.log();
            return RunOutcome::failed(name, FailureReason::DepthExceeded);
        }

        let graph = Arc::clone(&self.graph);
        let Some(node) = graph.lookup(name) else {
            TaskNotFound { task: name }.log();
            return RunOutcome::failed(name, FailureReason::NodeNotFound);
        };

        if self.state.is_exhausted(node) {
            TaskExhausted {
                task: name,
                max_executions: node.max_executions,
            }
            .log();
            return RunOutcome::failed(
                name,
                FailureReason::Exhausted {
                    max_executions: node.max_executions,
                },
            );
        }

        TaskEntered {
            task: name,
            remaining_depth,
        }
        .log();

        self.trail.push(node.name.clone());
        let outcome = self.attempt(node, remaining_depth).await;
        self.trail.pop();
        outcome
    }

    async fn attempt(&mut self, node: &TaskNode, remaining_depth: u32) -> RunOutcome {
        let found = match self.locate(node).await {
            Ok(found) => found,
            Err(reason) => return RunOutcome::failed(&node.name, reason),
        };

        let Some(found) = found else {
            return self.recover(node, remaining_depth).await;
        };

        if let Err(error) = self.executor.execute(node.action, Some(&found)).await {
            ActionFailed {
                task: &node.name,
                action: node.action.as_str(),
                error: &error,
            }
            .log();
            return RunOutcome::failed(&node.name, FailureReason::ActionFailed(error.to_string()));
        }

        self.state.record_execution(node, found);
        TaskCompleted {
            task: &node.name,
            action: node.action.as_str(),
            executions: self.state.execution_count(&node.name),
        }
        .log();
        sleep_for(node.post_delay).await;

        self.advance(node, remaining_depth).await;
        RunOutcome::Success
    }

    /// Capture and recognize until the task is found or definitely missed.
    ///
    /// `Ok(None)` is a miss that should take the error path. Idle-wait tasks
    /// loop here instead of recursing, so polling never spends depth.
    async fn locate(&mut self, node: &TaskNode) -> Result<Option<Match>, FailureReason> {
        let mut polls: u32 = 0;
        loop {
            sleep_for(node.pre_delay).await;

            let frame = match self.controller.screenshot().await {
                Ok(frame) => frame,
                Err(error) => {
                    CaptureFailed {
                        task: &node.name,
                        error: &error,
                    }
                    .log();
                    return Err(FailureReason::CaptureFailure(error.to_string()));
                }
            };

            let runtime = frame.resolution();
            if self.state.observe_frame(runtime) {
                FrameResolutionChanged {
                    reference: self.state.reference_resolution(),
                    runtime,
                }
                .log();
            }

            if node.cacheable {
                if let Some(cached) = self.state.cached_match(&node.name) {
                    CachedMatchReused {
                        task: &node.name,
                        location: cached.location,
                    }
                    .log();
                    return Ok(Some(cached));
                }
            }

            match self.recognize(frame, node).await {
                Ok(Some(found)) => {
                    RecognitionHit {
                        task: &node.name,
                        location: found.location,
                        confidence: found.confidence,
                    }
                    .log();
                    return Ok(Some(found));
                }
                Ok(None) => RecognitionMissed { task: &node.name }.log(),
                Err(error) => RecognitionFailed {
                    task: &node.name,
                    error: &error,
                }
                .log(),
            }

            if !node.is_idle_wait() || self.state.is_exhausted(node) {
                return Ok(None);
            }

            polls += 1;
            if !self.settings.allows_idle_poll(polls) {
                IdlePollLimitReached {
                    task: &node.name,
                    polls,
                }
                .log();
                return Ok(None);
            }

            let interval = self.settings.idle_poll_interval();
            IdleWaitPolling {
                task: &node.name,
                polls,
                interval,
            }
            .log();
            sleep_for(interval).await;
        }
    }

    /// Matching is CPU-bound, so it runs on the blocking pool. A panic inside
    /// the recognizer is resumed here so `run` still attributes it to `node`.
    async fn recognize(
        &self,
        frame: Frame,
        node: &TaskNode,
    ) -> Result<Option<Match>, RecognitionError> {
        let recognizer = Arc::clone(&self.recognizer);
        let node = node.clone();
        let reference = self.state.reference_resolution();

        let joined = tokio::task::spawn_blocking(move || {
            recognizer.recognize(&frame, &RecognitionRequest::for_node(&node, reference))
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => Err(RecognitionError::Cancelled(error)),
        }
    }

    /// Try `on_success` targets in order, stopping at the first success.
    async fn advance(&mut self, node: &TaskNode, remaining_depth: u32) {
        for target in &node.on_success {
            if self
                .follow(node, target, TransitionKind::Next, remaining_depth)
                .await
                .is_success()
            {
                return;
            }
        }
    }

    /// Try `on_failure` targets in order; the first success recovers `node`.
    async fn recover(&mut self, node: &TaskNode, remaining_depth: u32) -> RunOutcome {
        for target in &node.on_failure {
            if self
                .follow(node, target, TransitionKind::OnErrorNext, remaining_depth)
                .await
                .is_success()
            {
                RecoverySucceeded {
                    task: &node.name,
                    via: target,
                }
                .log();
                return RunOutcome::Success;
            }
        }
        RunOutcome::failed(&node.name, FailureReason::NoMatch)
    }

    async fn follow(
        &mut self,
        node: &TaskNode,
        target: &str,
        kind: TransitionKind,
        remaining_depth: u32,
    ) -> RunOutcome {
        TransitionAttempted {
            from: &node.name,
            to: target,
            transition: kind.as_str(),
        }
        .log();

        let outcome = self.run_node(target, remaining_depth - 1).await;
        if let RunOutcome::Failure(failure) = &outcome {
            TransitionFailed {
                from: &node.name,
                transition: kind.as_str(),
                failure,
            }
            .log();
        }
        outcome
    }
}

async fn sleep_for(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
