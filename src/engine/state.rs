// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::graph::TaskNode;
use crate::traits::Match;
use crate::vision::Resolution;

/// Mutable per-session bookkeeping, owned by exactly one runner.
///
/// Execution counts and cached matches are session-global: every branch of
/// every run within the session sees the same values.
#[derive(Debug, Clone)]
pub struct ExecutionState {
    execution_counts: HashMap<String, u32>,
    cached_matches: HashMap<String, Match>,
    reference_resolution: Resolution,
    runtime_resolution: Option<Resolution>,
}

impl ExecutionState {
    pub fn new(reference_resolution: Resolution) -> Self {
        Self {
            execution_counts: HashMap::new(),
            cached_matches: HashMap::new(),
            reference_resolution,
            runtime_resolution: None,
        }
    }

    /// Completed actions for `task` in this session.
    pub fn execution_count(&self, task: &str) -> u32 {
        self.execution_counts.get(task).copied().unwrap_or(0)
    }

    pub fn is_exhausted(&self, node: &TaskNode) -> bool {
        self.execution_count(&node.name) >= node.max_executions
    }

    pub fn cached_match(&self, task: &str) -> Option<Match> {
        self.cached_matches.get(task).copied()
    }

    /// Count a completed action and, for cacheable tasks, memoize where it happened.
    pub fn record_execution(&mut self, node: &TaskNode, matched: Match) {
        *self.execution_counts.entry(node.name.clone()).or_insert(0) += 1;
        if node.cacheable {
            self.cached_matches.entry(node.name.clone()).or_insert(matched);
        }
    }

    pub fn reference_resolution(&self) -> Resolution {
        self.reference_resolution
    }

    /// Resolution of the most recently captured frame, if any.
    pub fn runtime_resolution(&self) -> Option<Resolution> {
        self.runtime_resolution
    }

    /// Remember the latest frame size. Returns `true` when it changed.
    pub fn observe_frame(&mut self, resolution: Resolution) -> bool {
        let changed = self.runtime_resolution != Some(resolution);
        self.runtime_resolution = Some(resolution);
        changed
    }

    /// Per-axis `runtime / reference` factors applied to regions of interest.
    pub fn scale_factors(&self) -> Option<(f64, f64)> {
        self.runtime_resolution
            .map(|runtime| self.reference_resolution.scale_factors(runtime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TaskGraph;
    use crate::vision::Point;

    const REFERENCE: Resolution = Resolution::new(1280, 720);

    fn hit(x: u32, y: u32) -> Match {
        Match {
            location: Point::new(x, y),
            confidence: 0.9,
        }
    }

    #[test]
    fn counts_and_exhaustion() {
        let graph = TaskGraph::from_json_str(r#"{ "Tap": { "maxTimes": 2 } }"#, REFERENCE).unwrap();
        let node = graph.lookup("Tap").unwrap();
        let mut state = ExecutionState::new(REFERENCE);

        assert!(!state.is_exhausted(node));
        state.record_execution(node, hit(1, 1));
        state.record_execution(node, hit(1, 1));
        assert_eq!(state.execution_count("Tap"), 2);
        assert!(state.is_exhausted(node));
    }

    #[test]
    fn only_cacheable_tasks_keep_their_first_match() {
        let graph = TaskGraph::from_json_str(
            r#"{ "Cached": { "cache": true }, "Fresh": {} }"#,
            REFERENCE,
        )
        .unwrap();
        let mut state = ExecutionState::new(REFERENCE);

        state.record_execution(graph.lookup("Cached").unwrap(), hit(10, 20));
        state.record_execution(graph.lookup("Cached").unwrap(), hit(30, 40));
        state.record_execution(graph.lookup("Fresh").unwrap(), hit(50, 60));

        assert_eq!(state.cached_match("Cached"), Some(hit(10, 20)));
        assert_eq!(state.cached_match("Fresh"), None);
    }

    #[test]
    fn scale_factors_follow_observed_frames() {
        let mut state = ExecutionState::new(REFERENCE);
        assert_eq!(state.scale_factors(), None);

        assert!(state.observe_frame(Resolution::new(1920, 1080)));
        assert!(!state.observe_frame(Resolution::new(1920, 1080)));
        assert_eq!(state.scale_factors(), Some((1.5, 1.5)));
    }
}
