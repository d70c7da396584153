// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Load-time checks for task graph documents.
//!
//! Validation runs once, before a graph exists, so the runner's hot path never
//! re-checks a node. It has two tiers:
//!
//! 1. **Errors** ([`validate_document`]): duplicate task names, empty or
//!    out-of-canvas regions of interest, and thresholds outside `[0, 1]`.
//!    Every error is collected so a document author sees all of them at once.
//! 2. **Warnings** ([`find_graph_warnings`]): transition targets that name no
//!    task, and transition cycles. Both are legal. Targets are late-bound and
//!    resolve (or fail with `NodeNotFound`) when traversed, and a cycle is
//!    bounded at run time by the depth guard. The warnings exist so a typo in
//!    a `next` list shows up in the log before the run that hits it.
//!
//! # Cycle Detection
//!
//! Uses a depth-first search with a recursion stack ("three colours"). A back
//! edge to a node still on the stack closes a cycle; the path from that node
//! to the current one is the reported cycle. Both `next` and `onErrorNext`
//! edges count. Each back edge is reported once.

use std::collections::{HashMap, HashSet};

use crate::config::loader::TaskDocument;
use crate::errors::ValidationError;
use crate::graph::TaskGraph;
use crate::observability::messages::graph::{TransitionCycleDetected, UnresolvedTransition};
use crate::observability::messages::StructuredLog;
use crate::vision::Resolution;

/// Which transition list an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Next,
    OnErrorNext,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Next => "next",
            TransitionKind::OnErrorNext => "onErrorNext",
        }
    }
}

/// A legal but suspicious shape in a loaded graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphWarning {
    UnresolvedTransition {
        task: String,
        target: String,
        kind: TransitionKind,
    },
    TransitionCycle {
        cycle: Vec<String>,
    },
}

impl std::fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphWarning::UnresolvedTransition { task, target, kind } => write!(
                f,
                "task '{}' lists undefined task '{}' in {}",
                task,
                target,
                kind.as_str()
            ),
            GraphWarning::TransitionCycle { cycle } => {
                write!(f, "transition cycle {}", cycle.join(" -> "))
            }
        }
    }
}

impl GraphWarning {
    pub fn log(&self) {
        match self {
            GraphWarning::UnresolvedTransition { task, target, kind } => {
                UnresolvedTransition {
                    task,
                    target,
                    transition: kind.as_str(),
                }
                .log();
            }
            GraphWarning::TransitionCycle { cycle } => {
                let cycle: Vec<&str> = cycle.iter().map(String::as_str).collect();
                TransitionCycleDetected { cycle: &cycle }.log();
            }
        }
    }
}

/// Check a parsed document for structural errors.
///
/// # Returns
///
/// * `Ok(())` - every task is well-formed
/// * `Err(Vec<ValidationError>)` - every problem found, in document order
pub fn validate_document(
    document: &TaskDocument,
    reference: Resolution,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicates) = validate_unique_task_names(document) {
        errors.extend(duplicates);
    }

    if let Err(region_errors) = validate_regions(document, reference) {
        errors.extend(region_errors);
    }

    if let Err(threshold_errors) = validate_thresholds(document) {
        errors.extend(threshold_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every occurrence of a name after the first is an error.
fn validate_unique_task_names(document: &TaskDocument) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for (name, _) in &document.0 {
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateTaskName { task: name.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Regions must have positive size and lie within the reference canvas.
///
/// Tasks without a `roi` default to the whole canvas and always pass.
fn validate_regions(
    document: &TaskDocument,
    reference: Resolution,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, task) in &document.0 {
        let Some(roi) = task.roi else { continue };
        let [x, y, width, height] = roi;

        if width <= 0 || height <= 0 {
            errors.push(ValidationError::EmptyRegion {
                task: name.clone(),
                roi,
            });
        } else if x < 0
            || y < 0
            || width > reference.width as i64 - x
            || height > reference.height as i64 - y
        {
            errors.push(ValidationError::RegionOutOfBounds {
                task: name.clone(),
                roi,
                canvas_width: reference.width,
                canvas_height: reference.height,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_thresholds(document: &TaskDocument) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = document
        .0
        .iter()
        .filter(|(_, task)| {
            !task.templ_threshold.is_finite() || !(0.0..=1.0).contains(&task.templ_threshold)
        })
        .map(|(name, task)| ValidationError::ThresholdOutOfRange {
            task: name.clone(),
            threshold: task.templ_threshold,
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collect load-time warnings for a built graph, in document order.
pub fn find_graph_warnings(graph: &TaskGraph) -> Vec<GraphWarning> {
    let mut warnings = find_unresolved_transitions(graph);
    warnings.extend(
        find_transition_cycles(graph)
            .into_iter()
            .map(|cycle| GraphWarning::TransitionCycle { cycle }),
    );
    warnings
}

fn find_unresolved_transitions(graph: &TaskGraph) -> Vec<GraphWarning> {
    let mut warnings = Vec::new();

    for node in graph.nodes() {
        let edges = node
            .on_success
            .iter()
            .map(|t| (t, TransitionKind::Next))
            .chain(node.on_failure.iter().map(|t| (t, TransitionKind::OnErrorNext)));

        for (target, kind) in edges {
            if !graph.contains(target) {
                warnings.push(GraphWarning::UnresolvedTransition {
                    task: node.name.clone(),
                    target: target.clone(),
                    kind,
                });
            }
        }
    }

    warnings
}

fn find_transition_cycles(graph: &TaskGraph) -> Vec<Vec<String>> {
    let adjacency: HashMap<&str, Vec<&str>> = graph
        .nodes()
        .map(|node| {
            let targets = node
                .on_success
                .iter()
                .chain(node.on_failure.iter())
                .map(String::as_str)
                .filter(|target| graph.contains(target))
                .collect();
            (node.name.as_str(), targets)
        })
        .collect();

    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for node in graph.nodes() {
        if !visited.contains(node.name.as_str()) {
            dfs_cycles(
                &node.name,
                &adjacency,
                &mut visited,
                &mut on_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs_cycles<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                dfs_cycles(neighbor, adjacency, visited, on_stack, path, cycles);
            } else if on_stack.contains(neighbor) {
                if let Some(start) = path.iter().position(|&n| n == neighbor) {
                    let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(neighbor.to_string());
                    cycles.push(cycle);
                }
            }
        }
    }

    on_stack.remove(node);
    path.pop();
}
