// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;

use crate::config::{self, GraphWarning, TaskDocument};
use crate::errors::GraphError;
use crate::vision::Resolution;

use super::node::TaskNode;

/// All task nodes of one automation graph, keyed by name.
///
/// Constructed once from a document and read-only afterwards; wrap it in an
/// `Arc` to share it between runners driving different surfaces.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: HashMap<String, TaskNode>,
    order: Vec<String>,
    reference: Resolution,
    warnings: Vec<GraphWarning>,
}

impl TaskGraph {
    /// Build a graph from already-validated nodes.
    ///
    /// Callers normally go through [`TaskGraph::load`] or one of the `from_*`
    /// constructors, which validate first.
    pub(crate) fn from_nodes(nodes: Vec<TaskNode>, reference: Resolution) -> Self {
        let order = nodes.iter().map(|n| n.name.clone()).collect();
        let nodes = nodes.into_iter().map(|n| (n.name.clone(), n)).collect();
        Self {
            nodes,
            order,
            reference,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<GraphWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Load a graph document from disk; the format follows the file extension.
    pub fn load<P: AsRef<Path>>(path: P, reference: Resolution) -> Result<Self, GraphError> {
        config::load_graph(path, reference)
    }

    pub fn from_json_str(document: &str, reference: Resolution) -> Result<Self, GraphError> {
        let document: TaskDocument = serde_json::from_str(document)?;
        config::build_graph(document, reference)
    }

    pub fn from_yaml_str(document: &str, reference: Resolution) -> Result<Self, GraphError> {
        let document: TaskDocument = serde_yaml::from_str(document)?;
        config::build_graph(document, reference)
    }

    pub fn lookup(&self, name: &str) -> Option<&TaskNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &TaskNode> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The resolution every region in this graph was authored against.
    pub fn reference_resolution(&self) -> Resolution {
        self.reference
    }

    /// Unresolved targets and transition cycles found when the graph was built.
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }
}
