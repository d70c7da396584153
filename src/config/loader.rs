// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_EXECUTIONS, DEFAULT_TEMPLATE_EXTENSION,
};
use crate::config::validation::{find_graph_warnings, validate_document};
use crate::errors::GraphError;
use crate::graph::{ActionKind, RecognitionAlgorithm, TaskGraph, TaskNode};
use crate::observability::messages::graph::{GraphLoaded, InvalidTaskDefinition};
use crate::observability::messages::StructuredLog;
use crate::vision::{Region, Resolution};

/// One task as written in a graph document.
///
/// Every field is optional; defaults follow the document format:
///
/// ```json
/// {
///   "StartButton": {
///     "algorithm": "MatchTemplate",
///     "action": "ClickSelf",
///     "template": "start_button.png",
///     "roi": [540, 560, 200, 100],
///     "templThreshold": 0.85,
///     "next": ["WaitForLobby"],
///     "onErrorNext": ["CloseDialog"],
///     "maxTimes": 1,
///     "preDelay": 200,
///     "postDelay": 1000,
///     "cache": true
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default)]
    pub algorithm: RecognitionAlgorithm,
    #[serde(default)]
    pub action: ActionKind,
    pub template: Option<String>, // defaults to "<task name>.png"
    pub roi: Option<[i64; 4]>,    // defaults to the whole reference canvas
    #[serde(default = "default_threshold")]
    pub templ_threshold: f64,
    #[serde(default)]
    pub next: Vec<String>,
    #[serde(default)]
    pub on_error_next: Vec<String>,
    pub max_times: Option<u32>,
    #[serde(default)]
    pub pre_delay: u64, // milliseconds
    #[serde(default)]
    pub post_delay: u64, // milliseconds
    #[serde(default)]
    pub cache: bool,
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

impl TaskConfig {
    /// Convert into a graph node. Only valid after [`validate_document`] passed.
    fn into_node(self, name: String, reference: Resolution) -> TaskNode {
        let roi = match self.roi {
            Some([x, y, w, h]) => Region::new(x as u32, y as u32, w as u32, h as u32),
            None => Region::full(reference),
        };
        let template = self
            .template
            .unwrap_or_else(|| format!("{}{}", name, DEFAULT_TEMPLATE_EXTENSION));

        TaskNode {
            name,
            algorithm: self.algorithm,
            action: self.action,
            template,
            roi,
            threshold: self.templ_threshold as f32,
            on_success: self.next,
            on_failure: self.on_error_next,
            max_executions: self.max_times.unwrap_or(DEFAULT_MAX_EXECUTIONS),
            pre_delay: Duration::from_millis(self.pre_delay),
            post_delay: Duration::from_millis(self.post_delay),
            cacheable: self.cache,
        }
    }
}

/// A whole graph document: task name to task definition, in document order.
///
/// Entries are kept as a list rather than a map so that a name written twice
/// is reported instead of silently overwritten.
#[derive(Debug, Clone, Default)]
pub struct TaskDocument(pub Vec<(String, TaskConfig)>);

impl<'de> Deserialize<'de> for TaskDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = TaskDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of task names to task definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, task)) = map.next_entry::<String, TaskConfig>()? {
                    entries.push((name, task));
                }
                Ok(TaskDocument(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Validate a parsed document and turn it into an immutable [`TaskGraph`].
///
/// All structural problems are reported together as [`GraphError::Malformed`].
/// Transition targets that name no task, and transition cycles, are logged as
/// warnings only: targets resolve when traversed and the runner's depth bound
/// stops runaway chains.
pub fn build_graph(document: TaskDocument, reference: Resolution) -> Result<TaskGraph, GraphError> {
    if let Err(errors) = validate_document(&document, reference) {
        for error in &errors {
            InvalidTaskDefinition { error }.log();
        }
        return Err(GraphError::Malformed(errors));
    }

    let nodes = document
        .0
        .into_iter()
        .map(|(name, task)| task.into_node(name, reference))
        .collect();
    let graph = TaskGraph::from_nodes(nodes, reference);

    let warnings = find_graph_warnings(&graph);
    for warning in &warnings {
        warning.log();
    }
    let graph = graph.with_warnings(warnings);

    GraphLoaded {
        task_count: graph.len(),
        reference,
    }
    .log();

    Ok(graph)
}

/// Load a task graph from a `.json`, `.yaml` or `.yml` file.
pub fn load_graph<P: AsRef<Path>>(path: P, reference: Resolution) -> Result<TaskGraph, GraphError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let content = || {
        fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    match extension.as_deref() {
        Some("json") => TaskGraph::from_json_str(&content()?, reference),
        Some("yaml") | Some("yml") => TaskGraph::from_yaml_str(&content()?, reference),
        _ => Err(GraphError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    const REFERENCE: Resolution = Resolution::new(1280, 720);

    #[test]
    fn parse_document_keeps_order_and_fields() {
        let json = r#"{
            "Start": { "action": "ClickSelf", "roi": [100, 100, 50, 50], "next": ["Next"], "maxTimes": 1 },
            "Next": { "action": "DoNothing" }
        }"#;

        let document: TaskDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.0.len(), 2);
        assert_eq!(document.0[0].0, "Start");
        assert_eq!(document.0[0].1.roi, Some([100, 100, 50, 50]));
        assert_eq!(document.0[0].1.max_times, Some(1));
        assert_eq!(document.0[1].0, "Next");
    }

    #[test]
    fn action_and_algorithm_aliases_are_accepted() {
        let json = r#"{ "Tap": { "algorithm": "templateMatch", "action": "tapAtMatch" }, "Idle": { "action": "none" } }"#;
        let graph = TaskGraph::from_json_str(json, REFERENCE).unwrap();

        assert_eq!(graph.lookup("Tap").unwrap().action, ActionKind::ClickSelf);
        assert_eq!(graph.lookup("Idle").unwrap().action, ActionKind::DoNothing);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let json = r#"{ "Swipe": { "action": "SwipeLeft" } }"#;
        let result = TaskGraph::from_json_str(json, REFERENCE);
        assert!(matches!(result, Err(GraphError::Json(_))));
    }

    #[test]
    fn duplicate_task_names_are_rejected() {
        let json = r#"{ "Start": {}, "Other": {}, "Start": { "action": "ClickSelf" } }"#;

        match TaskGraph::from_json_str(json, REFERENCE) {
            Err(GraphError::Malformed(errors)) => {
                assert_eq!(
                    errors,
                    vec![ValidationError::DuplicateTaskName {
                        task: "Start".to_string()
                    }]
                );
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn all_problems_are_reported_together() {
        let json = r#"{
            "Empty": { "roi": [0, 0, 0, 10] },
            "Outside": { "roi": [1200, 700, 100, 100] },
            "Strict": { "templThreshold": 1.5 }
        }"#;

        match TaskGraph::from_json_str(json, REFERENCE) {
            Err(GraphError::Malformed(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn unresolved_transitions_still_load() {
        let json = r#"{ "Start": { "next": ["Ghost"], "onErrorNext": ["Phantom"] } }"#;
        let graph = TaskGraph::from_json_str(json, REFERENCE).unwrap();
        assert_eq!(graph.lookup("Start").unwrap().on_success, vec!["Ghost"]);
    }

    #[test]
    fn load_graph_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("tasks.json");
        std::fs::write(&json_path, r#"{ "Start": {} }"#).unwrap();
        assert_eq!(load_graph(&json_path, REFERENCE).unwrap().len(), 1);

        let yaml_path = dir.path().join("tasks.yml");
        std::fs::write(&yaml_path, "Start: {}\nNext: {}\n").unwrap();
        assert_eq!(load_graph(&yaml_path, REFERENCE).unwrap().len(), 2);

        let toml_path = dir.path().join("tasks.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            load_graph(&toml_path, REFERENCE),
            Err(GraphError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_graph_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_graph(dir.path().join("missing.json"), REFERENCE);
        assert!(matches!(result, Err(GraphError::Io { .. })));
    }
}
