// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while loading a task graph document.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single structural problem found in a task graph document.
///
/// Validation accumulates every problem it finds so a document author can fix
/// them in one pass; see [`GraphError::Malformed`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The same task name appears more than once in the document
    DuplicateTaskName {
        task: String,
    },
    /// The region of interest has a zero (or negative) width or height
    EmptyRegion {
        task: String,
        roi: [i64; 4],
    },
    /// The region of interest leaves the reference canvas
    RegionOutOfBounds {
        task: String,
        roi: [i64; 4],
        canvas_width: u32,
        canvas_height: u32,
    },
    /// The match threshold is not a finite number in `[0, 1]`
    ThresholdOutOfRange {
        task: String,
        threshold: f64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateTaskName { task } => {
                write!(f, "Duplicate task name: '{}'", task)
            }
            ValidationError::EmptyRegion { task, roi } => {
                write!(
                    f,
                    "Task '{}' has an empty region of interest {:?}: width and height must be positive",
                    task, roi
                )
            }
            ValidationError::RegionOutOfBounds {
                task,
                roi,
                canvas_width,
                canvas_height,
            } => {
                write!(
                    f,
                    "Task '{}' has a region of interest {:?} outside the {}x{} reference canvas",
                    task, roi, canvas_width, canvas_height
                )
            }
            ValidationError::ThresholdOutOfRange { task, threshold } => {
                write!(
                    f,
                    "Task '{}' has match threshold {} outside [0, 1]",
                    task, threshold
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur while loading a task graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to read task graph '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON task graph: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML task graph: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension does not name a supported document format.
    #[error("Unsupported task graph format '{0}': expected .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    #[error("Task graph validation failed:\n{}", join_errors(.0))]
    Malformed(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_lists_every_problem() {
        let err = GraphError::Malformed(vec![
            ValidationError::DuplicateTaskName { task: "Start".into() },
            ValidationError::ThresholdOutOfRange {
                task: "Next".into(),
                threshold: 1.5,
            },
        ]);

        let message = err.to_string();
        assert!(message.contains("Duplicate task name: 'Start'"));
        assert!(message.contains("Task 'Next' has match threshold 1.5 outside [0, 1]"));
    }
}
