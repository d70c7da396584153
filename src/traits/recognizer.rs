// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::RecognitionError;
use crate::graph::{RecognitionAlgorithm, TaskNode};
use crate::vision::{Frame, Point, Region, Resolution};

/// A recognized target: its centre in full-frame coordinates and the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub location: Point,
    pub confidence: f32,
}

/// Everything a recognizer needs to evaluate one task against a frame.
#[derive(Debug, Clone, Copy)]
pub struct RecognitionRequest<'a> {
    pub task: &'a str,
    pub algorithm: RecognitionAlgorithm,
    pub template: &'a str,
    /// Region in `reference` coordinates.
    pub roi: Region,
    pub reference: Resolution,
    pub threshold: f32,
}

impl<'a> RecognitionRequest<'a> {
    pub fn for_node(node: &'a TaskNode, reference: Resolution) -> Self {
        Self {
            task: &node.name,
            algorithm: node.algorithm,
            template: &node.template,
            roi: node.roi,
            reference,
            threshold: node.threshold,
        }
    }
}

/// Locates a task's target in a frame.
///
/// Must be pure: no mutation of the template store or of any session state.
pub trait Recognizer: Send + Sync {
    /// `Ok(None)` is a miss (including an empty region or a score below the
    /// threshold). `Err` means recognition could not be attempted.
    fn recognize(
        &self,
        frame: &Frame,
        request: &RecognitionRequest<'_>,
    ) -> Result<Option<Match>, RecognitionError>;
}
