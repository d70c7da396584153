// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the template library and recognition.

use crate::observability::messages::StructuredLog;
use crate::vision::{Region, Resolution};
use std::fmt::{Display, Formatter};

/// A template image was decoded and added to the library.
///
/// # Log Level
/// `debug!` - One per file
pub struct TemplateLoaded<'a> {
    pub name: &'a str,
    pub width: u32,
    pub height: u32,
}

impl Display for TemplateLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded template '{}' ({}x{})", self.name, self.width, self.height)
    }
}

impl StructuredLog for TemplateLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            template = self.name,
            width = self.width,
            height = self.height,
            "{}", self
        );
    }
}

/// A template directory was scanned.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sightline::observability::messages::vision::TemplateDirectoryLoaded;
///
/// let msg = TemplateDirectoryLoaded {
///     path: "resources/templates",
///     template_count: 42,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct TemplateDirectoryLoaded<'a> {
    pub path: &'a str,
    pub template_count: usize,
}

impl Display for TemplateDirectoryLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} templates from '{}'",
            self.template_count, self.path
        )
    }
}

impl StructuredLog for TemplateDirectoryLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            template_count = self.template_count,
            "{}", self
        );
    }
}

/// The scaled region of interest does not overlap the frame at all.
///
/// # Log Level
/// `debug!` - Treated as a miss
pub struct RegionOutsideFrame<'a> {
    pub task: &'a str,
    pub region: Region,
    pub frame: Resolution,
}

impl Display for RegionOutsideFrame<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Region {} of task '{}' lies outside the {} frame",
            self.region, self.task, self.frame
        )
    }
}

impl StructuredLog for RegionOutsideFrame<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            region = %self.region,
            frame = %self.frame,
            "{}", self
        );
    }
}

/// The template is larger than the region it must be searched in.
///
/// # Log Level
/// `debug!` - Treated as a miss
pub struct TemplateDoesNotFit<'a> {
    pub task: &'a str,
    pub template: &'a str,
    pub template_width: u32,
    pub template_height: u32,
    pub region: Region,
}

impl Display for TemplateDoesNotFit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' ({}x{}) does not fit region {} of task '{}'",
            self.template, self.template_width, self.template_height, self.region, self.task
        )
    }
}

impl StructuredLog for TemplateDoesNotFit<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            template = self.template,
            template_width = self.template_width,
            template_height = self.template_height,
            region = %self.region,
            "{}", self
        );
    }
}

/// Best template score within a region, before thresholding.
///
/// # Log Level
/// `trace!` - Emitted on every recognition attempt
pub struct TemplateScored<'a> {
    pub task: &'a str,
    pub template: &'a str,
    pub score: f32,
    pub threshold: f32,
}

impl Display for TemplateScored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Template '{}' for task '{}' scored {:.3} (threshold {:.3})",
            self.template, self.task, self.score, self.threshold
        )
    }
}

impl StructuredLog for TemplateScored<'_> {
    fn log(&self) {
        tracing::trace!(
            task = self.task,
            template = self.template,
            score = self.score,
            threshold = self.threshold,
            "{}", self
        );
    }
}
