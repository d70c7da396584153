// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::TapExecutor;
use crate::config::EngineSettings;
use crate::engine::PipelineRunner;
use crate::graph::TaskGraph;
use crate::traits::{Controller, InputInjector, TemplateStore};
use crate::vision::VisionRecognizer;

/// Wires the standard collaborators into a [`PipelineRunner`].
///
/// The graph and template store are shared read-only. The controller and
/// injector belong to one controlled surface; automate several surfaces by
/// building one runner per surface.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use sightline::backends::{LoggingInjector, StillImageController};
/// use sightline::config::{EngineSettings, RuntimeBuilder};
/// use sightline::graph::TaskGraph;
/// use sightline::vision::TemplateLibrary;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = EngineSettings::default();
/// let graph = TaskGraph::load("configs/sample-graph.json", settings.reference_resolution())?;
/// let templates = TemplateLibrary::load_dir("templates")?;
///
/// let mut runner = RuntimeBuilder::build(
///     &settings,
///     Arc::new(graph),
///     Arc::new(templates),
///     Arc::new(StillImageController::new("screenshot.png")),
///     Arc::new(LoggingInjector::new()),
/// );
/// let outcome = runner.run("StartButton").await;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    pub fn build(
        settings: &EngineSettings,
        graph: Arc<TaskGraph>,
        templates: Arc<dyn TemplateStore>,
        controller: Arc<dyn Controller>,
        injector: Arc<dyn InputInjector>,
    ) -> PipelineRunner {
        PipelineRunner::new(
            graph,
            controller,
            Arc::new(VisionRecognizer::new(templates)),
            Arc::new(TapExecutor::new(injector)),
            settings.clone(),
        )
    }
}
