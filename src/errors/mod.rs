// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod collaborator;
mod execution;
mod graph;
mod settings;
mod vision;

pub use collaborator::{ActionError, CaptureError, InjectionError};
pub use execution::{FailureReason, NodeFailure};
pub use graph::{GraphError, ValidationError};
pub use settings::SettingsError;
pub use vision::{RecognitionError, TemplateError};
