// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod settings;
mod validation;

pub mod consts;

pub use loader::{build_graph, load_graph, TaskConfig, TaskDocument};
pub use runtime::RuntimeBuilder;
pub use settings::{load_settings, EngineSettings};
pub use validation::{find_graph_warnings, validate_document, GraphWarning, TransitionKind};
