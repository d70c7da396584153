// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // controller, injector and executor implementations
pub mod config;        // graph documents, engine settings, runtime wiring
pub mod engine;        // pipeline runner
pub mod errors;        // error handling
pub mod graph;         // immutable task graph
pub mod observability;
pub mod traits;        // collaborator seams
pub mod vision;        // frames, templates, template matching
