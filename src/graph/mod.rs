// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The immutable task graph: named nodes, each a recognition check bound to an action.

mod node;
mod task_graph;

pub use node::{ActionKind, RecognitionAlgorithm, TaskNode};
pub use task_graph::TaskGraph;
