// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `engine` - run lifecycle and task execution events
//! * `graph` - graph document loading and validation
//! * `vision` - template library and recognition events

pub mod engine;
pub mod graph;
pub mod vision;

/// Emit a message at its own level with its structured fields attached.
pub trait StructuredLog {
    fn log(&self);
}
