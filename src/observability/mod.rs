// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the pipeline engine.
//!
//! Every diagnostic the crate emits is a small message struct with a `Display`
//! implementation and a [`messages::StructuredLog`] implementation that picks
//! the level and the structured fields. Call sites never format log strings
//! themselves.
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - run lifecycle, per-task decisions, transitions
//! * `messages::graph` - graph loading and validation
//! * `messages::vision` - template loading and recognition scoring
//!
//! # Usage
//!
//! ```rust
//! use sightline::observability::messages::engine::TaskNotFound;
//! use sightline::observability::messages::StructuredLog;
//!
//! TaskNotFound { task: "Missing" }.log();
//! ```

pub mod messages;
