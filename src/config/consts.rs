// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Authoring resolution of task graph documents (regions are expressed in it)
pub const DEFAULT_REFERENCE_WIDTH: u32 = 1280;
pub const DEFAULT_REFERENCE_HEIGHT: u32 = 720;
/// Minimum confidence for a template match when a task does not set one
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;
/// `maxTimes` when a task does not set one: effectively unbounded
pub const DEFAULT_MAX_EXECUTIONS: u32 = u32::MAX;
/// Recursion budget for one run; the runtime backstop against transition cycles
pub const DEFAULT_MAX_DEPTH: u32 = 50;
/// Pause between polls of an idle-wait task that has not matched yet
pub const DEFAULT_IDLE_POLL_INTERVAL_MS: u64 = 500;
/// Suffix appended to a task name when it does not name its template
pub const DEFAULT_TEMPLATE_EXTENSION: &str = ".png";
