// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Collaborator implementations the runner can be wired with.
//!
//! # Available Backends
//!
//! ## Tap executor
//! [`TapExecutor`] turns a task's action into input on the controlled surface
//! through any [`InputInjector`](crate::traits::InputInjector).
//!
//! ## Dry run
//! Drive a graph against a saved screenshot without touching a device:
//! - **StillImageController**: re-reads one image file on every capture
//! - **LoggingInjector**: logs taps instead of injecting them
//!
//! ## Stub Backend (Test-Only)
//! Scripted controller, recognizer and injector for exercising the runner.
//! Only available in test builds.
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use sightline::backends::{LoggingInjector, StillImageController, TapExecutor};
//!
//! let controller = StillImageController::new("screenshot.png");
//! let executor = TapExecutor::new(Arc::new(LoggingInjector::new()));
//! ```

mod logging;
mod still_image;
#[cfg(test)]
pub mod stub;
mod tap;

pub use logging::LoggingInjector;
pub use still_image::StillImageController;
pub use tap::TapExecutor;
