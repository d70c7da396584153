// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors reported by the controller, the input injector and the action executor.

use std::path::PathBuf;
use thiserror::Error;

/// The controller could not produce a frame.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture source unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to decode captured frame '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The input injection collaborator rejected a tap.
#[derive(Error, Debug)]
#[error("Input injection failed at ({x}, {y}): {reason}")]
pub struct InjectionError {
    pub x: u32,
    pub y: u32,
    pub reason: String,
}

/// Errors from performing a task's action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// `ClickSelf` needs a recognized location; the runner never asks for it without one.
    #[error("Action {0} requires a recognized location")]
    MissingMatch(&'static str),

    #[error(transparent)]
    Injection(#[from] InjectionError),
}
