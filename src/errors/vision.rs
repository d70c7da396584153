// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors from resolving or loading reference images.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: '{0}'")]
    NotFound(String),

    #[error("Failed to read template directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode template '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Recognition could not be attempted at all (as opposed to a miss).
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Recognition was cancelled before it finished: {0}")]
    Cancelled(#[source] tokio::task::JoinError),
}
