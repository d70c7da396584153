// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::CaptureError;
use crate::traits::Controller;
use crate::vision::Frame;

/// A controller whose "screen" is an image file.
///
/// The file is decoded again on every capture, so it can be replaced while a
/// run is in progress.
pub struct StillImageController {
    path: PathBuf,
}

impl StillImageController {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Controller for StillImageController {
    async fn screenshot(&self) -> Result<Frame, CaptureError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || match image::open(&path) {
            Ok(image) => Ok(Frame::from_image(&image)),
            Err(source) => Err(CaptureError::Decode { path, source }),
        })
        .await
        .map_err(|error| CaptureError::Unavailable(error.to_string()))?
    }
}
