// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::{CaptureError, InjectionError};
use crate::vision::Frame;

/// Source of screenshots of the controlled surface.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Capture the current frame. May block on device I/O; the runner does not retry.
    async fn screenshot(&self) -> Result<Frame, CaptureError>;
}

/// The single input primitive the engine needs: activate at a point.
///
/// Implementations own any timing jitter or gesture humanization.
#[async_trait]
pub trait InputInjector: Send + Sync {
    async fn tap(&self, x: u32, y: u32) -> Result<(), InjectionError>;
}
