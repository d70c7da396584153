// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::InjectionError;
use crate::observability::messages::engine::TapRecorded;
use crate::observability::messages::StructuredLog;
use crate::traits::InputInjector;

/// An injector for dry runs: every tap is logged and nothing else happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInjector;

impl LoggingInjector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InputInjector for LoggingInjector {
    async fn tap(&self, x: u32, y: u32) -> Result<(), InjectionError> {
        TapRecorded { x, y }.log();
        Ok(())
    }
}
