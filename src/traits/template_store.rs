// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::errors::TemplateError;
use crate::vision::Template;

/// Read-only lookup of reference images by name.
pub trait TemplateStore: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<Template>, TemplateError>;
}
