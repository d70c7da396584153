// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ActionError;
use crate::graph::ActionKind;
use crate::traits::recognizer::Match;

/// Performs a task's action once its target has been recognized.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Perform exactly one side effect for `action` (or none for `DoNothing`).
    ///
    /// Never retries; all retry policy belongs to the runner. `ClickSelf`
    /// requires `matched`; the runner only calls this after a match.
    async fn execute(&self, action: ActionKind, matched: Option<&Match>) -> Result<(), ActionError>;
}
