// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ActionError;
use crate::graph::ActionKind;
use crate::observability::messages::engine::TapPerformed;
use crate::observability::messages::StructuredLog;
use crate::traits::{ActionExecutor, InputInjector, Match};

/// Performs actions by tapping through an [`InputInjector`].
pub struct TapExecutor {
    injector: Arc<dyn InputInjector>,
}

impl TapExecutor {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }
}

#[async_trait]
impl ActionExecutor for TapExecutor {
    async fn execute(&self, action: ActionKind, matched: Option<&Match>) -> Result<(), ActionError> {
        match action {
            ActionKind::DoNothing => Ok(()),
            ActionKind::ClickSelf => {
                let matched = matched.ok_or(ActionError::MissingMatch(action.as_str()))?;
                self.injector
                    .tap(matched.location.x, matched.location.y)
                    .await?;
                TapPerformed {
                    location: matched.location,
                    confidence: matched.confidence,
                }
                .log();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingInjector;
    use crate::vision::Point;

    fn at(x: u32, y: u32) -> Match {
        Match {
            location: Point::new(x, y),
            confidence: 0.97,
        }
    }

    #[tokio::test]
    async fn click_self_taps_once_at_the_match() {
        let injector = Arc::new(RecordingInjector::new());
        let executor = TapExecutor::new(injector.clone());

        executor
            .execute(ActionKind::ClickSelf, Some(&at(320, 240)))
            .await
            .unwrap();

        assert_eq!(injector.taps(), vec![(320, 240)]);
    }

    #[tokio::test]
    async fn do_nothing_has_no_side_effect() {
        let injector = Arc::new(RecordingInjector::new());
        let executor = TapExecutor::new(injector.clone());

        executor.execute(ActionKind::DoNothing, None).await.unwrap();
        executor
            .execute(ActionKind::DoNothing, Some(&at(1, 1)))
            .await
            .unwrap();

        assert!(injector.taps().is_empty());
    }

    #[tokio::test]
    async fn click_self_without_a_match_is_rejected() {
        let injector = Arc::new(RecordingInjector::new());
        let executor = TapExecutor::new(injector.clone());

        let result = executor.execute(ActionKind::ClickSelf, None).await;

        assert!(matches!(result, Err(ActionError::MissingMatch("ClickSelf"))));
        assert!(injector.taps().is_empty());
    }

    #[tokio::test]
    async fn injection_errors_are_reported() {
        let executor = TapExecutor::new(Arc::new(RecordingInjector::failing()));

        let result = executor.execute(ActionKind::ClickSelf, Some(&at(5, 6))).await;

        match result {
            Err(ActionError::Injection(error)) => assert_eq!((error.x, error.y), (5, 6)),
            other => panic!("expected injection error, got {:?}", other),
        }
    }
}
