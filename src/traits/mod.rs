// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod controller;
pub mod executor;
pub mod recognizer;
pub mod template_store;

pub use controller::{Controller, InputInjector};
pub use executor::ActionExecutor;
pub use recognizer::{Match, RecognitionRequest, Recognizer};
pub use template_store::TemplateStore;
