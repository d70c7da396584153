// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod outcome;
pub mod runner;
pub mod state;

pub use outcome::RunOutcome;
pub use runner::PipelineRunner;
pub use state::ExecutionState;
