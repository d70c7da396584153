// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Frames, reference templates and the template-matching recognizer.
//!
//! Everything here is pure computation over grayscale `f32` luma images. The
//! only I/O is [`TemplateLibrary::load_dir`], which runs once before a session.

mod frame;
mod geometry;
pub mod matcher;
mod recognizer;
mod spectrum;
mod template;

pub use frame::{Frame, LumaImage};
pub use geometry::{Point, Region, Resolution};
pub use recognizer::VisionRecognizer;
pub use template::{Template, TemplateLibrary};
