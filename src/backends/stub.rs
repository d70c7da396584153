// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scripted collaborators for runner tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use image::GrayImage;

use crate::errors::{CaptureError, InjectionError, RecognitionError, TemplateError};
use crate::traits::{Controller, InputInjector, Match, RecognitionRequest, Recognizer};
use crate::vision::{Frame, Point, Resolution};

#[derive(Debug, Clone, Copy)]
enum CaptureMode {
    Blank(Resolution),
    Failing,
    Panicking,
}

/// A controller that hands out black frames, or fails, or panics.
pub struct ScriptedController {
    mode: CaptureMode,
    captures: AtomicUsize,
}

impl ScriptedController {
    pub fn blank(width: u32, height: u32) -> Self {
        Self::with_mode(CaptureMode::Blank(Resolution::new(width, height)))
    }

    pub fn failing() -> Self {
        Self::with_mode(CaptureMode::Failing)
    }

    pub fn panicking() -> Self {
        Self::with_mode(CaptureMode::Panicking)
    }

    fn with_mode(mode: CaptureMode) -> Self {
        Self {
            mode,
            captures: AtomicUsize::new(0),
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Controller for ScriptedController {
    async fn screenshot(&self) -> Result<Frame, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            CaptureMode::Blank(resolution) => Ok(Frame::from_luma8(GrayImage::new(
                resolution.width,
                resolution.height,
            ))),
            CaptureMode::Failing => Err(CaptureError::Unavailable("device disconnected".into())),
            CaptureMode::Panicking => panic!("capture driver crashed"),
        }
    }
}

#[derive(Debug, Clone)]
enum Script {
    Hit(Point),
    Miss,
    /// Miss this many times, then hit at the point forever after.
    HitAfter(usize, Point),
    MissingTemplate,
    Panic,
}

/// A recognizer driven by a per-task script instead of pixels.
///
/// Tasks without a script always miss.
#[derive(Default)]
pub struct ScriptedRecognizer {
    scripts: HashMap<String, Script>,
    calls: Mutex<HashMap<String, usize>>,
    requests: Mutex<VecDeque<String>>,
}

pub const DEFAULT_HIT: Point = Point::new(640, 360);
pub const HIT_CONFIDENCE: f32 = 0.95;

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(self, task: &str) -> Self {
        self.hit_at(task, DEFAULT_HIT)
    }

    pub fn hit_at(self, task: &str, location: Point) -> Self {
        self.script(task, Script::Hit(location))
    }

    pub fn miss(self, task: &str) -> Self {
        self.script(task, Script::Miss)
    }

    pub fn hit_after(self, task: &str, misses: usize) -> Self {
        self.script(task, Script::HitAfter(misses, DEFAULT_HIT))
    }

    pub fn missing_template(self, task: &str) -> Self {
        self.script(task, Script::MissingTemplate)
    }

    pub fn panics(self, task: &str) -> Self {
        self.script(task, Script::Panic)
    }

    fn script(mut self, task: &str, script: Script) -> Self {
        self.scripts.insert(task.to_string(), script);
        self
    }

    /// How many times `task` was recognized against a frame.
    pub fn calls(&self, task: &str) -> usize {
        self.calls.lock().unwrap().get(task).copied().unwrap_or(0)
    }

    /// Every recognition request in order, by task name.
    pub fn history(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().cloned().collect()
    }
}

impl Recognizer for ScriptedRecognizer {
    fn recognize(
        &self,
        _frame: &Frame,
        request: &RecognitionRequest<'_>,
    ) -> Result<Option<Match>, RecognitionError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(request.task.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        self.requests
            .lock()
            .unwrap()
            .push_back(request.task.to_string());

        let hit = |location: Point| {
            Some(Match {
                location,
                confidence: HIT_CONFIDENCE,
            })
        };
        match self.scripts.get(request.task) {
            Some(Script::Hit(location)) => Ok(hit(*location)),
            Some(Script::HitAfter(misses, location)) if call > *misses => Ok(hit(*location)),
            Some(Script::MissingTemplate) => Err(TemplateError::NotFound(request.template.to_string()).into()),
            Some(Script::Panic) => panic!("matcher crashed on '{}'", request.task),
            Some(Script::HitAfter(..)) | Some(Script::Miss) | None => Ok(None),
        }
    }
}

/// An injector that remembers every tap.
#[derive(Default)]
pub struct RecordingInjector {
    taps: Mutex<Vec<(u32, u32)>>,
    failing: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every tap without recording it.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn taps(&self) -> Vec<(u32, u32)> {
        self.taps.lock().unwrap().clone()
    }
}

#[async_trait]
impl InputInjector for RecordingInjector {
    async fn tap(&self, x: u32, y: u32) -> Result<(), InjectionError> {
        if self.failing {
            return Err(InjectionError {
                x,
                y,
                reason: "input device rejected the event".into(),
            });
        }
        self.taps.lock().unwrap().push((x, y));
        Ok(())
    }
}
