// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of a canvas: the document's authoring resolution or a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Per-axis factors that map coordinates on `self` onto `target`.
    pub fn scale_factors(&self, target: Resolution) -> (f64, f64) {
        (
            target.width as f64 / self.width as f64,
            target.height as f64 / self.height as f64,
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A location in full-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle `(x, y, width, height)`.
///
/// Regions in a task graph are authored against the reference resolution and
/// only converted to frame coordinates at recognition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole canvas of `resolution`.
    pub const fn full(resolution: Resolution) -> Self {
        Self::new(0, 0, resolution.width, resolution.height)
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Map this region from the `from` canvas onto the `to` canvas.
    ///
    /// Each axis is scaled independently and truncated toward zero.
    pub fn scale(&self, from: Resolution, to: Resolution) -> Region {
        if from == to {
            return *self;
        }
        let (sx, sy) = from.scale_factors(to);
        Region {
            x: (self.x as f64 * sx) as u32,
            y: (self.y as f64 * sy) as u32,
            width: (self.width as f64 * sx) as u32,
            height: (self.height as f64 * sy) as u32,
        }
    }

    /// Intersect with a `bounds` canvas anchored at the origin.
    ///
    /// Returns `None` when nothing of the region remains.
    pub fn clamp_to(&self, bounds: Resolution) -> Option<Region> {
        let x0 = self.x.min(bounds.width);
        let y0 = self.y.min(bounds.height);
        let x1 = self.right().min(bounds.width as u64) as u32;
        let y1 = self.bottom().min(bounds.height as u64) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Whether the region lies entirely within a canvas of `bounds`.
    pub fn fits_within(&self, bounds: Resolution) -> bool {
        self.right() <= bounds.width as u64 && self.bottom() <= bounds.height as u64
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.x, self.y, self.width, self.height
        )
    }
}
