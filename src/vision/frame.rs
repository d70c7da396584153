// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use image::{imageops, DynamicImage, GrayImage, ImageBuffer, Luma};

use super::geometry::{Region, Resolution};

/// Grayscale image with luma normalised to `[0, 1]`.
pub type LumaImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// One captured screenshot of the controlled surface.
#[derive(Debug, Clone)]
pub struct Frame {
    luma: LumaImage,
}

impl Frame {
    pub fn from_image(image: &DynamicImage) -> Self {
        Self {
            luma: image.to_luma32f(),
        }
    }

    pub fn from_luma8(image: GrayImage) -> Self {
        Self::from_image(&DynamicImage::ImageLuma8(image))
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.luma.width(), self.luma.height())
    }

    pub fn luma(&self) -> &LumaImage {
        &self.luma
    }

    /// Copy out `region`, which must already be clamped to the frame.
    pub fn crop(&self, region: Region) -> LumaImage {
        imageops::crop_imm(&self.luma, region.x, region.y, region.width, region.height).to_image()
    }
}
